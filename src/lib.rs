//! Bosun hooks - build-orchestration context for bosun hook scripts.
//!
//! This crate lets user-supplied build hooks compile C/C++ artifacts without
//! hand-assembling compiler invocations. It locates the project, discovers
//! sources and headers, detects an available toolchain, and compiles
//! executables and libraries, delegating to the `bosun` CLI when it is
//! present on the search path.

pub mod build;
pub mod config;
pub mod context;
pub mod discovery;
pub mod util;

/// Test utilities for bosun-hooks unit tests.
///
/// Only available when compiling tests; provides a recording process
/// executor so command assembly can be asserted without a toolchain.
#[cfg(test)]
pub mod test_support;

pub use build::{Artifact, ArtifactKind, ArtifactRegistry, BuildError, Linkage};
pub use config::ProjectConfig;
pub use context::HookContext;
pub use discovery::{CompilerSet, FlagSet};
