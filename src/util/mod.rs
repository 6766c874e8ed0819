//! Shared utilities: environment snapshots, subprocess execution, filesystem helpers.

pub mod env;
pub mod fs;
pub mod process;

pub use env::Environment;
pub use process::{CommandSpec, ExecOutput, Executor, ProcessRunner};
