//! Project, compiler, and source discovery.

pub mod compilers;
pub mod project;
pub mod sources;

pub use compilers::{detect_compilers, resolve_flags, CompilerSet, FlagSet};
pub use project::find_project_root;
pub use sources::SourceDiscoverer;
