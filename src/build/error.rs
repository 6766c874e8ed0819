//! Build error types.

use thiserror::Error;

/// Error during compilation or linking.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A compile call was issued without any source files.
    #[error("no source files for compilation")]
    NoSources,

    /// A required tool is absent and has no fallback.
    #[error("{0} tool not found")]
    ToolNotFound(&'static str),

    /// An invoked compiler, linker, or archiver exited non-zero.
    #[error("`{command}` failed with exit code {code:?}\n{stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}
