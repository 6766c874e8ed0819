//! Compiler detection and flag resolution.

use std::path::PathBuf;

use crate::config::BuildSection;
use crate::util::env::Environment;
use crate::util::process::{find_first_in_path, find_in_path};

/// Candidate C compiler names, in preference order.
const C_COMPILERS: &[&str] = &["cc", "gcc", "clang"];

/// Candidate C++ compiler names, in preference order.
const CXX_COMPILERS: &[&str] = &["c++", "g++", "clang++"];

/// The C and C++ compilers for a build session.
///
/// Immutable once detected; the paths are not verified to be runnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSet {
    /// C compiler
    pub cc: PathBuf,
    /// C++ compiler
    pub cxx: PathBuf,
}

/// Resolved compiler and linker flags, one ordered list per category.
///
/// Order is significant and duplicates are preserved; blank entries have
/// already been filtered out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub cflags: Vec<String>,
    pub cxxflags: Vec<String>,
    pub ldflags: Vec<String>,
}

/// Detect the C and C++ compilers for this session.
///
/// On Windows an MSVC `cl` on the search path serves as both. Otherwise the
/// `CC`/`CXX` overrides win, then the first common compiler found on the
/// search path, then the literal names `cc`/`c++`. Never fails; the result
/// may name a compiler that does not actually exist.
pub fn detect_compilers(env: &Environment) -> CompilerSet {
    if cfg!(windows) {
        if let Some(cl) = find_in_path("cl", env) {
            tracing::debug!("detected MSVC compiler at {}", cl.display());
            return CompilerSet {
                cc: cl.clone(),
                cxx: cl,
            };
        }
    }

    let cc = env
        .get("CC")
        .map(PathBuf::from)
        .or_else(|| find_first_in_path(C_COMPILERS, env))
        .unwrap_or_else(|| PathBuf::from("cc"));

    let cxx = env
        .get("CXX")
        .map(PathBuf::from)
        .or_else(|| find_first_in_path(CXX_COMPILERS, env))
        .unwrap_or_else(|| PathBuf::from("c++"));

    tracing::debug!("detected compilers: cc={}, cxx={}", cc.display(), cxx.display());
    CompilerSet { cc, cxx }
}

/// Resolve compiler and linker flags from configuration and environment.
///
/// Each category resolves independently: configured flags win when
/// non-empty, else the corresponding environment variable split on
/// whitespace, else empty.
pub fn resolve_flags(build: &BuildSection, env: &Environment) -> FlagSet {
    FlagSet {
        cflags: resolve_category(&build.cflags, env.get("CFLAGS")),
        cxxflags: resolve_category(&build.cxxflags, env.get("CXXFLAGS")),
        ldflags: resolve_category(&build.ldflags, env.get("LDFLAGS")),
    }
}

fn resolve_category(configured: &[String], env_value: Option<&str>) -> Vec<String> {
    let raw: Vec<String> = if !configured.is_empty() {
        configured.to_vec()
    } else {
        env_value
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    };

    raw.into_iter().filter(|f| !f.trim().is_empty()).collect()
}
