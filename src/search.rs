//! Mapping sonames to on-disk library paths
//!
//! The resolver probes an ordered list of candidate directories and returns
//! the first one that contains the requested soname. The ordering mirrors the
//! dynamic linker's search precedence: the referencing object's `DT_RPATH`
//! first, then the `LD_LIBRARY_PATH` override, then `DT_RUNPATH`, then the
//! platform default directories.

use crate::extract::SearchHints;
use std::path::{Path, PathBuf};

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        const DEFAULT_DIRS: &[&str] = &["/lib64", "/usr/lib64", "/lib", "/usr/lib"];
    } else {
        const DEFAULT_DIRS: &[&str] = &["/lib", "/usr/lib"];
    }
}

/// Resolver configuration.
///
/// Holds the directories supplied through the environment override. The
/// override is read once at startup and threaded in here explicitly; the
/// resolver itself never touches process-global state. Per-object
/// RPATH/RUNPATH hints are passed per lookup, since they are scoped to the
/// referencing object.
#[derive(Debug, Default, Clone)]
pub struct SearchPaths {
    env_dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Configuration without an environment override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the configuration from the value of the environment override
    /// (`LD_LIBRARY_PATH` style), a colon-separated directory list kept in
    /// its original left-to-right order. `None` contributes no directories.
    pub fn from_env_list(list: Option<&str>) -> Self {
        let env_dirs = list
            .unwrap_or_default()
            .split(':')
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { env_dirs }
    }

    /// Resolves `soname` to the first existing `<dir>/<soname>` across the
    /// candidate ordering, or `None` if no directory contains it.
    ///
    /// This is a pure existence probe: a file that exists but is not a valid
    /// library still resolves.
    pub fn resolve(&self, soname: &str, hints: SearchHints<'_>) -> Option<PathBuf> {
        for dir in self.candidates(hints) {
            let candidate = dir.join(soname);
            if candidate.exists() {
                log::trace!("{soname}: found in {}", dir.display());
                return Some(candidate);
            }
        }
        None
    }

    /// Resolves `soname` without any embedded path hints.
    ///
    /// Used for the dynamic loader, which is looked up through the override
    /// and default directories only.
    pub fn resolve_default(&self, soname: &str) -> Option<PathBuf> {
        self.resolve(soname, SearchHints::empty())
    }

    /// The candidate directories for one lookup, highest precedence first.
    fn candidates<'a>(&'a self, hints: SearchHints<'a>) -> impl Iterator<Item = &'a Path> {
        hints
            .rpath
            .iter()
            .map(Path::new)
            .chain(self.env_dirs.iter().map(PathBuf::as_path))
            .chain(hints.runpath.iter().map(Path::new))
            .chain(DEFAULT_DIRS.iter().map(Path::new))
    }
}
