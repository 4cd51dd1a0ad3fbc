//! Transitive dependency graph traversal
//!
//! The walker drives the extractor and the resolver over the full dependency
//! closure of a root object. Traversal is breadth-first over an explicit FIFO
//! work queue, and a set of already-resolved sonames bounds it: once a soname
//! has been resolved anywhere it is never extracted or resolved again, which
//! terminates cyclic graphs and keeps each distinct dependency in the output
//! exactly once.

use crate::extract::DynamicExtractor;
use crate::search::SearchPaths;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Soname prefix of the dynamic loader.
pub const LOADER_PREFIX: &str = "ld-linux";

/// Whether a soname names the dynamic loader.
///
/// The loader is recorded in the graph but never expanded, and the
/// presentation layer gives it a dedicated trailing line.
pub fn is_loader(soname: &str) -> bool {
    soname.starts_with(LOADER_PREFIX)
}

/// One discovered dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryReference {
    /// The runtime-lookup name the referencing object asked for.
    pub soname: String,
    /// Where the resolver found it, or `None` for "not found".
    ///
    /// Filled exactly once, by the lookup that first discovered the soname.
    pub path: Option<PathBuf>,
}

/// Breadth-first walker over the transitive dependency graph.
pub struct Walker<'a, E: DynamicExtractor> {
    extractor: &'a E,
    search: &'a SearchPaths,
}

impl<'a, E: DynamicExtractor> Walker<'a, E> {
    pub fn new(extractor: &'a E, search: &'a SearchPaths) -> Self {
        Self { extractor, search }
    }

    /// Produces the full dependency graph of the object at `root`.
    ///
    /// Each dequeued object contributes its not-yet-seen `DT_NEEDED`
    /// references, resolved with that object's own RPATH/RUNPATH hints only;
    /// hints never apply to lookups made on behalf of other objects. A
    /// reference that fails to resolve is recorded with the not-found
    /// sentinel and has nothing to expand into.
    pub fn walk(&self, root: &Path) -> Vec<LibraryReference> {
        let mut graph = Vec::new();
        let mut resolved: HashSet<String> = HashSet::new();
        let mut pending: VecDeque<PathBuf> = VecDeque::new();
        // A descendant may refer back to the root by soname; that reference
        // must not re-list the root.
        if let Some(name) = root.file_name().and_then(|name| name.to_str()) {
            resolved.insert(name.to_string());
        }
        pending.push_back(root.to_path_buf());

        while let Some(object) = pending.pop_front() {
            let info = self.extractor.extract(&object);
            let hints = info.hints();
            for soname in &info.needed {
                // Also drops duplicate NEEDED entries within one object.
                if !resolved.insert(soname.clone()) {
                    continue;
                }
                let path = self.search.resolve(soname, hints);
                match &path {
                    Some(found) if !is_loader(soname) => pending.push_back(found.clone()),
                    Some(_) => log::trace!("{soname}: dynamic loader, not descending"),
                    None => log::trace!("{soname}: not found in any search directory"),
                }
                graph.push(LibraryReference {
                    soname: soname.clone(),
                    path,
                });
            }
        }
        graph
    }
}
