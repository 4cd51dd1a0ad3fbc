//! Rendering a dependency graph as an ldd-style listing

use crate::search::SearchPaths;
use crate::walk::{LibraryReference, is_loader};
use std::fmt::Write;

/// Name printed for the kernel-provided virtual shared object.
///
/// The vdso is injected by the kernel at process start; it never exists on
/// disk and is never resolved.
pub const VDSO_NAME: &str = "linux-vdso.so.1";

/// Text shown in place of a path for an unresolved library.
pub const NOT_FOUND: &str = "not found";

/// Renders one binary's dependency listing.
///
/// An empty graph renders as an empty string. Otherwise the block starts with
/// the synthetic vdso line, continues with one line per non-loader reference,
/// and ends with the dynamic loader resolved through the default search only,
/// if a loader-named soname was encountered anywhere in the graph. The
/// address field is always the `(0x0)` placeholder since load addresses are
/// never computed.
pub fn render_listing(graph: &[LibraryReference], search: &SearchPaths) -> String {
    if graph.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    let _ = writeln!(out, "\t{VDSO_NAME} (0x0)");
    let mut loader = None;
    for reference in graph {
        if is_loader(&reference.soname) {
            loader = Some(reference.soname.as_str());
            continue;
        }
        match &reference.path {
            Some(path) => {
                let _ = writeln!(out, "\t{} => {} (0x0)", reference.soname, path.display());
            }
            None => {
                let _ = writeln!(out, "\t{} => {NOT_FOUND} (0x0)", reference.soname);
            }
        }
    }
    if let Some(loader) = loader {
        match search.resolve_default(loader) {
            Some(path) => {
                let _ = writeln!(out, "\t{} (0x0)", path.display());
            }
            None => {
                let _ = writeln!(out, "\t{NOT_FOUND} (0x0)");
            }
        }
    }
    out
}
