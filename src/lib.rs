//! # eldd
//! An ldd-style lister for the transitive shared-library dependencies of ELF
//! binaries. Unlike the real ldd it never loads or executes anything: the
//! dependency closure is computed purely from dynamic-section metadata, so it
//! works on binaries cross-compiled for another architecture, and no load
//! addresses are produced.
//! ## Usage
//! ```no_run
//! use eldd::{ElfExtractor, SearchPaths, Walker};
//! use std::path::Path;
//!
//! let search = SearchPaths::from_env_list(std::env::var("LD_LIBRARY_PATH").ok().as_deref());
//! let extractor = ElfExtractor;
//! let graph = Walker::new(&extractor, &search).walk(Path::new("/bin/true"));
//! for reference in &graph {
//!     println!("{} -> {:?}", reference.soname, reference.path);
//! }
//! ```

mod error;
pub mod extract;
pub mod print;
pub mod search;
pub mod walk;

pub use error::Error;
pub use extract::{DynamicExtractor, DynamicInfo, ElfExtractor, SearchHints};
pub use print::{NOT_FOUND, VDSO_NAME, render_listing};
pub use search::SearchPaths;
pub use walk::{LOADER_PREFIX, LibraryReference, Walker, is_loader};

pub(crate) use error::{io_error, parse_dynamic_error, parse_elf_error};

pub type Result<T> = core::result::Result<T, Error>;
