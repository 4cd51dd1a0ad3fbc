use std::borrow::Cow;
use std::fmt::{Debug, Display};

/// Error types used while inspecting ELF files.
///
/// These are internal to the extraction step: callers of the public API never
/// see them, since an uninspectable file is reported as having no
/// dependencies. They exist so the parsing code can use `?` and so the
/// failure cause can be logged before being discarded.
#[derive(Debug)]
pub enum Error {
    /// An error occurred while opening or reading an ELF file.
    Io {
        /// A descriptive message about the I/O error.
        msg: Cow<'static, str>,
    },

    /// The file is not a recognizable ELF container.
    ///
    /// Bad magic bytes, an unknown class or data encoding, or a truncated
    /// header all end up here.
    ParseElf {
        /// A descriptive message about the container parsing error.
        msg: Cow<'static, str>,
    },

    /// An error occurred while parsing the dynamic section.
    ///
    /// This covers malformed dynamic entries as well as string-table
    /// references that cannot be resolved.
    ParseDynamic {
        /// A descriptive message about the dynamic section parsing error.
        msg: Cow<'static, str>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io { msg } => write!(f, "I/O error: {msg}"),
            Error::ParseElf { msg } => write!(f, "ELF parsing error: {msg}"),
            Error::ParseDynamic { msg } => write!(f, "dynamic section parsing error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Creates an I/O error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn io_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Io { msg: msg.into() }
}

/// Creates a container parsing error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn parse_elf_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::ParseElf { msg: msg.into() }
}

/// Creates a dynamic section parsing error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn parse_dynamic_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::ParseDynamic { msg: msg.into() }
}
