//! Extracting dynamic-linking metadata from ELF files
//!
//! The extractor reads the `.dynamic` section of an ELF object and yields its
//! `DT_NEEDED`, `DT_RPATH` and `DT_RUNPATH` entries with string-table
//! references already resolved. Parsing is driven entirely by the inspected
//! file's own class and data encoding, so a binary cross-compiled for another
//! architecture is read just as well as a native one.

use crate::{Result, io_error, parse_dynamic_error, parse_elf_error};
use elf::ElfBytes;
use elf::abi::{DT_NEEDED, DT_RPATH, DT_RUNPATH, DT_STRSZ, DT_STRTAB, PT_LOAD};
use elf::endian::AnyEndian;
use elf::string_table::StringTable;
use std::fs;
use std::path::Path;

/// Dynamic-linking metadata of a single ELF object.
///
/// Entries appear in on-disk order. `rpath` and `runpath` hold the
/// colon-separated directory lists already split into components.
#[derive(Debug, Default, Clone)]
pub struct DynamicInfo {
    /// Sonames of the directly required libraries (`DT_NEEDED`).
    pub needed: Vec<String>,
    /// Extra search directories embedded via `DT_RPATH`.
    pub rpath: Vec<String>,
    /// Extra search directories embedded via `DT_RUNPATH`.
    pub runpath: Vec<String>,
}

impl DynamicInfo {
    /// Returns this object's embedded path hints, for resolving its own
    /// direct `DT_NEEDED` references.
    pub fn hints(&self) -> SearchHints<'_> {
        SearchHints {
            rpath: &self.rpath,
            runpath: &self.runpath,
        }
    }
}

/// Borrowed `DT_RPATH`/`DT_RUNPATH` directory lists of a referencing object.
///
/// Hints are scoped to the object that embeds them: they influence lookups of
/// that object's direct references only and are never inherited by
/// descendants, matching the dynamic linker's per-object search scoping.
#[derive(Debug, Clone, Copy)]
pub struct SearchHints<'a> {
    /// `DT_RPATH` directories, highest search precedence.
    pub rpath: &'a [String],
    /// `DT_RUNPATH` directories, ranked below the environment override.
    pub runpath: &'a [String],
}

impl SearchHints<'_> {
    /// Hints of an object that embeds none, and for default-only lookups.
    pub const fn empty() -> SearchHints<'static> {
        SearchHints {
            rpath: &[],
            runpath: &[],
        }
    }
}

/// A source of dynamic-linking metadata.
///
/// The graph walker only depends on this trait, so the native reader below
/// can be swapped for another collaborator (for instance one that scans the
/// output of an external dump tool) without touching the traversal.
pub trait DynamicExtractor {
    /// Extracts the dynamic-linking metadata of the object at `path`.
    ///
    /// An object without a dynamic section, an unopenable path and an
    /// unparsable container all yield an empty [`DynamicInfo`]; the failure
    /// cause is only surfaced as a debug log line.
    fn extract(&self, path: &Path) -> DynamicInfo;
}

/// Extractor backed by a native ELF reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElfExtractor;

impl DynamicExtractor for ElfExtractor {
    fn extract(&self, path: &Path) -> DynamicInfo {
        match read_dynamic(path) {
            Ok(info) => info,
            Err(err) => {
                log::debug!(
                    "{}: treated as having no dependencies: {}",
                    path.display(),
                    err
                );
                DynamicInfo::default()
            }
        }
    }
}

fn read_dynamic(path: &Path) -> Result<DynamicInfo> {
    // One scoped acquisition of the file, released before parsing starts.
    let data = fs::read(path).map_err(|err| io_error(err.to_string()))?;
    parse_dynamic(&data)
}

/// Parses the NEEDED/RPATH/RUNPATH entries out of a raw ELF image.
pub(crate) fn parse_dynamic(data: &[u8]) -> Result<DynamicInfo> {
    let file = ElfBytes::<AnyEndian>::minimal_parse(data)
        .map_err(|err| parse_elf_error(err.to_string()))?;
    let Some(dynamic) = file
        .dynamic()
        .map_err(|err| parse_dynamic_error(err.to_string()))?
    else {
        return Ok(DynamicInfo::default());
    };

    let mut strtab_addr = None;
    let mut strtab_size = None;
    for entry in dynamic.iter() {
        match entry.d_tag {
            DT_STRTAB => strtab_addr = Some(entry.d_ptr()),
            DT_STRSZ => strtab_size = Some(entry.d_val()),
            _ => {}
        }
    }
    let strtab_addr =
        strtab_addr.ok_or_else(|| parse_dynamic_error("dynamic section has no DT_STRTAB"))?;
    let strtab = dynamic_string_table(&file, data, strtab_addr, strtab_size)?;

    let mut info = DynamicInfo::default();
    for entry in dynamic.iter() {
        match entry.d_tag {
            DT_NEEDED => {
                let soname = strtab
                    .get(entry.d_val() as usize)
                    .map_err(|err| parse_dynamic_error(err.to_string()))?;
                info.needed.push(soname.to_string());
            }
            DT_RPATH => {
                let list = strtab
                    .get(entry.d_val() as usize)
                    .map_err(|err| parse_dynamic_error(err.to_string()))?;
                info.rpath.extend(split_search_list(list));
            }
            DT_RUNPATH => {
                let list = strtab
                    .get(entry.d_val() as usize)
                    .map_err(|err| parse_dynamic_error(err.to_string()))?;
                info.runpath.extend(split_search_list(list));
            }
            _ => {}
        }
    }
    Ok(info)
}

/// Slices the dynamic string table out of the raw file image.
///
/// `DT_STRTAB` holds a virtual address, which is translated to a file offset
/// through the `PT_LOAD` segment that maps it. This works on objects whose
/// section headers have been stripped, where only the program headers remain.
fn dynamic_string_table<'data>(
    file: &ElfBytes<'data, AnyEndian>,
    data: &'data [u8],
    addr: u64,
    size: Option<u64>,
) -> Result<StringTable<'data>> {
    let segments = file
        .segments()
        .ok_or_else(|| parse_dynamic_error("object has no program headers"))?;
    for phdr in segments.iter() {
        if phdr.p_type != PT_LOAD {
            continue;
        }
        // All offsets below come from the file and may be garbage; checked
        // arithmetic turns a corrupt value into a parse error.
        let Some(seg_end) = phdr.p_vaddr.checked_add(phdr.p_filesz) else {
            continue;
        };
        if addr < phdr.p_vaddr || addr >= seg_end {
            continue;
        }
        let offset = (addr - phdr.p_vaddr)
            .checked_add(phdr.p_offset)
            .ok_or_else(|| parse_dynamic_error("string table offset overflows"))?;
        // Without DT_STRSZ, bound the table by the end of the mapping.
        let end = match size {
            Some(size) => offset.checked_add(size),
            None => phdr.p_offset.checked_add(phdr.p_filesz),
        }
        .ok_or_else(|| parse_dynamic_error("string table size overflows"))?;
        let bytes = usize::try_from(offset)
            .ok()
            .zip(usize::try_from(end).ok())
            .and_then(|(start, end)| data.get(start..end))
            .ok_or_else(|| parse_dynamic_error("string table exceeds file size"))?;
        return Ok(StringTable::new(bytes));
    }
    Err(parse_dynamic_error(
        "DT_STRTAB is not mapped by any PT_LOAD segment",
    ))
}

/// Splits a colon-separated search-path list, dropping empty components.
fn split_search_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(':')
        .filter(|dir| !dir.is_empty())
        .map(str::to_string)
}
