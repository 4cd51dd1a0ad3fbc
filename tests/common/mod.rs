#![allow(dead_code)]

//! Hand-assembled ELF fixtures for the integration tests.
//!
//! The builder emits the minimum an inspectable shared object needs: an ELF
//! header, a PT_LOAD segment mapping the whole file at vaddr 0, a PT_DYNAMIC
//! segment, the dynamic entry array and the dynamic string table. Class,
//! endianness and machine are configurable so the tests can produce objects
//! for architectures other than the host's.

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use object::elf::{
    DT_NEEDED, DT_NULL, DT_RPATH, DT_RUNPATH, DT_STRSZ, DT_STRTAB, ELFCLASS32, ELFCLASS64,
    ELFDATA2LSB, ELFDATA2MSB, EM_X86_64, ET_DYN, EV_CURRENT, PF_R, PT_DYNAMIC, PT_LOAD,
};
use std::fs;
use std::path::{Path, PathBuf};

/// A per-test scratch directory under the cargo target tree.
pub fn test_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[derive(Clone, Copy, PartialEq)]
enum Class {
    Elf32,
    Elf64,
}

#[derive(Clone, Copy, PartialEq)]
enum Endian {
    Little,
    Big,
}

pub struct DylibBuilder {
    class: Class,
    endian: Endian,
    machine: u16,
    needed: Vec<String>,
    rpath: Option<String>,
    runpath: Option<String>,
    with_dynamic: bool,
}

impl DylibBuilder {
    /// A 64-bit little-endian x86-64 shared object with no dependencies.
    pub fn new() -> Self {
        Self {
            class: Class::Elf64,
            endian: Endian::Little,
            machine: EM_X86_64,
            needed: Vec::new(),
            rpath: None,
            runpath: None,
            with_dynamic: true,
        }
    }

    pub fn class32(mut self) -> Self {
        self.class = Class::Elf32;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.endian = Endian::Big;
        self
    }

    pub fn machine(mut self, machine: u16) -> Self {
        self.machine = machine;
        self
    }

    /// Adds a DT_NEEDED entry. Entries keep their insertion order.
    pub fn needs(mut self, soname: &str) -> Self {
        self.needed.push(soname.to_string());
        self
    }

    /// Sets the DT_RPATH value (a colon-separated directory list).
    pub fn rpath(mut self, list: impl Into<String>) -> Self {
        self.rpath = Some(list.into());
        self
    }

    /// Sets the DT_RUNPATH value (a colon-separated directory list).
    pub fn runpath(mut self, list: impl Into<String>) -> Self {
        self.runpath = Some(list.into());
        self
    }

    /// Emits only the PT_LOAD segment, producing an object with no dynamic
    /// section at all.
    pub fn without_dynamic(mut self) -> Self {
        self.with_dynamic = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        match self.endian {
            Endian::Little => self.assemble::<LittleEndian>(),
            Endian::Big => self.assemble::<BigEndian>(),
        }
    }

    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.build()).unwrap();
    }

    fn assemble<O: ByteOrder>(&self) -> Vec<u8> {
        let is64 = self.class == Class::Elf64;
        let ehdr_size: u64 = if is64 { 64 } else { 52 };
        let phent: u64 = if is64 { 56 } else { 32 };
        let dyn_ent: u64 = if is64 { 16 } else { 8 };
        let phnum: u64 = if self.with_dynamic { 2 } else { 1 };

        // Dynamic string table: classic leading NUL, then each string.
        let mut strtab = vec![0u8];
        let mut offset_of = |s: &str| {
            let off = strtab.len() as u64;
            strtab.extend_from_slice(s.as_bytes());
            strtab.push(0);
            off
        };
        let mut entries: Vec<(i64, u64)> = Vec::new();
        for soname in &self.needed {
            entries.push((DT_NEEDED as i64, offset_of(soname)));
        }
        if let Some(list) = &self.rpath {
            entries.push((DT_RPATH as i64, offset_of(list)));
        }
        if let Some(list) = &self.runpath {
            entries.push((DT_RUNPATH as i64, offset_of(list)));
        }

        let phoff = ehdr_size;
        let dyn_off = phoff + phnum * phent;
        let dyn_size = (entries.len() as u64 + 3) * dyn_ent;
        let strtab_off = dyn_off + dyn_size;
        entries.push((DT_STRTAB as i64, strtab_off));
        entries.push((DT_STRSZ as i64, strtab.len() as u64));
        entries.push((DT_NULL as i64, 0));
        let total = if self.with_dynamic {
            strtab_off + strtab.len() as u64
        } else {
            dyn_off
        };

        let mut out = Vec::with_capacity(total as usize);
        // e_ident
        out.extend_from_slice(&[0x7f, b'E', b'L', b'F']);
        out.push(if is64 { ELFCLASS64 } else { ELFCLASS32 });
        out.push(match self.endian {
            Endian::Little => ELFDATA2LSB,
            Endian::Big => ELFDATA2MSB,
        });
        out.push(EV_CURRENT);
        out.extend_from_slice(&[0; 9]);
        // rest of the ELF header
        out.write_u16::<O>(ET_DYN).unwrap();
        out.write_u16::<O>(self.machine).unwrap();
        out.write_u32::<O>(EV_CURRENT as u32).unwrap();
        write_word::<O>(&mut out, is64, 0); // e_entry
        write_word::<O>(&mut out, is64, phoff);
        write_word::<O>(&mut out, is64, 0); // e_shoff
        out.write_u32::<O>(0).unwrap(); // e_flags
        out.write_u16::<O>(ehdr_size as u16).unwrap();
        out.write_u16::<O>(phent as u16).unwrap();
        out.write_u16::<O>(phnum as u16).unwrap();
        out.write_u16::<O>(0).unwrap(); // e_shentsize
        out.write_u16::<O>(0).unwrap(); // e_shnum
        out.write_u16::<O>(0).unwrap(); // e_shstrndx

        // One PT_LOAD mapping the whole file at vaddr 0, so virtual
        // addresses equal file offsets.
        write_phdr::<O>(&mut out, is64, PT_LOAD, 0, total, 0x1000);
        if self.with_dynamic {
            write_phdr::<O>(&mut out, is64, PT_DYNAMIC, dyn_off, dyn_size, 8);
            for (tag, value) in &entries {
                if is64 {
                    out.write_i64::<O>(*tag).unwrap();
                    out.write_u64::<O>(*value).unwrap();
                } else {
                    out.write_i32::<O>(*tag as i32).unwrap();
                    out.write_u32::<O>(*value as u32).unwrap();
                }
            }
            out.extend_from_slice(&strtab);
        }
        out
    }
}

fn write_word<O: ByteOrder>(out: &mut Vec<u8>, is64: bool, value: u64) {
    if is64 {
        out.write_u64::<O>(value).unwrap();
    } else {
        out.write_u32::<O>(value as u32).unwrap();
    }
}

fn write_phdr<O: ByteOrder>(
    out: &mut Vec<u8>,
    is64: bool,
    p_type: u32,
    offset: u64,
    size: u64,
    align: u64,
) {
    out.write_u32::<O>(p_type).unwrap();
    if is64 {
        out.write_u32::<O>(PF_R).unwrap();
        for value in [offset, offset, offset, size, size, align] {
            out.write_u64::<O>(value).unwrap();
        }
    } else {
        // 32-bit program headers carry p_flags after p_memsz.
        for value in [offset, offset, offset, size, size] {
            out.write_u32::<O>(value as u32).unwrap();
        }
        out.write_u32::<O>(PF_R).unwrap();
        out.write_u32::<O>(align as u32).unwrap();
    }
}
