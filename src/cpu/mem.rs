// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::{
    error::{Error, Result},
    traits::Grab,
};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Size of the Chip-8 address space
pub const MEMORY_SIZE: usize = 0x1000;
/// Address of the built-in font glyphs
pub const FONT_ADDR: usize = 0x050;
/// Address programs are loaded at, and where execution starts
pub const PROGRAM_ADDR: usize = 0x200;

/// The 4x5 hexadecimal font, 5 bytes per glyph, glyphs `0` through `F`
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Creates a new [Mem], growing as needed
/// # Examples
/// ```rust
/// # use pipit::*;
/// let mut mem = mem! {
///     Charset [0x0050..0x00a0] = &FONT,
///     Program [0x0200..0x1000] = b"\x00\xe0",
/// };
/// assert_eq!(0x1000, mem.len());
/// ```
#[macro_export]
macro_rules! mem {
    ($($name:path $(:)? [$range:expr] $(= $data:expr)?) ,* $(,)?) => {
        $crate::cpu::mem::Mem::new()$(.add_region_owned($name, $range)$(.load_region_owned($name, $data))?)*
    };
}

impl Grab for Mem {
    /// Gets a slice of [Mem] memory
    /// # Examples
    /// ```rust
    ///# use pipit::*;
    ///# fn main() -> Result<()> {
    ///     let mem = Mem::new()
    ///         .add_region_owned(Program, 0..10);
    ///     assert!([0;10].as_slice() == mem.grab(0..10).unwrap());
    ///#    Ok(())
    ///# }
    /// ```
    #[inline(always)]
    fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets a mutable slice of [Mem] memory
    #[inline(always)]
    fn grab_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get_mut(index)
    }
}

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
    #[doc(hidden)]
    /// Total number of named regions
    Count,
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
                _ => "",
            }
        )
    }
}

/// Stores memory in a series of named regions with ranges
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    memory: Vec<u8>,
    region: [Option<Range<usize>>; Region::Count as usize],
}

impl Mem {
    /// Constructs a new, empty mem
    /// # Examples
    /// ```rust
    ///# use pipit::*;
    ///     let mem = Mem::new();
    ///     assert!(mem.is_empty());
    /// ```
    pub fn new() -> Self {
        Mem::default()
    }

    /// Gets the length of the mem's backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Grows the Mem backing memory to at least size bytes, but does not truncate
    fn with_size(&mut self, size: usize) {
        if self.len() < size {
            self.memory.resize(size, 0);
        }
    }

    /// Adds a new named range ([Region]) to an owned [Mem]
    pub fn add_region_owned(mut self, name: Region, range: Range<usize>) -> Self {
        self.add_region(name, range);
        self
    }

    /// Adds a new named range ([Region]) to a [Mem]
    /// # Examples
    /// ```rust
    ///# use pipit::*;
    ///     let mut mem = Mem::new();
    ///     mem.add_region(Program, 0..1234);
    ///     assert_eq!(1234, mem.len());
    /// ```
    pub fn add_region(&mut self, name: Region, range: Range<usize>) -> &mut Self {
        self.with_size(range.end);
        if let Some(region) = self.region.get_mut(name as usize) {
            *region = Some(range);
        }
        self
    }

    /// Loads data into a [Region] on an *owned* [Mem], for use during initialization
    pub fn load_region_owned(mut self, name: Region, data: &[u8]) -> Self {
        self.load_region(name, data).ok();
        self
    }

    /// Loads data into the start of a named [Region]
    ///
    /// Data which does not fit in the region is rejected whole,
    /// and the region is left untouched.
    /// # Examples
    /// ```rust
    ///# use pipit::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new()
    ///         .add_region_owned(Program, 0..4);
    ///     mem.load_region(Program, b"ABC")?;
    ///     assert_eq!(Some(b"ABC\0".as_slice()), mem.get_region(Program));
    ///     assert!(mem.load_region(Program, b"ABCDE").is_err());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let region = self
            .get_region_mut(name)
            .ok_or(Error::MissingRegion { region: name })?;
        if data.len() > region.len() {
            return Err(Error::ProgramTooLarge {
                len: data.len(),
                max: region.len(),
            });
        }
        region[..data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    ///
    /// If the region doesn't exist, that's okay.
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        if let Some(region) = self.get_region_mut(name) {
            region.fill(0)
        }
        self
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> Option<&[u8]> {
        self.grab(self.region.get(name as usize)?.clone()?)
    }

    /// Gets a mutable slice of a named region of memory
    #[inline(always)]
    pub fn get_region_mut(&mut self, name: Region) -> Option<&mut [u8]> {
        self.grab_mut(self.region.get(name as usize)?.clone()?)
    }
}

impl Display for Mem {
    /// Hexdumps the memory, 16 bytes per line, skipping all-zero lines
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (line, bytes) in self.memory.chunks(16).enumerate() {
            if bytes.iter().all(|&b| b == 0) {
                continue;
            }
            write!(f, "{:03x}:", line * 16)?;
            for (idx, byte) in bytes.iter().enumerate() {
                if idx % 2 == 0 {
                    write!(f, " ")?;
                }
                write!(f, "{byte:02x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
