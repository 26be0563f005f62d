// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Pipit
//!
//! Every error the interpreter produces is recoverable: the machine is left in a
//! consistent state, and the caller may keep stepping after reporting it.

use crate::cpu::mem::Region;
use std::ops::Range;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Pipit.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents a breakpoint being hit
    #[error("breakpoint hit: {addr:03x} ({next:04x})")]
    BreakpointHit {
        /// The address of the breakpoint
        addr: u16,
        /// The instruction after the breakpoint
        next: u16,
    },
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
    },
    /// A subroutine call was issued with all 16 stack slots in use
    #[error("stack overflow: call to {addr:03x} dropped")]
    StackOverflow {
        /// The target of the dropped call
        addr: u16,
    },
    /// A return was issued with an empty stack
    #[error("stack underflow: return with empty stack")]
    StackUnderflow,
    /// The region you asked for was not defined
    #[error("region {region} is not present in memory")]
    MissingRegion {
        /// The offending [Region]
        region: Region,
    },
    /// Tried to fetch data at `range` from memory, received nothing
    #[error("range {range:04x?} is not present in memory")]
    InvalidAddressRange {
        /// The offending range
        range: Range<usize>,
    },
    /// Tried to load a program which does not fit in program memory
    #[error("program is {len} bytes, but only {max} bytes fit in program memory")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Size of the program region
        max: usize,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Error originated in [std::array::TryFromSliceError]
    #[error(transparent)]
    TryFromSliceError(#[from] std::array::TryFromSliceError),
}
