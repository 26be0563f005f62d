// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of a Chip-8 [Insn]
//!
//! Operand fields sit at fixed bit positions in the instruction word:
//!
//! | field | bits  | meaning                      |
//! |-------|-------|------------------------------|
//! | `x`   | 8..12 | register index               |
//! | `y`   | 4..8  | register index               |
//! | `k`   | 0..8  | immediate byte               |
//! | `N`   | 0..12 | address                      |
//! | `n`   | 0..4  | nibble (sprite height)       |

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

#[allow(non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A decoded Chip-8 instruction
pub enum Insn {
    /// | 00e0 | Turn every pixel off
    #[opcode = "0x00e0"]
    Cls,
    /// | 00ee | Pop the return address off the stack
    #[opcode = "0x00ee"]
    Ret,
    /// | 1NNN | Jump to N
    #[opcode = "0x1NNN"]
    Jump { N: u16 },
    /// | 2NNN | Push pc, then jump to N
    #[opcode = "0x2NNN"]
    Call { N: u16 },
    /// | 3xkk | Skip if vX == k
    #[opcode = "0x3xkk"]
    SkipEqImm { x: usize, k: u8 },
    /// | 4xkk | Skip if vX != k
    #[opcode = "0x4xkk"]
    SkipNeImm { x: usize, k: u8 },
    /// | 5xy0 | Skip if vX == vY
    #[opcode = "0x5xy0"]
    SkipEq { x: usize, y: usize },
    /// | 6xkk | vX = k
    #[opcode = "0x6xkk"]
    LoadImm { x: usize, k: u8 },
    /// | 7xkk | vX += k, no carry
    #[opcode = "0x7xkk"]
    AddImm { x: usize, k: u8 },
    /// | 8xy0 | vX = vY
    #[opcode = "0x8xy0"]
    Load { x: usize, y: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    Or { x: usize, y: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    And { x: usize, y: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    Xor { x: usize, y: usize },
    /// | 8xy4 | vX += vY, vF = carry
    #[opcode = "0x8xy4"]
    Add { x: usize, y: usize },
    /// | 8xy5 | vX -= vY, vF = !borrow
    #[opcode = "0x8xy5"]
    Sub { x: usize, y: usize },
    /// | 8xy6 | vX >>= 1, vF = shifted-out bit
    #[opcode = "0x8xy6"]
    Shr { x: usize, y: usize },
    /// | 8xy7 | vX = vY - vX, vF = !borrow
    #[opcode = "0x8xy7"]
    SubN { x: usize, y: usize },
    /// | 8xyE | vX <<= 1, vF = shifted-out bit
    #[opcode = "0x8xye"]
    Shl { x: usize, y: usize },
    /// | 9xy0 | Skip if vX != vY
    #[opcode = "0x9xy0"]
    SkipNe { x: usize, y: usize },
    /// | ANNN | I = N
    #[opcode = "0xaNNN"]
    LoadI { N: u16 },
    /// | BNNN | Jump to N + v0
    #[opcode = "0xbNNN"]
    JumpV0 { N: u16 },
    /// | Cxkk | vX = random & k
    #[opcode = "0xcxkk"]
    Rand { x: usize, k: u8 },
    /// | Dxyn | Draw an n-row sprite from I at (vX, vY)
    #[opcode = "0xdxyn"]
    Draw { x: usize, y: usize, n: u8 },
    /// | Ex9E | Skip if key vX is held
    #[opcode = "0xex9e"]
    SkipKey { x: usize },
    /// | ExA1 | Skip if key vX is not held
    #[opcode = "0xexa1"]
    SkipNotKey { x: usize },
    /// | Fx07 | vX = DT
    #[opcode = "0xfx07"]
    GetDelay { x: usize },
    /// | Fx0A | Wait for a key, then vX = key
    #[opcode = "0xfx0a"]
    WaitKey { x: usize },
    /// | Fx15 | DT = vX
    #[opcode = "0xfx15"]
    SetDelay { x: usize },
    /// | Fx18 | ST = vX
    #[opcode = "0xfx18"]
    SetSound { x: usize },
    /// | Fx1E | I += vX
    #[opcode = "0xfx1e"]
    AddI { x: usize },
    /// | Fx29 | I = address of the font glyph for vX
    #[opcode = "0xfx29"]
    Font { x: usize },
    /// | Fx33 | Store the decimal digits of vX at I, I+1, I+2
    #[opcode = "0xfx33"]
    Bcd { x: usize },
    /// | Fx55 | Store v0..=vX at I
    #[opcode = "0xfx55"]
    Store { x: usize },
    /// | Fx65 | Load v0..=vX from I
    #[opcode = "0xfx65"]
    Restore { x: usize },
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::Cls                => write!(f, "CLS"),
            Insn::Ret                => write!(f, "RET"),
            Insn::Jump { N }         => write!(f, "JP   {N:03x}"),
            Insn::Call { N }         => write!(f, "CALL {N:03x}"),
            Insn::SkipEqImm { x, k } => write!(f, "SE   v{x:X}, #{k:02x}"),
            Insn::SkipNeImm { x, k } => write!(f, "SNE  v{x:X}, #{k:02x}"),
            Insn::SkipEq { x, y }    => write!(f, "SE   v{x:X}, v{y:X}"),
            Insn::LoadImm { x, k }   => write!(f, "LD   v{x:X}, #{k:02x}"),
            Insn::AddImm { x, k }    => write!(f, "ADD  v{x:X}, #{k:02x}"),
            Insn::Load { x, y }      => write!(f, "LD   v{x:X}, v{y:X}"),
            Insn::Or { x, y }        => write!(f, "OR   v{x:X}, v{y:X}"),
            Insn::And { x, y }       => write!(f, "AND  v{x:X}, v{y:X}"),
            Insn::Xor { x, y }       => write!(f, "XOR  v{x:X}, v{y:X}"),
            Insn::Add { x, y }       => write!(f, "ADD  v{x:X}, v{y:X}"),
            Insn::Sub { x, y }       => write!(f, "SUB  v{x:X}, v{y:X}"),
            Insn::Shr { x, y }       => write!(f, "SHR  v{x:X}, v{y:X}"),
            Insn::SubN { x, y }      => write!(f, "SUBN v{x:X}, v{y:X}"),
            Insn::Shl { x, y }       => write!(f, "SHL  v{x:X}, v{y:X}"),
            Insn::SkipNe { x, y }    => write!(f, "SNE  v{x:X}, v{y:X}"),
            Insn::LoadI { N }        => write!(f, "LD   I, {N:03x}"),
            Insn::JumpV0 { N }       => write!(f, "JP   v0, {N:03x}"),
            Insn::Rand { x, k }      => write!(f, "RND  v{x:X}, #{k:02x}"),
            Insn::Draw { x, y, n }   => write!(f, "DRW  v{x:X}, v{y:X}, #{n:x}"),
            Insn::SkipKey { x }      => write!(f, "SKP  v{x:X}"),
            Insn::SkipNotKey { x }   => write!(f, "SKNP v{x:X}"),
            Insn::GetDelay { x }     => write!(f, "LD   v{x:X}, DT"),
            Insn::WaitKey { x }      => write!(f, "LD   v{x:X}, K"),
            Insn::SetDelay { x }     => write!(f, "LD   DT, v{x:X}"),
            Insn::SetSound { x }     => write!(f, "LD   ST, v{x:X}"),
            Insn::AddI { x }         => write!(f, "ADD  I, v{x:X}"),
            Insn::Font { x }         => write!(f, "LD   F, v{x:X}"),
            Insn::Bcd { x }          => write!(f, "LD   B, v{x:X}"),
            Insn::Store { x }        => write!(f, "LD   [I], v{x:X}"),
            Insn::Restore { x }      => write!(f, "LD   v{x:X}, [I]"),
        }
    }
}
