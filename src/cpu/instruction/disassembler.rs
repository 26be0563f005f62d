// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
use super::Insn;
use imperative_rs::InstructionSet;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Dis {
    /// A disassembler which applies no styling, for plain-text output
    pub fn plain() -> Self {
        Self {
            invalid: Style::new(),
            normal: Style::new(),
        }
    }
}

impl Disassembler for Dis {
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let dis = Dis::plain();
    /// assert!(dis.once(0x632a).contains("LD   v3, #2a"));
    /// assert!(dis.once(0x5121).contains("???  5121"));
    /// ```
    fn once(&self, insn: u16) -> String {
        match Insn::decode(&insn.to_be_bytes()) {
            Ok((_, insn)) => format!("{}", insn.style(self.normal)),
            Err(_) => format!("{}", format_args!("???  {insn:04x}").style(self.invalid)),
        }
    }
}
