// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![warn(missing_docs)]
//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture:
//! a [CPU] that fetches, decodes, and executes one instruction at a time, reading
//! a 4KiB [Mem] and drawing into a 64x32 [Screen].
//!
//! Nothing the interpreter does is fatal. Misbehaving programs produce [Error]s
//! which the caller reports, and the machine keeps running.

pub mod cpu;
pub mod error;
pub mod screen;
pub mod traits;

use std::path::Path;

// Common imports for pipit
pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region::*, FONT, FONT_ADDR, MEMORY_SIZE, PROGRAM_ADDR},
    quirks::Quirks,
    CPU, STACK_DEPTH,
};
pub use error::{Error, Result};
pub use screen::{Screen, HEIGHT, PIXEL_OFF, PIXEL_ON, WIDTH};
pub use traits::{AutoCast, Grab};

/// Holds the state of a Chip-8
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chip8 {
    /// Contains the registers, timers, keypad, and memory of the Chip-8
    pub cpu: CPU,
    /// Contains the display
    pub screen: Screen,
}

impl Chip8 {
    /// Builds a Chip-8 with `rom` loaded into program memory.
    ///
    /// If the ROM can't be loaded, that's reported, and the machine starts with
    /// empty program memory instead.
    pub fn new(rom: impl AsRef<Path>, flags: Flags) -> Self {
        let mut cpu = CPU::default();
        cpu.flags = flags;
        if let Err(e) = cpu.load_program(rom.as_ref()) {
            log::warn!("couldn't load {}: {e}", rom.as_ref().display());
        }
        Chip8 {
            cpu,
            screen: Screen::default(),
        }
    }

    /// Executes a single instruction. See [CPU::tick]
    pub fn step(&mut self) -> Result<&mut Self> {
        self.cpu.tick(&mut self.screen)?;
        Ok(self)
    }

    /// Executes `steps` instructions, ticking the timers. See [CPU::multistep]
    pub fn frame(&mut self, steps: usize) -> Result<&mut Self> {
        self.cpu.multistep(&mut self.screen, steps)?;
        Ok(self)
    }

    /// Resets the CPU and clears the screen, keeping the loaded program
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.screen.clear();
    }
}

/// Common imports for pipit
pub mod prelude {
    pub use super::{
        AutoCast, Chip8, Dis, Disassembler, Error, Flags, Grab, Insn, Mem, Quirks, Result,
        Screen, CPU,
    };
}
