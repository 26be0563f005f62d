// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region::*, FONT, MEMORY_SIZE},
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    mem,
    screen::Screen,
    traits::AutoCast,
};
use imperative_rs::InstructionSet;
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fmt::Debug,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 16;

/// Seeds a random source from the wall clock
fn seeded_rng() -> StdRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |time| time.as_nanos() as u64);
    StdRng::seed_from_u64(seed)
}

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], timer cadence, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    stack: [Adr; STACK_DEPTH],
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    // Execution data
    cycle: usize,
    breakpoints: Vec<Adr>,
    #[cfg_attr(feature = "serde", serde(skip, default = "seeded_rng"))]
    rng: StdRng,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the provided ROM loaded at 0x200
    /// # Examples
    /// ```rust,no_run
    /// # use pipit::*;
    /// # fn main() -> Result<()> {
    /// let cpu = CPU::new("roms/IBM Logo.ch8", vec![0x228], Flags::default())?;
    /// dbg!(cpu);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(rom: impl AsRef<Path>, breakpoints: Vec<Adr>, flags: Flags) -> Result<Self> {
        let mut cpu = CPU {
            breakpoints,
            flags,
            ..Default::default()
        };
        cpu.load_program(rom)?;
        Ok(cpu)
    }

    /// Loads a program from disk into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        let bytes = std::fs::read(rom)?;
        self.load_program_bytes(&bytes)?;
        log::info!("loaded {} ({} bytes)", rom.display(), bytes.len());
        Ok(self)
    }

    /// Loads bytes into the CPU's program space, clearing whatever was there.
    ///
    /// Returns [Error::ProgramTooLarge] if the program would run past the end of memory,
    /// in which case memory is left untouched.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(b"\x00\xe0").unwrap();
    /// cpu.load_program_bytes(&[0; 0x1000])
    ///     .expect_err("0x1000 bytes won't fit above 0x200");
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let max = self
            .mem
            .get_region(Program)
            .ok_or(Error::MissingRegion { region: Program })?
            .len();
        if rom.len() > max {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                max,
            });
        }
        self.mem.clear_region(Program);
        self.mem.load_region(Program, rom)?;
        Ok(self)
    }

    /// Reseeds the random number source, for reproducible runs
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(!std::mem::replace(keyref, true))
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(keyref, false))
    }

    /// Releases every key
    pub fn release_all(&mut self) -> &mut Self {
        self.keys = [false; 16];
        self
    }

    /// Gets the state of the keypad, indexed by key
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the number of return addresses on the stack
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the live portion of the call stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp]
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Returns true while the tone should be playing
    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of cycles the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the CPU's memory, mutably
    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Soft resets the CPU, releasing pause and
    /// reinitializing the program counter to 0x200
    pub fn soft_reset(&mut self) {
        self.pc = 0x200;
        self.flags.pause = false;
    }

    /// Resets the emulator.
    ///
    /// Touches the stack, pc, registers, timers, keys, and cycle count.
    ///
    /// Does not touch memory, [Quirks], breakpoints, or the timer cadence.
    pub fn reset(&mut self) {
        self.flags.pause = false;
        // clear the stack
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        // Reset the program counter
        self.pc = 0x200;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; 16];
        // Execution data
        self.cycle = 0;
    }

    /// Set a breakpoint
    pub fn set_break(&mut self, point: Adr) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point)
        }
        self
    }

    /// Unset a breakpoint
    pub fn unset_break(&mut self, point: Adr) -> &mut Self {
        self.breakpoints.retain(|&bp| bp != point);
        self
    }

    /// Gets a slice of breakpoints
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(cpu.breakpoints(), &[]);
    /// ```
    pub fn breakpoints(&self) -> &[Adr] {
        self.breakpoints.as_slice()
    }

    /// Decrements the delay and sound timers, stopping at zero.
    ///
    /// Returns true when the sound timer reaches zero on this tick,
    /// which is when any tone should stop.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert!(!cpu.tick_timers()); // already at zero: nothing happens
    /// ```
    pub fn tick_timers(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        if self.sound == 0 {
            return false;
        }
        self.sound -= 1;
        if self.sound == 0 {
            log::debug!("tone stop at cycle {}", self.cycle);
        }
        self.sound == 0
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::UnimplementedInstruction]
    /// if the instruction is unimplemented.
    ///
    /// NOTE: does not synchronize with delay timers
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.singlestep(&mut screen).unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    pub fn singlestep(&mut self, screen: &mut Screen) -> Result<&mut Self> {
        self.flags.pause = false;
        let result = self.tick(screen).map(|_| ());
        self.flags.pause = true;
        result?;
        Ok(self)
    }

    /// Runs the emulator for `steps` ticks, then ticks the timers
    /// according to [Flags::monotonic].
    ///
    /// A failed tick is logged, and the batch carries on with the next instruction.
    /// The first such error is returned once the batch is done. Hitting a breakpoint
    /// (or otherwise pausing) ends the batch early.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(&mut screen, 0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, screen: &mut Screen, steps: usize) -> Result<&mut Self> {
        if self.flags.monotonic.is_none() && !self.flags.pause {
            self.tick_timers();
        }
        let mut first_error = None;
        for _ in 0..steps {
            if self.flags.pause {
                break;
            }
            let cycle = self.cycle;
            let result = self.tick(screen).map(|_| ());
            if let Some(rate) = self.flags.monotonic {
                if self.cycle != cycle && self.cycle % rate.max(1) == 0 {
                    self.tick_timers();
                }
            }
            match result {
                Err(e @ Error::BreakpointHit { .. }) => return Err(e),
                Err(e) => {
                    log::warn!("{e}");
                    first_error.get_or_insert(e);
                }
                Ok(()) => {}
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// Executes a single instruction
    ///
    /// The program counter moves past the instruction before it executes, so
    /// every error below leaves the CPU ready to run the *next* instruction.
    ///
    /// Returns [Error::BreakpointHit] if a breakpoint was hit after the instruction executed.
    /// This result contains information about the breakpoint, but can be safely ignored.
    /// If the instruction itself failed, it still pauses on the breakpoint, and returns
    /// the instruction's error instead.
    ///
    /// Returns [Error::UnimplementedInstruction] if the instruction at `pc` is unimplemented.
    ///
    /// Returns [Error::StackOverflow] or [Error::StackUnderflow] if a call or return
    /// was dropped.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick(&mut screen)
    ///     .expect_err("Should return Error::UnimplementedInstruction { 0xffff }");
    /// assert_eq!(0x202, cpu.pc());
    /// ```
    pub fn tick(&mut self, screen: &mut Screen) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(self);
        }
        // fetch opcode, stepping over addresses that run off the end of memory
        let word: u16 = match self.mem.read(self.pc) {
            Ok(word) => word,
            Err(e) => {
                self.pc = self.pc.wrapping_add(2) & 0xfff;
                return Err(e);
            }
        };
        self.cycle += 1;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(word)
            );
        }

        self.pc = self.pc.wrapping_add(2);
        // decode opcode
        let result = match Insn::decode(&word.to_be_bytes()) {
            Ok((_, insn)) => self.execute(screen, insn),
            Err(_) => Err(Error::UnimplementedInstruction { word }),
        };

        // process breakpoints, even after a failed instruction
        if self.breakpoints.contains(&self.pc) {
            self.flags.pause = true;
            result?;
            return Err(Error::BreakpointHit {
                addr: self.pc,
                next: self.mem.read(self.pc).unwrap_or_default(),
            });
        }
        result?;
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .field("breakpoints", &self.breakpoints)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with the standard memory map
    ///
    /// | region  | range           | contents
    /// |---------|-----------------|------------
    /// | Charset |`0x050..0x0a0`   | The hexadecimal font
    /// | Program |`0x200..0x1000`  | Empty program memory
    ///
    /// # Examples
    /// ```rust
    /// use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x1000, cpu.mem().len());
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: mem! {
                Charset [0x0050..0x00a0] = &FONT,
                Program [0x0200..MEMORY_SIZE],
            },
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: 0x200,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            cycle: 0,
            breakpoints: vec![],
            rng: seeded_rng(),
            disassembler: Dis::default(),
        }
    }
}
