// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Pipit: A chip-8 interpreter in Rust
//! Hello, world!

#[cfg(test)]
mod tests;
mod ui;

use gumdrop::*;
use owo_colors::OwoColorize;
use pipit::{Chip8, Flags, Quirks};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use thiserror::Error;
use ui::*;

/// Result type for the front end
pub type Result<T> = std::result::Result<T, Error>;

/// Errors which end the front end's main loop
#[derive(Debug, Error)]
pub enum Error {
    /// Error originated in the interpreter
    #[error(transparent)]
    Pipit(#[from] pipit::Error),
    /// Error originated in [std::io]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error originated in [minifb]
    #[error(transparent)]
    Window(#[from] minifb::Error),
}

pub fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let state = State::new(options)?;
    for result in state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    Ok(())
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Pipit.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10")]
    pub speed: usize,
    #[options(
        help = "Set the instructions-per-timer-tick rate. If unspecified, tick once per frame."
    )]
    pub timer: Option<usize>,

    #[options(no_short, help = "Use the COSMAC VIP quirk set.")]
    pub vip: bool,
    #[options(short = "z", help = "Set vF to 0 after a bitwise operation.")]
    pub vfreset: bool,
    #[options(short = "c", help = "Use COSMAC VIP style DMA instructions, which advance I.")]
    pub memory: bool,
    #[options(short = "v", help = "Use COSMAC VIP style bit-shifts, which shift vY.")]
    pub shift: bool,
    #[options(short = "w", help = "Wrap sprites around the screen edges, instead of clipping.")]
    pub wrap: bool,

    #[options(
        long = "break",
        help = "Set breakpoints for the emulator to stop at.",
        parse(try_from_str = "parse_hex"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,

    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}

impl Arguments {
    fn quirks(&self) -> Quirks {
        let vip = Quirks::from(self.vip);
        Quirks {
            vf_reset: vip.vf_reset || self.vfreset,
            shift_vy: vip.shift_vy || self.shift,
            dma_inc: vip.dma_inc || self.memory,
            screen_wrap: self.wrap,
        }
    }
}

#[derive(Debug)]
struct State {
    pub speed: usize,
    pub rate: u64,
    pub ch8: Chip8,
    pub ui: UI,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let flags = Flags {
            debug: options.debug,
            pause: options.pause,
            quirks: options.quirks(),
            monotonic: options.timer,
        };
        let mut ch8 = Chip8::new(&options.file, flags);
        for &point in &options.breakpoints {
            ch8.cpu.set_break(point);
        }
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate.max(1),
            ch8,
            ui: UIBuilder::new(64, 32, &options.file).build()?,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.ch8)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.ch8)
    }
    fn tick_cpu(&mut self) -> pipit::Result<()> {
        if !self.ch8.cpu.flags.pause {
            self.ch8.frame(self.speed)?;
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame, ending when the window closes
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        // Interpreter errors are reported, and the machine keeps running
        match self.tick_cpu() {
            Err(pipit::Error::BreakpointHit { addr, next }) => {
                eprintln!("Breakpoint hit: {:3x} ({:4x})", addr, next);
            }
            Err(e) => eprintln!("{}", e.bold().red()),
            _ => (),
        }
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
