// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Platform-specific IO/UI code, and some debug functionality.

use crate::Result;
use minifb::*;
use owo_colors::OwoColorize;
use pipit::{Chip8, Screen, HEIGHT, PIXEL_ON, WIDTH};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width,
            height,
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            fb: FrameBuffer::new(self.width, self.height),
            rom: self.rom.to_owned().unwrap_or_default(),
            time: Instant::now(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: WIDTH,
            height: HEIGHT,
            name: Some("Pipit"),
            rom: None,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

/// Colors used to present lit and dark cells
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001E2431,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            buffer: vec![0x00be4d; width * height],
            width,
            height,
            format: Default::default(),
        }
    }
    /// Recolors the screen's cells into the buffer
    pub fn update(&mut self, screen: &Screen) -> &[u32] {
        for (cell, &pixel) in self.buffer.iter_mut().zip(screen.pixels()) {
            *cell = if pixel == PIXEL_ON {
                self.format.fg
            } else {
                self.format.bg
            }
        }
        &self.buffer
    }
    pub fn render(&mut self, window: &mut Window, screen: &Screen) -> Result<()> {
        let (width, height) = (self.width, self.height);
        window.update_with_buffer(self.update(screen), width, height)?;
        Ok(())
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    rom: PathBuf,
    time: Instant,
}

impl UI {
    pub fn frame(&mut self, ch8: &mut Chip8) -> Result<bool> {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let note = if ch8.cpu.is_sounding() { " ♪" } else { "" };
        if ch8.cpu.flags.pause {
            self.window.set_title(&format!("Pipit ⏸ {name}{note}"))
        } else {
            self.window.set_title(&format!(
                "Pipit ▶ {:02.02} {name}{note}",
                (1.0 / self.time.elapsed().as_secs_f64())
            ));
        }
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // update framebuffer
        self.fb.render(&mut self.window, &ch8.screen)?;
        Ok(true)
    }

    pub fn keys(&mut self, ch8: &mut Chip8) -> Result<bool> {
        // minifb reports held keys, so presses and releases are found by diffing frames
        let held = self.window.get_keys();
        let released: Vec<Key> = self
            .keyboard
            .iter()
            .copied()
            .filter(|key| !held.contains(key))
            .collect();
        let pressed: Vec<Key> = held
            .iter()
            .copied()
            .filter(|key| !self.keyboard.contains(key))
            .collect();
        for key in released {
            if let Some(key) = identify_key(key) {
                ch8.cpu.release(key)?;
            }
        }
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                F1 | Comma => ch8.cpu.dump(),
                F2 | Period => print!("{}", ch8.screen),
                F4 | Slash => {
                    ch8.cpu.flags.debug();
                    eprintln!(
                        "Debug {}.",
                        if ch8.cpu.flags.debug {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    )
                }
                F5 | Backslash => {
                    ch8.cpu.flags.pause();
                    eprintln!(
                        "{}.",
                        if ch8.cpu.flags.pause {
                            "Paused"
                        } else {
                            "Unpaused"
                        }
                    )
                }
                F6 | Enter => {
                    eprintln!("Step");
                    if let Err(e) = ch8.cpu.singlestep(&mut ch8.screen) {
                        eprintln!("{}", e.bold().red());
                    }
                }
                F7 => {
                    eprintln!("Set breakpoint {:03x}.", ch8.cpu.pc());
                    ch8.cpu.set_break(ch8.cpu.pc());
                }
                F8 => {
                    eprintln!("Unset breakpoint {:03x}.", ch8.cpu.pc());
                    ch8.cpu.unset_break(ch8.cpu.pc());
                }
                F9 | Delete => {
                    eprintln!("Soft reset state.cpu {:03x}", ch8.cpu.pc());
                    ch8.cpu.soft_reset();
                    ch8.screen.clear();
                }
                Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        ch8.cpu.press(key)?;
                    }
                }
            }
        }
        self.keyboard = held;
        Ok(true)
    }
}

/// Maps the left side of a QWERTY keyboard onto the hex keypad
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xd),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xe),
        Key::Z => Some(0xa),
        Key::X => Some(0x0),
        Key::C => Some(0xb),
        Key::V => Some(0xf),
        _ => None,
    }
}
