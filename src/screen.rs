// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! Each cell is a full `u32`, so the buffer can be handed straight to a
//! framebuffer-style consumer. Cells are only ever [PIXEL_ON] or [PIXEL_OFF].

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in cells
pub const WIDTH: usize = 64;
/// Height of the screen, in cells
pub const HEIGHT: usize = 32;
/// Value of a lit cell
pub const PIXEL_ON: u32 = 0xffff_ffff;
/// Value of a dark cell
pub const PIXEL_OFF: u32 = 0x0000_0000;

/// The 64x32 monochrome display
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<u32>,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            pixels: vec![PIXEL_OFF; WIDTH * HEIGHT],
        }
    }
}

impl Screen {
    /// Constructs a new, dark screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns every cell off
    pub fn clear(&mut self) -> &mut Self {
        self.pixels.fill(PIXEL_OFF);
        self
    }

    /// Gets the cell at (x, y), or [None] if it's off the grid
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < WIDTH && y < HEIGHT {
            self.pixels.get(y * WIDTH + x).copied()
        } else {
            None
        }
    }

    /// Returns true if the cell at (x, y) is on the grid and lit
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(PIXEL_ON)
    }

    /// XORs the cell at (x, y), returning whether it was lit beforehand.
    ///
    /// Off-grid cells are left alone, and report false.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut screen = Screen::default();
    /// assert!(!screen.toggle(3, 4)); // turned on, no collision
    /// assert!(screen.is_lit(3, 4));
    /// assert!(screen.toggle(3, 4)); // turned off, collision
    /// assert!(!screen.toggle(64, 0)); // off the grid
    /// ```
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        match self.pixels.get_mut(y * WIDTH + x) {
            Some(cell) => {
                let was_lit = *cell == PIXEL_ON;
                *cell ^= PIXEL_ON;
                was_lit
            }
            None => false,
        }
    }

    /// Gets the row-major cell buffer
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

impl Display for Screen {
    /// Renders the screen as text, two cell-rows per line of output
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for y in (0..HEIGHT).step_by(2) {
            for x in 0..WIDTH {
                let glyph = match (self.is_lit(x, y), self.is_lit(x, y + 1)) {
                    (false, false) => ' ',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (true, true) => '█',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
