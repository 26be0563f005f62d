// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::{mem::FONT_ADDR, *};
use crate::{
    screen::{HEIGHT, WIDTH},
    traits::Grab,
};
use rand::Rng;

impl CPU {
    /// Executes a single [Insn]
    ///
    /// Errors are diagnostics: the instruction that raised one did nothing else.
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, screen: &mut Screen, instruction: Insn) -> Result<()> {
        match instruction {
            Insn::Cls                 => self.clear_screen(screen),
            Insn::Ret                 => self.ret()?,
            Insn::Jump       {    N } => self.jump(N),
            Insn::Call       {    N } => self.call(N)?,
            Insn::SkipEqImm  { x, k } => self.skip_equals_immediate(x, k),
            Insn::SkipNeImm  { x, k } => self.skip_not_equals_immediate(x, k),
            Insn::SkipEq     { x, y } => self.skip_equals(x, y),
            Insn::LoadImm    { x, k } => self.load_immediate(x, k),
            Insn::AddImm     { x, k } => self.add_immediate(x, k),
            Insn::Load       { x, y } => self.load(x, y),
            Insn::Or         { x, y } => self.or(x, y),
            Insn::And        { x, y } => self.and(x, y),
            Insn::Xor        { x, y } => self.xor(x, y),
            Insn::Add        { x, y } => self.add(x, y),
            Insn::Sub        { x, y } => self.sub(x, y),
            Insn::Shr        { x, y } => self.shift_right(x, y),
            Insn::SubN       { x, y } => self.backwards_sub(x, y),
            Insn::Shl        { x, y } => self.shift_left(x, y),
            Insn::SkipNe     { x, y } => self.skip_not_equals(x, y),
            Insn::LoadI      {    N } => self.load_i_immediate(N),
            Insn::JumpV0     {    N } => self.jump_indexed(N),
            Insn::Rand       { x, k } => self.rand(x, k),
            Insn::Draw    { x, y, n } => self.draw(x, y, n, screen),
            Insn::SkipKey    { x    } => self.skip_key_equals(x),
            Insn::SkipNotKey { x    } => self.skip_key_not_equals(x),
            Insn::GetDelay   { x    } => self.load_delay_timer(x),
            Insn::WaitKey    { x    } => self.wait_for_key(x),
            Insn::SetDelay   { x    } => self.store_delay_timer(x),
            Insn::SetSound   { x    } => self.store_sound_timer(x),
            Insn::AddI       { x    } => self.add_i(x),
            Insn::Font       { x    } => self.load_sprite(x),
            Insn::Bcd        { x    } => self.bcd_convert(x)?,
            Insn::Store      { x    } => self.store_dma(x)?,
            Insn::Restore    { x    } => self.load_dma(x)?,
        }
        Ok(())
    }
}

/// |`0nnn`| Machine-language routines are not supported, and decode as unknown
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Turn off every pixel               |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Turns off every pixel on the screen
    #[inline(always)]
    pub(super) fn clear_screen(&mut self, screen: &mut Screen) {
        screen.clear();
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// Returning with an empty stack does nothing, and reports [Error::StackUnderflow]
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<()> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp];
        Ok(())
    }
}

/// |`1NNN`| Sets pc to an absolute address
impl CPU {
    /// |`1NNN`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        self.pc = a;
    }
}

/// |`2NNN`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2NNN`| Pushes pc onto the stack, then jumps to a
    ///
    /// Calling with a full stack does nothing, and reports [Error::StackOverflow]
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp)
            .ok_or(Error::StackOverflow { addr: a })?;
        *slot = self.pc;
        self.sp += 1;
        self.pc = a;
        Ok(())
    }
}

/// |`3xkk`| Skips next instruction if register X == k
impl CPU {
    /// |`3xkk`| Skips the next instruction if register X == k
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, k: u8) {
        if self.v[x] == k {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`4xkk`| Skips next instruction if register X != k
impl CPU {
    /// |`4xkk`| Skips the next instruction if register X != k
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, k: u8) {
        if self.v[x] != k {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`5xy0`| Skips next instruction if vX == vY
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`6xkk`| Loads immediate byte k into register vX
impl CPU {
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, k: u8) {
        self.v[x] = k;
    }
}

/// |`7xkk`| Adds immediate byte k to register vX, without touching vF
impl CPU {
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, k: u8) {
        self.v[x] = self.v[x].wrapping_add(k);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X \| Y                         |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; vF = carry              |
/// |`8xy5`| X = X - Y; vF = X > Y              |
/// |`8xy6`| X = X >> 1; vF = bit shifted out   |
/// |`8xy7`| X = Y - X; vF = Y > X              |
/// |`8xyE`| X = X << 1; vF = bit shifted out   |
///
/// Flags are computed from the operands, then written before the result,
/// so when X is vF, the result is what remains in vF.
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
        self.reset_vf();
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
        self.reset_vf();
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
        self.reset_vf();
    }
    #[inline(always)]
    fn reset_vf(&mut self) {
        if self.flags.quirks.vf_reset {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
        self.v[x] = sum;
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let (vx, vy) = (self.v[x], self.v[y]);
        self.v[0xf] = (vx > vy).into();
        self.v[x] = vx.wrapping_sub(vy);
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let src = self.v[if self.flags.quirks.shift_vy { y } else { x }];
        self.v[0xf] = src & 1;
        self.v[x] = src >> 1;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let (vx, vy) = (self.v[x], self.v[y]);
        self.v[0xf] = (vy > vx).into();
        self.v[x] = vy.wrapping_sub(vx);
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let src = self.v[if self.flags.quirks.shift_vy { y } else { x }];
        self.v[0xf] = src >> 7;
        self.v[x] = src << 1;
    }
}

/// |`9xy0`| Skips next instruction if vX != vY
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`ANNN`| Load address #N into register I
impl CPU {
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a;
    }
}

/// |`BNNN`| Jump to &N + v0
impl CPU {
    /// |`BNNN`| Jump to &N + v0, wrapping within the 12-bit address space
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) {
        self.pc = a.wrapping_add(self.v[0] as Adr) & 0xfff;
    }
}

/// |`Cxkk`| Stores a random number & the provided byte into vX
impl CPU {
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, k: u8) {
        self.v[x] = self.rng.gen::<u8>() & k;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// The origin always wraps onto the screen. Sprite bits past the right or bottom
    /// edge are dropped, and rows past the end of memory are skipped.
    ///
    /// # Quirk
    /// With `screen_wrap` set, sprite bits past the edge wrap around instead
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib, screen: &mut Screen) {
        let (x, y) = (self.v[x] as usize % WIDTH, self.v[y] as usize % HEIGHT);
        let wrap = self.flags.quirks.screen_wrap;
        self.v[0xf] = 0;
        for row in 0..n as usize {
            let Some(&sprite) = self.mem.grab(self.i as usize + row) else {
                continue;
            };
            for col in (0..8).filter(|col| sprite & (0x80 >> col) != 0) {
                let (px, py) = match wrap {
                    true => ((x + col) % WIDTH, (y + row) % HEIGHT),
                    false => (x + col, y + row),
                };
                if px >= WIDTH || py >= HEIGHT {
                    continue;
                }
                if screen.toggle(px, py) {
                    self.v[0xf] = 1;
                }
            }
        }
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key == vX |
/// |`eXa1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key == vX
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) {
        if self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`ExA1`| Skip next instruction if key != vX
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) {
        if !self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// Polls the keypad: with no key held, the instruction runs again next tick.
    /// Otherwise, the lowest held key wins.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        match self.keys.iter().position(|&held| held) {
            Some(key) => self.v[x] = key as u8,
            None => self.pc = self.pc.wrapping_sub(2),
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`Fx1e`| Add vX to I, keeping I inside the 12-bit address space
    /// ```py
    /// I = (I + vX) & 0xfff;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr) & 0xfff;
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = 0x50 + vX * 5;
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        self.i = FONT_ADDR as Adr + 5 * self.v[x] as Adr;
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    ///
    /// Writes nothing if any of the three bytes would land past the end of memory
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Result<()> {
        let (x, i) = (self.v[x], self.i as usize);
        let digits = self
            .mem
            .grab_mut(i..i + 3)
            .ok_or(Error::InvalidAddressRange { range: i..i + 3 })?;
        digits.copy_from_slice(&[x / 100, x / 10 % 10, x % 10]);
        Ok(())
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// # Quirk
    /// The original chip-8 interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) -> Result<()> {
        let i = self.i as usize;
        self.mem
            .grab_mut(i..=i + x)
            .ok_or(Error::InvalidAddressRange { range: i..i + x + 1 })?
            .copy_from_slice(&self.v[..=x]);
        self.increment_i(x);
        Ok(())
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// # Quirk
    /// The original chip-8 interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) -> Result<()> {
        let i = self.i as usize;
        let src = self
            .mem
            .grab(i..=i + x)
            .ok_or(Error::InvalidAddressRange { range: i..i + x + 1 })?;
        self.v[..=x].copy_from_slice(src);
        self.increment_i(x);
        Ok(())
    }
    #[inline(always)]
    fn increment_i(&mut self, x: Reg) {
        if self.flags.quirks.dma_inc {
            self.i = self.i.wrapping_add(x as Adr + 1) & 0xfff;
        }
    }
}
