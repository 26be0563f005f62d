//! Controls the [Quirks] behavior of the CPU on a granular level.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is the modern, CHIP-48-like behavior. `true` is Cosmac-VIP-like behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Cosmac VIP: Binary ops in `8xy`(`1`, `2`, `3`) set vF to 0
    pub vf_reset: bool,
    /// Cosmac VIP: Shift ops in `8xy`(`6`, `E`) source from vY instead of vX
    pub shift_vy: bool,
    /// Cosmac VIP: DMA instructions `Fx55`/`Fx65` change I to I + x + 1
    pub dma_inc: bool,
    /// XO-Chip: Draw operations wrap from bottom to top and side to side
    pub screen_wrap: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        Quirks {
            vf_reset: value,
            shift_vy: value,
            dma_inc: value,
            screen_wrap: false,
        }
    }
}
