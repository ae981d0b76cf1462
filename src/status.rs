//! Processor status register.
//!
//! The 6502 packs its condition flags into a single byte, but nothing in the
//! execution core needs the packed form except tracing, so each flag is kept
//! as its own boolean and [`Status::to_byte`] builds the classic `P` value.

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

// Status flag bits in the packed P register
pub const FLAG_C: u8 = 0x01; // Carry
pub const FLAG_Z: u8 = 0x02; // Zero
pub const FLAG_I: u8 = 0x04; // Interrupt Disable
pub const FLAG_D: u8 = 0x08; // Decimal Mode
pub const FLAG_B: u8 = 0x10; // Break
pub const FLAG_U: u8 = 0x20; // Unused (always 1)
pub const FLAG_V: u8 = 0x40; // Overflow
pub const FLAG_N: u8 = 0x80; // Negative

/// The seven condition flags. All clear after reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct Status {
    pub carry: bool,
    pub zero: bool,
    pub interrupt: bool,
    pub decimal_mode: bool,
    pub r#break: bool,
    pub overflow: bool,
    pub negative: bool,
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zero and negative follow the value a register was just loaded with.
    pub fn update_zero_negative(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = value & 0x80 != 0;
    }

    /// Packed P register, unused bit set.
    pub fn to_byte(self) -> u8 {
        let mut p = FLAG_U;
        for (set, flag) in [
            (self.carry, FLAG_C),
            (self.zero, FLAG_Z),
            (self.interrupt, FLAG_I),
            (self.decimal_mode, FLAG_D),
            (self.r#break, FLAG_B),
            (self.overflow, FLAG_V),
            (self.negative, FLAG_N),
        ] {
            if set {
                p |= flag;
            }
        }
        p
    }
}
