#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

/// Address the program counter points at after reset: the first byte past
/// the zero page.
pub const RESET_PC: u16 = 0x0100;

/// Destination of a register-load instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
}

/// Index register used by the indexed addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct Registers {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            pc: RESET_PC,
            sp: 0x00,
            a: 0x00,
            x: 0x00,
            y: 0x00,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn get(&self, register: Register) -> u8 {
        match register {
            Register::A => self.a,
            Register::X => self.x,
            Register::Y => self.y,
        }
    }

    /// Store `value` into `register` and hand it back so the caller can
    /// derive flags from the stored value.
    pub fn load(&mut self, register: Register, value: u8) -> u8 {
        let slot = match register {
            Register::A => &mut self.a,
            Register::X => &mut self.x,
            Register::Y => &mut self.y,
        };
        *slot = value;
        value
    }

    pub fn index(&self, index: Index) -> u8 {
        match index {
            Index::X => self.x,
            Index::Y => self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_values() {
        let mut regs = Registers {
            pc: 0x1234,
            sp: 0xFF,
            a: 1,
            x: 2,
            y: 3,
        };
        regs.reset();
        assert_eq!(regs.pc, 0x0100);
        assert_eq!(regs.sp, 0x00);
        assert_eq!((regs.a, regs.x, regs.y), (0, 0, 0));
    }

    #[test]
    fn test_load_targets_only_one_register() {
        let mut regs = Registers::new();
        assert_eq!(regs.load(Register::X, 0x42), 0x42);
        assert_eq!(regs.x, 0x42);
        assert_eq!(regs.a, 0x00);
        assert_eq!(regs.y, 0x00);
        assert_eq!(regs.get(Register::X), 0x42);
    }

    #[test]
    fn test_index_selects_x_or_y() {
        let regs = Registers {
            x: 0x01,
            y: 0x02,
            ..Registers::new()
        };
        assert_eq!(regs.index(Index::X), 0x01);
        assert_eq!(regs.index(Index::Y), 0x02);
    }
}
