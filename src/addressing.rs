//! Operand resolution for the addressing modes the core models.
//!
//! Every access made while resolving an operand, whether it is a program
//! byte, an index register or the operand itself, charges one cycle.

use crate::cpu::Mos6502;
use crate::memory::Bus;
use crate::registers::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    /// Base + index, wrapping inside the zero page.
    ZeroPageIndexed(Index),
    Absolute,
    /// Base + index as a plain 16-bit add, no page-cross penalty.
    AbsoluteIndexed(Index),
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageIndexed(_) => 1,
            AddressingMode::Absolute | AddressingMode::AbsoluteIndexed(_) => 2,
        }
    }

    /// Cycles charged while resolving, excluding the opcode fetch.
    pub const fn resolve_cycles(self) -> u8 {
        match self {
            AddressingMode::Immediate => 1,
            AddressingMode::ZeroPage => 2,
            AddressingMode::ZeroPageIndexed(_) => 3,
            AddressingMode::Absolute | AddressingMode::AbsoluteIndexed(_) => 3,
        }
    }
}

impl Mos6502 {
    /// Resolve the operand value for `mode`, advancing PC past its bytes.
    pub(crate) fn resolve(&mut self, mode: AddressingMode, bus: &mut dyn Bus) -> u8 {
        match mode {
            AddressingMode::Immediate => self.fetch_next_byte(bus),
            AddressingMode::ZeroPage => {
                let addr = self.fetch_next_byte(bus) as u16;
                self.fetch_byte(addr, bus)
            }
            AddressingMode::ZeroPageIndexed(index) => {
                let base = self.fetch_next_byte(bus);
                let offset = self.fetch_index(index);
                self.fetch_byte(base.wrapping_add(offset) as u16, bus)
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_next_word(bus);
                self.fetch_byte(addr, bus)
            }
            AddressingMode::AbsoluteIndexed(index) => {
                let base = self.fetch_next_word(bus);
                let offset = self.regs.index(index);
                self.fetch_byte(base.wrapping_add(offset as u16), bus)
            }
        }
    }

    /// Byte at PC; advances PC.
    pub(crate) fn fetch_next_byte(&mut self, bus: &mut dyn Bus) -> u8 {
        self.cycles = self.cycles.wrapping_add(1);
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Little-endian word at PC, one cycle per byte; advances PC by two.
    pub(crate) fn fetch_next_word(&mut self, bus: &mut dyn Bus) -> u16 {
        let low = self.fetch_next_byte(bus) as u16;
        let high = self.fetch_next_byte(bus) as u16;
        (high << 8) | low
    }

    fn fetch_index(&mut self, index: Index) -> u8 {
        self.cycles = self.cycles.wrapping_add(1);
        self.regs.index(index)
    }

    fn fetch_byte(&mut self, addr: u16, bus: &mut dyn Bus) -> u8 {
        self.cycles = self.cycles.wrapping_add(1);
        bus.read(addr)
    }
}
