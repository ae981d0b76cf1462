//! Mainboard composition
//!
//! A board owns the memory and the processor wired to it. Resetting the
//! board resets the processor, which installs the new memory image.

use crate::config::ProcessorConfig;
use crate::cpu::{InstructionCore, Mos6502};
use crate::error::ProcessorError;
use crate::memory::{self, Memory, SharedMemory};
use crate::processor::Processor;

pub trait Mainboard {
    type Core: InstructionCore;

    fn processor(&self) -> &Processor<Self::Core>;
    fn processor_mut(&mut self) -> &mut Processor<Self::Core>;
    fn memory(&self) -> &SharedMemory;
    fn address_bus_width(&self) -> u8;
    fn data_bus_width(&self) -> u8;

    fn reset(&mut self, memory_map: &[u8]) -> Result<(), ProcessorError> {
        self.processor_mut().reset(memory_map)
    }
}

/// 6502 board with a flat RAM map and a 16-bit address bus.
pub struct Commodore64Board {
    memory: SharedMemory,
    processor: Processor<Mos6502>,
}

impl Commodore64Board {
    pub fn new(config: ProcessorConfig) -> Result<Self, ProcessorError> {
        config.validate()?;
        let memory = memory::shared(Memory::new(config.memory_limit)?);
        let processor = Processor::new(Mos6502::new(), memory.clone(), config)?;
        Ok(Self { memory, processor })
    }
}

impl Mainboard for Commodore64Board {
    type Core = Mos6502;

    fn processor(&self) -> &Processor<Mos6502> {
        &self.processor
    }

    fn processor_mut(&mut self) -> &mut Processor<Mos6502> {
        &mut self.processor
    }

    fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    fn address_bus_width(&self) -> u8 {
        16
    }

    fn data_bus_width(&self) -> u8 {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_cascades_into_processor() {
        let mut board = Commodore64Board::new(ProcessorConfig::default()).unwrap();
        board.processor().modify(|cpu| cpu.regs.a = 0x55).unwrap();

        board.reset(&[0xA9, 0x01]).unwrap();

        assert_eq!(board.processor().a(), 0x00);
        assert_eq!(board.processor().pc(), 0x0100);
        let memory = memory::lock(board.memory());
        assert_eq!(memory.limit(), 0x1_0000);
        assert_eq!(memory[0x0100], 0xA9);
    }

    #[test]
    fn test_bus_widths() {
        let board = Commodore64Board::new(ProcessorConfig::default()).unwrap();
        assert_eq!(board.address_bus_width(), 16);
        assert_eq!(board.data_bus_width(), 8);
    }

    #[test]
    fn test_memory_is_shared_not_copied() {
        let board = Commodore64Board::new(ProcessorConfig {
            memory_limit: 0x400,
            ..ProcessorConfig::default()
        })
        .unwrap();
        memory::lock(board.memory())[0x0200] = 0x42;
        assert_eq!(std::sync::Arc::strong_count(board.memory()), 2);
        assert_eq!(board.processor().memory_limit(), 0x400);
    }
}
