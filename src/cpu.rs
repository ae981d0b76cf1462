use std::fmt;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::instructions::{InstructionDetail, INSTRUCTION_SET};
use crate::memory::Bus;
use crate::registers::Registers;
use crate::status::Status;

/// An instruction-set core the scheduler can drive.
///
/// The scheduler only needs to reset the core, run one instruction at a
/// time and hand out snapshots for inspection; everything ISA specific
/// stays behind this trait.
pub trait InstructionCore: Send + 'static {
    /// The type handed to observers.
    type Snapshot: Clone + fmt::Debug + Send;

    /// Return every register, flag and counter to its power-on value.
    fn reset(&mut self);

    /// Fetch, decode and execute a single instruction against `bus`.
    fn execute(&mut self, bus: &mut dyn Bus);

    /// Cycles charged by the most recent instruction.
    fn cycles(&self) -> u8;

    fn pc(&self) -> u16;

    fn snapshot(&self) -> Self::Snapshot;

    /// Descriptors for the opcodes this core models.
    fn instruction_set(&self) -> &'static [InstructionDetail];
}

/// Register file, flags and cycle count at an instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct CpuState {
    pub registers: Registers,
    pub status: Status,
    pub cycles: u8,
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:04X} CYC:{}",
            self.registers.pc,
            self.registers.a,
            self.registers.x,
            self.registers.y,
            self.status.to_byte(),
            self.registers.sp,
            self.cycles
        )
    }
}

/// NMOS 6502 core.
#[derive(Debug, Clone, Default)]
pub struct Mos6502 {
    pub regs: Registers,
    pub status: Status,
    pub cycles: u8,
}

impl Mos6502 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstructionCore for Mos6502 {
    type Snapshot = CpuState;

    fn reset(&mut self) {
        self.regs.reset();
        self.status.reset();
        self.cycles = 0;
    }

    fn execute(&mut self, bus: &mut dyn Bus) {
        self.step(bus);
    }

    fn cycles(&self) -> u8 {
        self.cycles
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn snapshot(&self) -> CpuState {
        CpuState {
            registers: self.regs,
            status: self.status,
            cycles: self.cycles,
        }
    }

    fn instruction_set(&self) -> &'static [InstructionDetail] {
        &INSTRUCTION_SET
    }
}
