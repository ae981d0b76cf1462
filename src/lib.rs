//! MOS 6502 execution core.
//!
//! The [`Mos6502`] core executes one instruction at a time against a [`Bus`];
//! a [`Processor`] runs it on its own thread, throttled to a target clock and
//! pausable at instruction boundaries for inspection. Boards such as
//! [`Commodore64Board`] own the memory the processor is wired to.

pub mod addressing;
pub mod board;
pub mod config;
pub mod cpu;
mod dispatch;
pub mod error;
pub mod instructions;
pub mod memory;
pub mod processor;
pub mod registers;
mod scheduler;
pub mod status;

pub use addressing::AddressingMode;
pub use board::{Commodore64Board, Mainboard};
pub use config::ProcessorConfig;
pub use cpu::{CpuState, InstructionCore, Mos6502};
#[cfg(feature = "config-file")]
pub use error::ConfigError;
pub use error::ProcessorError;
pub use instructions::InstructionDetail;
pub use memory::{Bus, Memory, SharedMemory};
pub use processor::Processor;
pub use registers::{Register, Registers};
pub use status::Status;
