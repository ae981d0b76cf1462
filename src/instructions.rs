// Opcode table and disassembly for instruction tracing

use crate::addressing::AddressingMode;
use crate::registers::{Index, Register};

pub const INS_LDA_I: u8 = 0xA9;
pub const INS_LDA_ZP: u8 = 0xA5;
pub const INS_LDA_ZPX: u8 = 0xB5;
pub const INS_LDA_A: u8 = 0xAD;
pub const INS_LDA_AX: u8 = 0xBD;
pub const INS_LDA_AY: u8 = 0xB9;
// Indirect loads are recognised but not modeled; they execute as no-ops.
pub const INS_LDA_IX: u8 = 0xA1;
pub const INS_LDA_IY: u8 = 0xB1;

pub const INS_LDX_I: u8 = 0xA2;
pub const INS_LDX_ZP: u8 = 0xA6;
pub const INS_LDX_ZPY: u8 = 0xB6;
pub const INS_LDX_A: u8 = 0xAE;
pub const INS_LDX_AY: u8 = 0xBE;

pub const INS_LDY_I: u8 = 0xA0;
pub const INS_LDY_ZP: u8 = 0xA4;
pub const INS_LDY_ZPX: u8 = 0xB4;
pub const INS_LDY_A: u8 = 0xAC;
pub const INS_LDY_AX: u8 = 0xBC;

/// Documentation metadata for one opcode. Not consulted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDetail {
    pub mnemonic: &'static str,
    pub opcode: u8,
    pub bytes: u8,
    pub cycles: u8,
    pub min_operands: u8,
    pub max_operands: u8,
    pub description: &'static str,
}

const fn load(
    mnemonic: &'static str,
    opcode: u8,
    mode: AddressingMode,
    description: &'static str,
) -> InstructionDetail {
    let operands = mode.operand_bytes();
    InstructionDetail {
        mnemonic,
        opcode,
        bytes: 1 + operands,
        // opcode fetch + operand resolution
        cycles: 1 + mode.resolve_cycles(),
        min_operands: operands,
        max_operands: operands,
        description,
    }
}

use AddressingMode::*;

pub static INSTRUCTION_SET: [InstructionDetail; 16] = [
    load("LDA", INS_LDA_I, Immediate, "Load accumulator, immediate"),
    load("LDA", INS_LDA_ZP, ZeroPage, "Load accumulator, zero page"),
    load("LDA", INS_LDA_ZPX, ZeroPageIndexed(Index::X), "Load accumulator, zero page,X"),
    load("LDA", INS_LDA_A, Absolute, "Load accumulator, absolute"),
    load("LDA", INS_LDA_AX, AbsoluteIndexed(Index::X), "Load accumulator, absolute,X"),
    load("LDA", INS_LDA_AY, AbsoluteIndexed(Index::Y), "Load accumulator, absolute,Y"),
    load("LDX", INS_LDX_I, Immediate, "Load X register, immediate"),
    load("LDX", INS_LDX_ZP, ZeroPage, "Load X register, zero page"),
    load("LDX", INS_LDX_ZPY, ZeroPageIndexed(Index::Y), "Load X register, zero page,Y"),
    load("LDX", INS_LDX_A, Absolute, "Load X register, absolute"),
    load("LDX", INS_LDX_AY, AbsoluteIndexed(Index::Y), "Load X register, absolute,Y"),
    load("LDY", INS_LDY_I, Immediate, "Load Y register, immediate"),
    load("LDY", INS_LDY_ZP, ZeroPage, "Load Y register, zero page"),
    load("LDY", INS_LDY_ZPX, ZeroPageIndexed(Index::X), "Load Y register, zero page,X"),
    load("LDY", INS_LDY_A, Absolute, "Load Y register, absolute"),
    load("LDY", INS_LDY_AX, AbsoluteIndexed(Index::X), "Load Y register, absolute,X"),
];

/// Register target and addressing mode for a mapped opcode.
pub const fn decode(opcode: u8) -> Option<(Register, AddressingMode)> {
    let decoded = match opcode {
        INS_LDA_I => (Register::A, Immediate),
        INS_LDA_ZP => (Register::A, ZeroPage),
        INS_LDA_ZPX => (Register::A, ZeroPageIndexed(Index::X)),
        INS_LDA_A => (Register::A, Absolute),
        INS_LDA_AX => (Register::A, AbsoluteIndexed(Index::X)),
        INS_LDA_AY => (Register::A, AbsoluteIndexed(Index::Y)),
        INS_LDX_I => (Register::X, Immediate),
        INS_LDX_ZP => (Register::X, ZeroPage),
        INS_LDX_ZPY => (Register::X, ZeroPageIndexed(Index::Y)),
        INS_LDX_A => (Register::X, Absolute),
        INS_LDX_AY => (Register::X, AbsoluteIndexed(Index::Y)),
        INS_LDY_I => (Register::Y, Immediate),
        INS_LDY_ZP => (Register::Y, ZeroPage),
        INS_LDY_ZPX => (Register::Y, ZeroPageIndexed(Index::X)),
        INS_LDY_A => (Register::Y, Absolute),
        INS_LDY_AX => (Register::Y, AbsoluteIndexed(Index::X)),
        _ => return None,
    };
    Some(decoded)
}

pub fn detail(opcode: u8) -> Option<&'static InstructionDetail> {
    INSTRUCTION_SET.iter().find(|d| d.opcode == opcode)
}

fn index_name(index: Index) -> char {
    match index {
        Index::X => 'X',
        Index::Y => 'Y',
    }
}

// Instruction disassembly helper
pub fn disassemble_instruction(opcode: u8, operand1: Option<u8>, operand2: Option<u8>) -> String {
    let (mnemonic, mode) = match (detail(opcode), decode(opcode)) {
        (Some(detail), Some((_, mode))) => (detail.mnemonic, mode),
        _ => return "???".to_string(),
    };

    match mode {
        Immediate => match operand1 {
            Some(b) => format!("{} #${:02X}", mnemonic, b),
            None => format!("{} #$??", mnemonic),
        },
        ZeroPage => match operand1 {
            Some(b) => format!("{} ${:02X}", mnemonic, b),
            None => format!("{} $??", mnemonic),
        },
        ZeroPageIndexed(index) => match operand1 {
            Some(b) => format!("{} ${:02X},{}", mnemonic, b, index_name(index)),
            None => format!("{} $??,{}", mnemonic, index_name(index)),
        },
        Absolute => match (operand1, operand2) {
            (Some(lo), Some(hi)) => {
                let addr = (hi as u16) << 8 | lo as u16;
                format!("{} ${:04X}", mnemonic, addr)
            }
            _ => format!("{} $????", mnemonic),
        },
        AbsoluteIndexed(index) => match (operand1, operand2) {
            (Some(lo), Some(hi)) => {
                let addr = (hi as u16) << 8 | lo as u16;
                format!("{} ${:04X},{}", mnemonic, addr, index_name(index))
            }
            _ => format!("{} $????,{}", mnemonic, index_name(index)),
        },
    }
}
