use log::{log_enabled, trace, Level};

use crate::cpu::Mos6502;
use crate::instructions::{decode, detail, disassemble_instruction};
use crate::memory::Bus;
use crate::registers::Register;

impl Mos6502 {
    /// Run exactly one instruction.
    ///
    /// Unmapped opcodes consume only their own byte and change nothing else.
    pub(crate) fn step(&mut self, bus: &mut dyn Bus) {
        self.cycles = 0;

        let pc_before = self.regs.pc;
        let opcode = self.fetch_next_byte(bus);

        match decode(opcode) {
            Some((target, mode)) => {
                let value = self.resolve(mode, bus);
                self.load(target, value);
            }
            None => trace!("{:04X} unmapped opcode {:02X} skipped", pc_before, opcode),
        }

        if log_enabled!(Level::Trace) {
            trace!("{}", self.trace_line(pc_before, bus));
        }
    }

    /// Register load effect. Only zero and negative are touched.
    fn load(&mut self, target: Register, value: u8) {
        let stored = self.regs.load(target, value);
        self.status.update_zero_negative(stored);
    }

    /// Disassembly of the instruction at `pc` followed by the registers it
    /// left behind and the cycles it took.
    fn trace_line(&self, pc: u16, bus: &dyn Bus) -> String {
        let opcode = bus.peek(pc);
        let operands = detail(opcode).map_or(0, |d| d.bytes - 1);
        let operand1 = (operands >= 1).then(|| bus.peek(pc.wrapping_add(1)));
        let operand2 = (operands >= 2).then(|| bus.peek(pc.wrapping_add(2)));

        let opcode_bytes = match (operand1, operand2) {
            (Some(b1), Some(b2)) => format!("{:02X} {:02X} {:02X}", opcode, b1, b2),
            (Some(b1), None) => format!("{:02X} {:02X}   ", opcode, b1),
            _ => format!("{:02X}      ", opcode),
        };
        format!(
            "{:04X}  {} {:16} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:04X} CYC:{}",
            pc,
            opcode_bytes,
            disassemble_instruction(opcode, operand1, operand2),
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.status.to_byte(),
            self.regs.sp,
            self.cycles
        )
    }
}
