//! Instruction decoder for the 6502 family (6502, 6502X, 65C02)

use crate::addressing::AddressingMode;
use crate::cursor::Cursor;
use crate::decoders::{Defaults, InstructionSet};
use crate::instruction::Instruction;
use crate::opcodes::{OpcodeTable, MOS6502, MOS6502_ILLEGAL, WDC65C02};

/// Decoder for one of the 6502-family opcode tables.
#[derive(Debug, Clone, Copy)]
pub struct Mos6502 {
    table: &'static OpcodeTable,
}

impl Mos6502 {
    /// Documented NMOS opcodes only.
    pub fn nmos() -> Self {
        Self { table: &MOS6502 }
    }

    /// NMOS opcodes including the undocumented ones.
    pub fn with_illegal_opcodes() -> Self {
        Self {
            table: &MOS6502_ILLEGAL,
        }
    }

    /// CMOS 65C02.
    pub fn wdc65c02() -> Self {
        Self { table: &WDC65C02 }
    }
}

impl InstructionSet for Mos6502 {
    fn defaults(&self) -> Defaults {
        Defaults {
            start_address: 0x0300,
            library_labels: &["All"],
            bytes_per_instruction: 3,
        }
    }

    fn decode_one(&mut self, cursor: &mut Cursor) -> Instruction {
        use AddressingMode::*;

        let metadata = self.table.lookup(cursor.peek_unsigned_byte(0));
        let mode = metadata.addressing_mode;

        let address = cursor.current_address();
        let value = match mode.instruction_length() {
            3 => cursor.peek_unsigned_short(1),
            2 if mode.is_relative() => relative_target(address, cursor.peek_signed_byte(1)),
            2 => cursor.peek_unsigned_byte(1) as u16,
            _ => 0,
        };
        let word = format!("${:04X}", value);
        let byte = format!("${:02X}", value);

        let builder = Instruction::at(address)
            .code(cursor.read(mode.instruction_length()))
            .mnemonic(metadata.mnemonic);

        // Undefined opcodes show their operand in the simplest form; the
        // length matters, not the rendering.
        match mode {
            Implicit | Accumulator | Undefined1 => builder,
            Absolute | Relative | Undefined3 => builder.op_address("{}", word, value),
            AbsoluteX => builder.op_address("{}", word, value).op_value("X"),
            AbsoluteY => builder.op_address("{}", word, value).op_value("Y"),
            Immediate => builder.op_value(format!("#{}", byte)),
            Indirect => builder.op_address("({})", word, value),
            AbsoluteIndexedIndirect => builder.op_address("({}", word, value).op_value("X)"),
            ZeroPageIndirect => builder.op_address("({})", byte, value),
            IndirectX => builder.op_address("({}", byte, value).op_value("X)"),
            IndirectY => builder.op_address("({})", byte, value).op_value("Y"),
            ZeroPage | Undefined2 => builder.op_address("{}", byte, value),
            ZeroPageX => builder.op_address("{}", byte, value).op_value("X"),
            ZeroPageY => builder.op_address("{}", byte, value).op_value("Y"),
        }
        .build()
    }
}

/// Resolve a signed branch displacement relative to the end of a 2-byte
/// instruction at `address`, wrapping within 16 bits.
pub fn relative_target(address: u16, displacement: i8) -> u16 {
    address.wrapping_add(2).wrapping_add(displacement as u16)
}
