//! SWEET16 decoder.
//!
//! SWEET16 packs its opcodes two nibbles per byte. A zero high nibble selects
//! a non-register operation by the low nibble (branches, `RTN`, `BK`, `RS`);
//! otherwise the high nibble selects a register operation applied to the
//! register numbered by the low nibble.

use crate::cursor::Cursor;
use crate::decoders::mos6502::relative_target;
use crate::decoders::{Defaults, InstructionSet};
use crate::instruction::Instruction;
use crate::opcodes::UNDEFINED;

/// Operand shape of a SWEET16 opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweet16Mode {
    /// Register plus 16-bit constant (`SET R1,#$1234`), 3 bytes.
    Constant,
    /// Register (`LD R1`), 1 byte.
    Direct,
    /// Register indirect (`LD @R1`), 1 byte.
    Indirect,
    /// Signed 8-bit branch, 2 bytes.
    Branch,
    /// No operand, 1 byte.
    Implied,
}

impl Sweet16Mode {
    pub const fn instruction_length(self) -> usize {
        match self {
            Sweet16Mode::Constant => 3,
            Sweet16Mode::Branch => 2,
            Sweet16Mode::Direct | Sweet16Mode::Indirect | Sweet16Mode::Implied => 1,
        }
    }
}

use Sweet16Mode::*;

/// Register operations by high nibble. Slot 0 is never used.
#[rustfmt::skip]
const REGISTER_OPS: [(&str, Sweet16Mode); 16] = [
    (UNDEFINED, Implied), ("SET", Constant), ("LD", Direct),   ("ST", Direct),
    ("LD", Indirect),     ("ST", Indirect),  ("LDD", Indirect), ("STD", Indirect),
    ("POP", Indirect),    ("STP", Indirect), ("ADD", Direct),  ("SUB", Direct),
    ("POPD", Indirect),   ("CPR", Direct),   ("INR", Direct),  ("DCR", Direct),
];

/// Non-register operations by low nibble.
#[rustfmt::skip]
const NON_REGISTER_OPS: [(&str, Sweet16Mode); 16] = [
    ("RTN", Implied),  ("BR", Branch),   ("BNC", Branch),     ("BC", Branch),
    ("BP", Branch),    ("BM", Branch),   ("BZ", Branch),      ("BNZ", Branch),
    ("BM1", Branch),   ("BNM1", Branch), ("BK", Implied),     ("RS", Implied),
    ("BS", Branch),    (UNDEFINED, Implied), (UNDEFINED, Implied), (UNDEFINED, Implied),
];

/// Look up the mnemonic and operand shape for an opcode byte.
pub fn lookup(op: u8) -> (&'static str, Sweet16Mode) {
    let low = (op & 0x0F) as usize;
    let high = (op >> 4) as usize;
    if high == 0 {
        NON_REGISTER_OPS[low]
    } else {
        REGISTER_OPS[high]
    }
}

/// SWEET16 decoder. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sweet16;

impl Sweet16 {
    pub fn new() -> Self {
        Sweet16
    }
}

impl InstructionSet for Sweet16 {
    fn defaults(&self) -> Defaults {
        Defaults {
            start_address: 0x0300,
            library_labels: &["All"],
            bytes_per_instruction: 3,
        }
    }

    fn decode_one(&mut self, cursor: &mut Cursor) -> Instruction {
        let op = cursor.peek_unsigned_byte(0);
        let register = op & 0x0F;
        let (mnemonic, mode) = lookup(op);

        let address = cursor.current_address();
        let value = match mode {
            Constant => cursor.peek_unsigned_short(1),
            Branch => relative_target(address, cursor.peek_signed_byte(1)),
            _ => 0,
        };

        let builder = Instruction::at(address)
            .code(cursor.read(mode.instruction_length()))
            .mnemonic(mnemonic);
        match mode {
            Constant => builder
                .op_value(format!("R{}", register))
                .op_value(format!("#${:04X}", value)),
            Direct => builder.op_value(format!("R{}", register)),
            Indirect => builder.op_value(format!("@R{}", register)),
            Branch => builder.op_address("{}", format!("${:04X}", value), value),
            Implied => builder,
        }
        .build()
    }
}
