//! Architecture decoders.
//!
//! Every decoder implements [`InstructionSet`]: given a cursor positioned at
//! the start of an instruction it consumes that instruction's bytes and returns
//! exactly one [`Instruction`]. Decoding is total; any byte sequence decodes to
//! something.

pub mod mos6502;
pub mod pcode;
pub mod sweet16;
pub mod switching;
pub mod z80;

use crate::cursor::Cursor;
use crate::instruction::Instruction;

/// Values a caller uses when it has no better information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    /// Common load address for code of this architecture.
    pub start_address: u16,

    /// Library label groups requested by default (`All`, or none).
    pub library_labels: &'static [&'static str],

    /// Bytes of code shown per display row.
    pub bytes_per_instruction: usize,
}

/// A decoding strategy for one architecture.
pub trait InstructionSet {
    /// Defaults for callers that did not specify their own.
    fn defaults(&self) -> Defaults;

    /// Decode one instruction at the cursor's current position.
    fn decode_one(&mut self, cursor: &mut Cursor) -> Instruction;

    /// Decode until the cursor is exhausted.
    fn decode(&mut self, cursor: &mut Cursor) -> Vec<Instruction> {
        let mut assembly = Vec::new();
        while cursor.has_more() {
            assembly.push(self.decode_one(cursor));
        }
        assembly
    }
}
