//! 6502 code that drops into the SWEET16 interpreter and back.
//!
//! A `JSR` to the SWEET16 entry point switches decoding to SWEET16; `RTN`
//! switches back. Each switch emits a zero-length directive (`.SWEET16` or
//! `.6502`) ahead of the next real instruction.

use std::collections::VecDeque;

use log::debug;

use crate::cursor::Cursor;
use crate::decoders::mos6502::Mos6502;
use crate::decoders::sweet16::Sweet16;
use crate::decoders::{Defaults, InstructionSet};
use crate::instruction::Instruction;

/// Entry point of the SWEET16 interpreter in the Apple II Integer BASIC ROM.
pub const SWEET16_ENTRY: u16 = 0xF689;

/// Which decoder is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Mos6502,
    Sweet16,
}

/// Decoder that switches between 6502 and SWEET16 mid-stream.
#[derive(Debug, Clone)]
pub struct Switching6502 {
    mos6502: Mos6502,
    sweet16: Sweet16,
    mode: Mode,
    pending: VecDeque<Instruction>,
}

impl Switching6502 {
    pub fn new() -> Self {
        Self {
            mos6502: Mos6502::nmos(),
            sweet16: Sweet16::new(),
            mode: Mode::Mos6502,
            pending: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn switch_to(&mut self, mode: Mode, directive: &str, address: u16) {
        debug!("switching to {:?} at ${:04X}", mode, address);
        self.mode = mode;
        self.pending
            .push_back(Instruction::at(address).mnemonic(directive).build());
    }
}

impl Default for Switching6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionSet for Switching6502 {
    fn defaults(&self) -> Defaults {
        Defaults {
            start_address: 0x0300,
            library_labels: &["All"],
            bytes_per_instruction: 3,
        }
    }

    fn decode_one(&mut self, cursor: &mut Cursor) -> Instruction {
        if let Some(directive) = self.pending.pop_front() {
            return directive;
        }
        match self.mode {
            Mode::Mos6502 => {
                let instruction = self.mos6502.decode_one(cursor);
                if instruction.mnemonic() == "JSR"
                    && instruction.operand_address() == Some(SWEET16_ENTRY)
                {
                    self.switch_to(Mode::Sweet16, ".SWEET16", cursor.current_address());
                }
                instruction
            }
            Mode::Sweet16 => {
                let instruction = self.sweet16.decode_one(cursor);
                if instruction.mnemonic() == "RTN" {
                    self.switch_to(Mode::Mos6502, ".6502", cursor.current_address());
                }
                instruction
            }
        }
    }

    // The pending queue may still hold a directive once the cursor runs dry.
    fn decode(&mut self, cursor: &mut Cursor) -> Vec<Instruction> {
        let mut assembly = Vec::new();
        while cursor.has_more() || !self.pending.is_empty() {
            assembly.push(self.decode_one(cursor));
        }
        assembly
    }
}
