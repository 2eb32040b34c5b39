//! # Retro Machine Code Disassembler
//!
//! A table-driven disassembler for 8-bit era instruction sets: the NMOS 6502
//! (with or without its undocumented opcodes), the CMOS 65C02, Zilog Z80,
//! Apple II SWEET16, Apple Pascal p-code, and 6502 code that drops into
//! SWEET16 and back.
//!
//! Decoding is total: every byte sequence decodes to *some* instruction.
//! Undefined opcodes become `???` entries of a known length so the stream
//! never desynchronizes, and a truncated final instruction reads zeros past
//! the end of the buffer.
//!
//! ## Quick Start
//!
//! ```rust
//! use retrodis::{Architecture, Disassembler};
//!
//! // JMP $0300, loaded at $0300
//! let result = Disassembler::new(Architecture::Mos6502)
//!     .start_address(0x0300)
//!     .run(&[0x4C, 0x00, 0x03])
//!     .unwrap();
//!
//! let jmp = &result.instructions()[0];
//! assert_eq!(jmp.mnemonic(), "JMP");
//! assert_eq!(jmp.operand_address(), Some(0x0300));
//! assert_eq!(result.label_at(0x0300), Some("L0300"));
//! assert_eq!(result.format(jmp), "JMP L0300");
//! ```
//!
//! ## Architecture
//!
//! - **Cursor**: byte buffer, read position and 16-bit wrapped address
//! - **Instruction model**: address, bytes, mnemonic and operands; an operand
//!   may carry the absolute address it refers to
//! - **Decoders**: one [`InstructionSet`] per architecture
//! - **Labels**: names from a [`LabelLibrary`] plus `Lnnnn` names for
//!   addresses referenced inside the decoded window
//!
//! ## Modules
//!
//! - `cursor` - Byte cursor
//! - `instruction` - Instruction, operand and builder
//! - `decoders` - Per-architecture decoders
//! - `opcodes` - 6502-family opcode tables
//! - `addressing` - 6502-family addressing modes
//! - `disassembler` - Architecture selection, labelling and formatting

pub mod addressing;
pub mod cursor;
pub mod decoders;
pub mod disassembler;
pub mod instruction;
pub mod opcodes;
pub mod wasm;

// Re-export public API
pub use addressing::AddressingMode;
pub use cursor::Cursor;
pub use decoders::{Defaults, InstructionSet};
pub use disassembler::formatter::format_instruction;
pub use disassembler::labels::{parse_address, resolve_labels, LabelLibrary, LabelMap};
pub use disassembler::{decode, Architecture, Disassembler, Disassembly};
pub use instruction::{Instruction, InstructionBuilder, Operand};
pub use opcodes::{OpcodeMetadata, OpcodeTable};

/// Errors from configuring or running a disassembly.
///
/// Decoding bytes never fails; these cover the inputs around it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisassembleError {
    /// Architecture name not recognized.
    #[error("unknown architecture '{0}'")]
    UnknownArchitecture(String),

    /// Label group not present in the library.
    #[error("label group '{0}' not defined")]
    UnknownLabelGroup(String),

    /// Address text is not `$hex`, `0xhex` or a decimal in 0..=65535.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// An offset past the end of the input.
    #[error("offset {offset} is beyond the {length} byte input")]
    OffsetOutOfRange { offset: usize, length: usize },
}
