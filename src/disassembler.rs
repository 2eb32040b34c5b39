//! Disassembler Module
//!
//! Ties the decoders to the label pass. [`decode`] turns bytes into
//! instructions for one [`Architecture`]; a [`Disassembler`] also handles
//! skipped leading bytes, a decode length limit and label groups, and
//! returns a [`Disassembly`] with the final label map.

pub mod formatter;
pub mod labels;

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::cursor::Cursor;
use crate::decoders::mos6502::Mos6502;
use crate::decoders::pcode::PCode;
use crate::decoders::sweet16::Sweet16;
use crate::decoders::switching::Switching6502;
use crate::decoders::z80::Z80;
use crate::decoders::{Defaults, InstructionSet};
use crate::instruction::Instruction;
use crate::DisassembleError;

use self::formatter::format_instruction;
use self::labels::{resolve_labels, LabelLibrary, LabelMap};

/// Mnemonic for bytes passed over with [`Disassembler::bytes_to_skip`].
pub const SKIPPED: &str = "---";

/// Supported instruction sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// NMOS 6502, documented opcodes only.
    Mos6502,
    /// NMOS 6502 including undocumented opcodes.
    Mos6502Illegal,
    /// CMOS 65C02.
    Wdc65C02,
    /// Apple II SWEET16 interpreter.
    Sweet16,
    /// 6502 switching to SWEET16 at calls into the interpreter.
    Mos6502Sweet16,
    /// Zilog Z80.
    Z80,
    /// Apple Pascal p-code.
    PCode,
}

impl Architecture {
    pub const ALL: [Architecture; 7] = [
        Architecture::Mos6502,
        Architecture::Mos6502Illegal,
        Architecture::Wdc65C02,
        Architecture::Sweet16,
        Architecture::Mos6502Sweet16,
        Architecture::Z80,
        Architecture::PCode,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Architecture::Mos6502 => "6502",
            Architecture::Mos6502Illegal => "6502X",
            Architecture::Wdc65C02 => "65C02",
            Architecture::Sweet16 => "SWEET16",
            Architecture::Mos6502Sweet16 => "6502S",
            Architecture::Z80 => "Z80",
            Architecture::PCode => "PCODE",
        }
    }

    /// A fresh decoder. The switching decoder carries state, so each run
    /// needs its own.
    pub fn instruction_set(self) -> Box<dyn InstructionSet> {
        match self {
            Architecture::Mos6502 => Box::new(Mos6502::nmos()),
            Architecture::Mos6502Illegal => Box::new(Mos6502::with_illegal_opcodes()),
            Architecture::Wdc65C02 => Box::new(Mos6502::wdc65c02()),
            Architecture::Sweet16 => Box::new(Sweet16::new()),
            Architecture::Mos6502Sweet16 => Box::new(Switching6502::new()),
            Architecture::Z80 => Box::new(Z80::new()),
            Architecture::PCode => Box::new(PCode::new()),
        }
    }

    pub fn defaults(self) -> Defaults {
        self.instruction_set().defaults()
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Architecture {
    type Err = DisassembleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arch = match s.trim().to_ascii_uppercase().as_str() {
            "6502" => Architecture::Mos6502,
            "6502X" => Architecture::Mos6502Illegal,
            "65C02" => Architecture::Wdc65C02,
            "SWEET16" | "SWEET-16" => Architecture::Sweet16,
            "6502S" => Architecture::Mos6502Sweet16,
            "Z80" => Architecture::Z80,
            "PCODE" | "P-CODE" => Architecture::PCode,
            _ => return Err(DisassembleError::UnknownArchitecture(s.to_string())),
        };
        Ok(arch)
    }
}

/// Decode `bytes` loaded at `base` without any labelling.
///
/// # Examples
///
/// ```
/// use retrodis::{decode, Architecture};
///
/// let code = decode(&[0xA9, 0x00, 0x60], 0x0300, Architecture::Mos6502);
/// assert_eq!(code.len(), 2);
/// assert_eq!(code[1].mnemonic(), "RTS");
/// assert_eq!(code[1].address(), 0x0302);
/// ```
pub fn decode(bytes: &[u8], base: u16, architecture: Architecture) -> Vec<Instruction> {
    let mut cursor = Cursor::new(bytes, base);
    architecture.instruction_set().decode(&mut cursor)
}

/// Configurable disassembly run.
///
/// # Examples
///
/// ```
/// use retrodis::{Architecture, Disassembler, LabelLibrary};
///
/// let mut library = LabelLibrary::new();
/// library.insert("F8-ROM", "COUT", 0xFDED);
///
/// let result = Disassembler::new(Architecture::Mos6502)
///     .library(&library)
///     .run(&[0x20, 0xED, 0xFD, 0x4C, 0x00, 0x03])
///     .unwrap();
///
/// let text: Vec<String> = result.instructions().iter().map(|i| result.format(i)).collect();
/// assert_eq!(text, vec!["JSR COUT", "JMP L0300"]);
/// ```
#[derive(Debug, Clone)]
pub struct Disassembler<'a> {
    architecture: Architecture,
    start_address: Option<u16>,
    bytes_to_skip: usize,
    bytes_to_decode: usize,
    library: Option<&'a LabelLibrary>,
    groups: Option<Vec<String>>,
}

impl<'a> Disassembler<'a> {
    pub fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            start_address: None,
            bytes_to_skip: 0,
            bytes_to_decode: 0,
            library: None,
            groups: None,
        }
    }

    /// Load address of the first byte. Defaults to the architecture's usual
    /// load address.
    pub fn start_address(mut self, address: u16) -> Self {
        self.start_address = Some(address);
        self
    }

    /// Leading bytes shown one at a time as `---` instead of being decoded.
    pub fn bytes_to_skip(mut self, count: usize) -> Self {
        self.bytes_to_skip = count;
        self
    }

    /// Stop after this many bytes past the skipped ones. Zero means the whole
    /// buffer.
    pub fn bytes_to_decode(mut self, count: usize) -> Self {
        self.bytes_to_decode = count;
        self
    }

    pub fn library(mut self, library: &'a LabelLibrary) -> Self {
        self.library = Some(library);
        self
    }

    /// Label groups to seed from the library. Defaults to the architecture's
    /// default groups.
    pub fn groups<S: AsRef<str>>(mut self, groups: &[S]) -> Self {
        self.groups = Some(groups.iter().map(|g| g.as_ref().to_string()).collect());
        self
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Decode `bytes` and resolve labels.
    ///
    /// # Errors
    ///
    /// - [`DisassembleError::OffsetOutOfRange`] when the skip count runs past
    ///   the buffer.
    /// - [`DisassembleError::UnknownLabelGroup`] when a requested group is not
    ///   in the library.
    pub fn run(&self, bytes: &[u8]) -> Result<Disassembly, DisassembleError> {
        if self.bytes_to_skip > bytes.len() {
            return Err(DisassembleError::OffsetOutOfRange {
                offset: self.bytes_to_skip,
                length: bytes.len(),
            });
        }
        let end = match self.bytes_to_decode {
            0 => bytes.len(),
            n => self.bytes_to_skip.saturating_add(n).min(bytes.len()),
        };
        let code = &bytes[..end];

        let defaults = self.architecture.defaults();
        let start = self.start_address.unwrap_or(defaults.start_address);

        let empty = LabelLibrary::new();
        let library = self.library.unwrap_or(&empty);
        let seed = match &self.groups {
            Some(groups) => library.seed(groups.as_slice())?,
            None => library.seed(defaults.library_labels)?,
        };

        debug!(
            "disassembling {} bytes as {} at ${:04X} ({} skipped, {} seeded labels)",
            code.len(),
            self.architecture,
            start,
            self.bytes_to_skip,
            seed.len()
        );

        let mut cursor = Cursor::new(code, start);
        let mut instructions = Vec::new();
        while cursor.current_offset() < self.bytes_to_skip {
            instructions.push(
                Instruction::at(cursor.current_address())
                    .mnemonic(SKIPPED)
                    .code(cursor.read(1))
                    .build(),
            );
        }
        instructions.extend(self.architecture.instruction_set().decode(&mut cursor));

        let labels = resolve_labels(&instructions, start, code.len(), seed);
        debug!(
            "decoded {} instructions, {} labels",
            instructions.len(),
            labels.len()
        );

        Ok(Disassembly {
            architecture: self.architecture,
            start_address: start,
            bytes_per_instruction: defaults.bytes_per_instruction,
            instructions,
            labels,
        })
    }
}

/// Result of a [`Disassembler`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    architecture: Architecture,
    start_address: u16,
    bytes_per_instruction: usize,
    instructions: Vec<Instruction>,
    labels: LabelMap,
}

impl Disassembly {
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn start_address(&self) -> u16 {
        self.start_address
    }

    /// Suggested number of code bytes per display row.
    pub fn bytes_per_instruction(&self) -> usize {
        self.bytes_per_instruction
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Label defined at `address`, if any.
    pub fn label_at(&self, address: u16) -> Option<&str> {
        self.labels.get(address)
    }

    /// Instruction text with labels substituted.
    pub fn format(&self, instruction: &Instruction) -> String {
        format_instruction(instruction, Some(&self.labels))
    }
}
