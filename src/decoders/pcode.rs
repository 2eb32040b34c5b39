//! Apple Pascal p-code decoder.
//!
//! The cursor holds one procedure's code. A procedure's jump table sits
//! after its code, ahead of an 8-byte attribute table, and its start is not
//! known up front: every backward jump through the table (a negative signed
//! byte) moves the cursor mark, and once decoding reaches
//! `length + mark + 8` the remaining bytes are jump-table words (`J/T`).

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::cursor::Cursor;
use crate::decoders::{Defaults, InstructionSet};
use crate::instruction::{Instruction, InstructionBuilder};
use crate::opcodes::UNDEFINED;

/// Size of the procedure attribute table following the jump table.
const ATTRIBUTE_TABLE: i64 = 8;

/// Standard procedures called through `CSP`.
const CSP_PROCS: [&str; 15] = [
    "", "NEW", "MVL", "MVR", "EXIT", "IDS", "TRS", "TIM", "FLC", "SCN", "TNC", "RND", "MRK", "RLS",
    "POT",
];

/// Comparison type suffixes, by type tag (2 real, 4 string, 6 boolean,
/// 8 set, 10 byte array, 12 word).
const TYPE_NAMES: [&str; 13] = [
    "", "", "REAL", "", "STR", "", "BOOL", "", "POWR", "", "BYT", "", "WORD",
];

/// Operand kinds, read in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Unsigned byte.
    Ub,
    /// Signed byte; only used for jumps.
    Sb,
    /// Byte in 0..127, shown as unsigned.
    Db,
    /// Big: one byte for 0..127, two bytes (7+8 bits) for 128..32767.
    B,
    /// Little-endian word.
    W,
    /// Type tag selecting a mnemonic suffix; byte and word arrays add a `B`.
    Type,
    /// Standard procedure number.
    Csp,
    /// Length byte then a word-aligned block of constant words.
    Ldc,
    /// Length-prefixed packed array.
    Lpa,
    /// Length-prefixed string.
    Lsa,
    /// Case jump: aligned min and max words, a `UJP`, then the case table.
    Xjp,
}

use Param::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub opcode: u8,
    pub mnemonic: &'static str,
    /// Value folded into the opcode itself (`SLDC 5`, `SLDL 3`).
    pub implied: Option<u16>,
    pub params: &'static [Param],
}

impl Opcode {
    pub fn is_defined(&self) -> bool {
        self.mnemonic != UNDEFINED
    }
}

/// Opcode table built on first use.
pub static OPCODES: Lazy<[Opcode; 256]> = Lazy::new(build_table);

struct TableBuilder {
    slots: Vec<Option<Opcode>>,
}

impl TableBuilder {
    fn new() -> Self {
        Self {
            slots: vec![None; 256],
        }
    }

    fn put(&mut self, opcode: u8, mnemonic: &'static str, implied: Option<u16>, params: &'static [Param]) {
        let slot = &mut self.slots[opcode as usize];
        assert!(slot.is_none(), "p-code opcode {} assigned twice", opcode);
        *slot = Some(Opcode {
            opcode,
            mnemonic,
            implied,
            params,
        });
    }

    fn op(mut self, opcode: u8, mnemonic: &'static str, params: &'static [Param]) -> Self {
        self.put(opcode, mnemonic, None, params);
        self
    }

    /// `first..=last` share a mnemonic with implied values counting up from `first_value`.
    fn range(mut self, first_value: u16, mnemonic: &'static str, first: u8, last: u8) -> Self {
        for opcode in first..=last {
            self.put(opcode, mnemonic, Some((opcode - first) as u16 + first_value), &[]);
        }
        self
    }

    fn build(self) -> [Opcode; 256] {
        let mut slots = self.slots;
        std::array::from_fn(|i| {
            slots[i].take().unwrap_or(Opcode {
                opcode: i as u8,
                mnemonic: UNDEFINED,
                implied: None,
                params: &[],
            })
        })
    }
}

/// Build the opcode table. Opcode 210 is unassigned.
///
/// # Panics
///
/// Panics if an opcode is assigned twice.
pub fn build_table() -> [Opcode; 256] {
    TableBuilder::new()
        .range(0, "SLDC", 0, 127)
        .op(128, "ABI", &[])
        .op(129, "ABR", &[])
        .op(130, "ADI", &[])
        .op(131, "ADR", &[])
        .op(132, "LAND", &[])
        .op(133, "DIF", &[])
        .op(134, "DVI", &[])
        .op(135, "DVR", &[])
        .op(136, "CHK", &[])
        .op(137, "FLO", &[])
        .op(138, "FLT", &[])
        .op(139, "INN", &[])
        .op(140, "INT", &[])
        .op(141, "LOR", &[])
        .op(142, "MODI", &[])
        .op(143, "MPI", &[])
        .op(144, "MPR", &[])
        .op(145, "NGI", &[])
        .op(146, "NGR", &[])
        .op(147, "LNOT", &[])
        .op(148, "SRS", &[])
        .op(149, "SBI", &[])
        .op(150, "SBR", &[])
        .op(151, "SGS", &[])
        .op(152, "SQI", &[])
        .op(153, "SQR", &[])
        .op(154, "STO", &[])
        .op(155, "IXS", &[])
        .op(156, "UNI", &[])
        .op(157, "LDE", &[Ub, B])
        .op(158, "CSP", &[Csp])
        .op(159, "LDCN", &[])
        .op(160, "ADJ", &[Ub])
        .op(161, "FJP", &[Sb])
        .op(162, "INC", &[B])
        .op(163, "IND", &[B])
        .op(164, "IXA", &[B])
        .op(165, "LAO", &[B])
        .op(166, "LSA", &[Lsa])
        .op(167, "LAE", &[Ub, B])
        .op(168, "MOV", &[B])
        .op(169, "LDO", &[B])
        .op(170, "SAS", &[Ub])
        .op(171, "SRO", &[B])
        .op(172, "XJP", &[Xjp])
        .op(173, "RNP", &[Db])
        .op(174, "CIP", &[Ub])
        .op(175, "EQU", &[Type])
        .op(176, "GEQ", &[Type])
        .op(177, "GRT", &[Type])
        .op(178, "LDA", &[Db, B])
        .op(179, "LDC", &[Ldc])
        .op(180, "LEQ", &[Type])
        .op(181, "LES", &[Type])
        .op(182, "LOD", &[Db, B])
        .op(183, "NEQ", &[Type])
        .op(184, "STR", &[Db, B])
        .op(185, "UJP", &[Sb])
        .op(186, "LDP", &[])
        .op(187, "STP", &[])
        .op(188, "LDM", &[Ub])
        .op(189, "STM", &[Ub])
        .op(190, "LDB", &[])
        .op(191, "STB", &[])
        .op(192, "IXP", &[Ub, Ub])
        .op(193, "RBP", &[Db])
        .op(194, "CBP", &[Ub])
        .op(195, "EQUI", &[])
        .op(196, "GEQI", &[])
        .op(197, "GRTI", &[])
        .op(198, "LLA", &[B])
        .op(199, "LDCI", &[W])
        .op(200, "LEQI", &[])
        .op(201, "LESI", &[])
        .op(202, "LDL", &[B])
        .op(203, "NEWI", &[])
        .op(204, "STL", &[B])
        .op(205, "CXP", &[Ub, Ub])
        .op(206, "CLP", &[Ub])
        .op(207, "CGP", &[Ub])
        .op(208, "LPA", &[Lpa])
        .op(209, "STE", &[Ub, B])
        .op(211, "EFJ", &[Sb])
        .op(212, "NFJ", &[Sb])
        .op(213, "BPT", &[B])
        .op(214, "XIT", &[])
        .op(215, "NOP", &[])
        .range(1, "SLDL", 216, 231)
        .range(1, "SLDO", 232, 247)
        .range(0, "SIND", 248, 255)
        .build()
}

/// Decode a big parameter from its first two bytes, returning the value and
/// the number of bytes it occupies.
pub fn big_value(first: u8, second: u8) -> (u16, usize) {
    if first > 127 {
        (((first & 0x7F) as u16) << 8 | second as u16, 2)
    } else {
        (first as u16, 1)
    }
}

/// Bytes read so far for the instruction at the cursor.
struct Procedure<'a> {
    cursor: &'a mut Cursor,
    length: usize,
}

impl<'a> Procedure<'a> {
    fn new(cursor: &'a mut Cursor) -> Self {
        Self { cursor, length: 0 }
    }

    fn address(&self) -> u16 {
        self.cursor.current_address()
    }

    fn jump_table(&self) -> i64 {
        self.cursor.length() as i64 + self.cursor.mark() as i64 + ATTRIBUTE_TABLE
    }

    fn in_jump_table(&self) -> bool {
        self.cursor.current_offset() as i64 >= self.jump_table()
    }

    fn align_to_word(&mut self) {
        if (self.address() as usize + self.length) & 1 == 1 {
            self.length += 1;
        }
    }

    fn read_ub(&mut self) -> u8 {
        let value = self.cursor.peek_unsigned_byte(self.length);
        self.length += 1;
        value
    }

    fn read_w(&mut self) -> u16 {
        let lo = self.read_ub() as u16;
        let hi = self.read_ub() as u16;
        hi << 8 | lo
    }

    fn read_b(&mut self) -> u16 {
        let (value, size) = big_value(
            self.cursor.peek_unsigned_byte(self.length),
            self.cursor.peek_unsigned_byte(self.length + 1),
        );
        self.length += size;
        value
    }

    /// Word subtracted from its own address.
    fn read_self_relative_w(&mut self) -> u16 {
        let at = self.address().wrapping_add(self.length as u16);
        at.wrapping_sub(self.read_w())
    }

    /// Resolve the signed byte of a jump whose opcode sits `opcode_at` bytes
    /// into the instruction.
    fn read_sb_offset(&mut self, opcode_at: usize) -> u16 {
        let sb = self.cursor.peek_signed_byte(self.length);
        self.length += 1;
        if sb >= 0 {
            return self
                .address()
                .wrapping_add(opcode_at as u16 + 2)
                .wrapping_add(sb as u16);
        }

        let sb = sb as i32;
        if sb < self.cursor.mark() {
            self.cursor.set_mark(sb);
            trace!(
                "p-code jump table now starts at offset {}",
                self.jump_table()
            );
        }
        let offset = self.cursor.length() as i64 + sb as i64 + ATTRIBUTE_TABLE;
        let w = self.cursor.peek_absolute(offset) as u16
            | (self.cursor.peek_absolute(offset + 1) as u16) << 8;
        self.cursor
            .base_address()
            .wrapping_add(offset as u16)
            .wrapping_sub(w)
    }

    fn bytes_read(&mut self) -> Vec<u8> {
        let length = std::mem::take(&mut self.length);
        self.cursor.read(length)
    }

    fn read_params(&mut self, op: &Opcode, builder: &mut InstructionBuilder) {
        for param in op.params {
            match param {
                Ub | Db => {
                    let value = self.read_ub();
                    builder.push_value(value.to_string());
                }
                Sb => {
                    let target = self.read_sb_offset(0);
                    builder.push_address("{}", format!("${:04X}", target), target);
                }
                B => {
                    let value = self.read_b();
                    builder.push_value(value.to_string());
                }
                W => {
                    let value = self.read_w();
                    builder.push_value(value.to_string());
                }
                Type => {
                    let tag = self.read_ub() as usize;
                    let suffix = TYPE_NAMES.get(tag).copied().unwrap_or("");
                    builder.set_mnemonic(format!("{}{}", op.mnemonic, suffix));
                    if tag == 10 || tag == 12 {
                        let size = self.read_b();
                        builder.push_value(size.to_string());
                    }
                }
                Csp => {
                    let number = self.read_ub() as usize;
                    match CSP_PROCS.get(number) {
                        Some(name) if number > 0 => builder.set_mnemonic(*name),
                        _ => builder.push_value(number.to_string()),
                    }
                }
                Ldc => {
                    let count = self.read_ub();
                    builder.push_value(count.to_string());
                    self.align_to_word();
                    for _ in 0..count {
                        let word = self.read_w();
                        builder.push_value(word.to_string());
                    }
                }
                Lpa | Lsa => {
                    let count = self.read_ub();
                    let text: String = (0..count).map(|_| char::from(self.read_ub())).collect();
                    builder.push_value(format!("'{}'", text));
                }
                Xjp => {
                    self.align_to_word();
                    let min = self.read_w();
                    let max = self.read_w();
                    builder.push_value(format!("Range {}..{}", min, max));
                    let ujp_at = self.length;
                    self.read_ub();
                    let past_table = self.read_sb_offset(ujp_at);
                    builder.push_value(format!("UJP ${:04X}", past_table));
                    let cases = if max >= min { (max - min) as usize + 1 } else { 0 };
                    let table_end = self.cursor.current_offset() + self.length + 2 * cases;
                    if table_end > self.cursor.length() {
                        debug!(
                            "XJP at ${:04X} case table {}..{} ends at offset {}, past the {} byte input",
                            self.address(),
                            min,
                            max,
                            table_end,
                            self.cursor.length()
                        );
                    }
                    for _ in min..=max {
                        let target = self.read_self_relative_w();
                        builder.push_address("{}", format!("${:04X}", target), target);
                    }
                }
            }
        }
    }
}

/// p-code decoder. Jump-table state lives in the cursor mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct PCode;

impl PCode {
    pub fn new() -> Self {
        PCode
    }
}

impl InstructionSet for PCode {
    fn defaults(&self) -> Defaults {
        Defaults {
            // Addresses are relative to the procedure
            start_address: 0x0000,
            library_labels: &[],
            bytes_per_instruction: 8,
        }
    }

    fn decode_one(&mut self, cursor: &mut Cursor) -> Instruction {
        let mut procedure = Procedure::new(cursor);
        let mut builder = Instruction::at(procedure.address());

        if procedure.in_jump_table() {
            let target = procedure.read_self_relative_w();
            builder.set_mnemonic("J/T");
            builder.push_address("{}", format!("${:04X}", target), target);
        } else {
            let op = &OPCODES[procedure.read_ub() as usize];
            builder.set_mnemonic(op.mnemonic);
            procedure.read_params(op, &mut builder);
            if let Some(value) = op.implied {
                builder.push_value(value.to_string());
            }
        }

        builder.set_code(procedure.bytes_read());
        builder.build()
    }
}
