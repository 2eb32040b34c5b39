//! Z80 decoder.
//!
//! The three opcode tables (unprefixed, `ED`-prefixed and `CB`-prefixed) are
//! expanded once from a compact list of templates. A template names a
//! mnemonic, an operand pattern with placeholder tokens, and flags saying how
//! to expand it across the opcode bits:
//!
//! | token    | meaning                                   |
//! |----------|-------------------------------------------|
//! | `rp`     | register pair (`BC DE HL SP` or `.. AF`)  |
//! | `ddd`    | destination register                      |
//! | `sss`    | source register                           |
//! | `cc`     | condition code                            |
//! | `n`      | `RST` target                              |
//! | `bit`    | bit index                                 |
//! | `data`   | 8 or 16-bit immediate                     |
//! | `add`    | 16-bit address                            |
//! | `offset` | relative jump target                      |
//! | `port`   | I/O port                                  |
//!
//! Two expansions claiming the same slot is a bug in the template list and
//! panics while the tables are built.

use once_cell::sync::Lazy;

use crate::cursor::Cursor;
use crate::decoders::{Defaults, InstructionSet};
use crate::instruction::Instruction;
use crate::opcodes::UNDEFINED;

/// Expansion and operand flags for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// `rp` over `BC DE` (bits 4-5, two values).
    Rp1,
    /// `rp` over `BC DE HL SP`.
    Rp2Sp,
    /// `rp` over `BC DE HL AF` (push/pop).
    Rp2Af,
    /// Low byte of 16-bit immediate data.
    DatLo,
    /// High byte of 16-bit immediate data.
    DatHi,
    /// `ddd` register in bits 3-5.
    Ddd,
    /// `sss` register in bits 0-2.
    Sss,
    /// 8-bit immediate data.
    Data,
    /// Signed 8-bit relative jump.
    Offset,
    /// Low byte of 16-bit address.
    AddLo,
    /// High byte of 16-bit address.
    AddHi,
    /// 8 condition codes in bits 3-5.
    Cc3,
    /// 4 condition codes in bits 3-4.
    Cc2,
    /// 8-bit I/O port.
    Port,
    /// 8 ALU mnemonics in bits 3-5.
    Alu,
    /// `RST` target in bits 3-5.
    N3,
    /// `ED`/`CB` secondary table prefix.
    Prefix,
    /// `DD`/`FD` index register override.
    Override,
    /// 4 block-instruction mnemonics in bits 3-4.
    Rd,
    /// Bit index in bits 3-5.
    Bit,
}

use Flag::*;

const REGISTERS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const CONDITIONS: [&str; 8] = ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];

/// One expanded opcode table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub opcode: u8,
    pub mnemonic: &'static str,
    /// Operand patterns still holding any data placeholders.
    pub operands: Vec<String>,
    flags: &'static [Flag],
}

impl Opcode {
    fn new(opcode: u8, mnemonic: &'static str, template: &str, flags: &'static [Flag]) -> Self {
        Self {
            opcode,
            mnemonic,
            operands: template
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            flags,
        }
    }

    fn undefined(opcode: u8) -> Self {
        Self::new(opcode, UNDEFINED, "", &[])
    }

    pub fn has(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_defined(&self) -> bool {
        self.mnemonic != UNDEFINED
    }
}

/// The three Z80 opcode tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Z80Tables {
    pub root: [Opcode; 256],
    pub ed: [Opcode; 256],
    pub cb: [Opcode; 256],
}

/// Tables built on first use.
pub static TABLES: Lazy<Z80Tables> = Lazy::new(build_tables);

struct TableBuilder {
    slots: Vec<Option<Opcode>>,
}

impl TableBuilder {
    fn new() -> Self {
        Self {
            slots: vec![None; 256],
        }
    }

    fn put(&mut self, opcode: usize, mnemonic: &'static str, template: &str, flags: &'static [Flag]) {
        assert!(
            self.slots[opcode].is_none(),
            "Z80 opcode slot {:02X} assigned twice",
            opcode
        );
        self.slots[opcode] = Some(Opcode::new(opcode as u8, mnemonic, template, flags));
    }

    fn op(self, base: u8, mnemonic: &'static str) -> Self {
        self.add(base, mnemonic, "", &[])
    }

    fn add(mut self, base: u8, mnemonic: &'static str, template: &'static str, flags: &'static [Flag]) -> Self {
        let base = base as usize;
        let has = |flag: Flag| flags.contains(&flag);

        // Flags that don't blend with others
        if has(Rp1) || has(Rp2Sp) || has(Rp2Af) {
            let pairs = if has(Rp2Af) {
                ["BC", "DE", "HL", "AF"]
            } else {
                ["BC", "DE", "HL", "SP"]
            };
            let size = if has(Rp1) { 2 } else { 4 };
            for (i, rp) in pairs.iter().enumerate().take(size) {
                self.put(base | i << 4, mnemonic, &template.replace("rp", rp), flags);
            }
        } else if has(Cc2) || has(Cc3) {
            let size = if has(Cc2) { 4 } else { 8 };
            for (i, cc) in CONDITIONS.iter().enumerate().take(size) {
                self.put(base | i << 3, mnemonic, &template.replace("cc", cc), flags);
            }
        } else if has(N3) {
            for i in 0..8 {
                let n = i << 3;
                self.put(base | n, mnemonic, &template.replace('n', &format!("{:02X}H", n)), flags);
            }
        } else if has(Rd) {
            let mnemonics: Vec<&'static str> = mnemonic.split(',').collect();
            assert_eq!(mnemonics.len(), 4, "block group {} needs 4 mnemonics", mnemonic);
            for (i, m) in mnemonics.into_iter().enumerate() {
                self.put(base | i << 3, m, template, flags);
            }
        }
        // These can combine, so order matters
        else if has(Ddd) && has(Sss) {
            for (d, ddd) in REGISTERS.iter().enumerate() {
                for (s, sss) in REGISTERS.iter().enumerate() {
                    // LD (HL),(HL) is HALT
                    if d == 0b110 && s == 0b110 {
                        continue;
                    }
                    let text = template.replace("ddd", ddd).replace("sss", sss);
                    self.put(base | d << 3 | s, mnemonic, &text, flags);
                }
            }
        } else if has(Alu) && has(Sss) {
            let mnemonics: Vec<&'static str> = mnemonic.split(',').collect();
            assert_eq!(mnemonics.len(), 8, "ALU group {} needs 8 mnemonics", mnemonic);
            for (i, m) in mnemonics.into_iter().enumerate() {
                for (s, sss) in REGISTERS.iter().enumerate() {
                    self.put(base | i << 3 | s, m, &template.replace("sss", sss), flags);
                }
            }
        } else if has(Bit) && has(Sss) {
            for i in 0..8 {
                for (s, sss) in REGISTERS.iter().enumerate() {
                    let text = template.replace("bit", &i.to_string()).replace("sss", sss);
                    self.put(base | i << 3 | s, mnemonic, &text, flags);
                }
            }
        } else if has(Ddd) {
            for (d, ddd) in REGISTERS.iter().enumerate() {
                self.put(base | d << 3, mnemonic, &template.replace("ddd", ddd), flags);
            }
        } else if has(Sss) {
            for (s, sss) in REGISTERS.iter().enumerate() {
                self.put(base | s, mnemonic, &template.replace("sss", sss), flags);
            }
        } else if has(Alu) {
            let mnemonics: Vec<&'static str> = mnemonic.split(',').collect();
            assert_eq!(mnemonics.len(), 8, "ALU group {} needs 8 mnemonics", mnemonic);
            for (i, m) in mnemonics.into_iter().enumerate() {
                self.put(base | i << 3, m, template, flags);
            }
        } else {
            self.put(base, mnemonic, template, flags);
        }
        self
    }

    fn build(self) -> [Opcode; 256] {
        let mut slots = self.slots;
        std::array::from_fn(|i| slots[i].take().unwrap_or_else(|| Opcode::undefined(i as u8)))
    }
}

const ALU_OPS: &str = "ADD,ADC,SUB,SBC,AND,XOR,OR,CP";

/// Expand the templates into the three tables.
///
/// # Panics
///
/// Panics if two templates expand into the same opcode slot.
pub fn build_tables() -> Z80Tables {
    let root = TableBuilder::new()
        .op(0b00000000, "NOP")
        .add(0b00000001, "LD", "rp,data", &[Rp2Sp, DatLo, DatHi])
        .add(0b00000010, "LD", "(rp),A", &[Rp1])
        .add(0b00000011, "INC", "rp", &[Rp2Sp])
        .add(0b00000100, "INC", "ddd", &[Ddd])
        .add(0b00000101, "DEC", "ddd", &[Ddd])
        .add(0b00000110, "LD", "ddd,data", &[Ddd, Data])
        .op(0b00000111, "RLCA")
        .add(0b00001000, "EX", "AF,AF'", &[])
        .add(0b00001001, "ADD", "HL,rp", &[Rp2Sp])
        .add(0b00001010, "LD", "A,(rp)", &[Rp1])
        .add(0b00001011, "DEC", "rp", &[Rp2Sp])
        .op(0b00001111, "RRCA")
        .add(0b00010000, "DJNZ", "offset", &[Offset])
        .op(0b00010111, "RLA")
        .add(0b00011000, "JR", "offset", &[Offset])
        .op(0b00011111, "RRA")
        .add(0b00100000, "JR", "cc,offset", &[Cc2, Offset])
        .add(0b00100010, "LD", "(add),HL", &[AddLo, AddHi])
        .op(0b00100111, "DAA")
        .add(0b00101010, "LD", "HL,(add)", &[AddLo, AddHi])
        .op(0b00101111, "CPL")
        .add(0b00110010, "LD", "(add),A", &[AddLo, AddHi])
        .op(0b00110111, "SCF")
        .add(0b00111010, "LD", "A,(add)", &[AddLo, AddHi])
        .op(0b00111111, "CCF")
        .add(0b01000000, "LD", "ddd,sss", &[Ddd, Sss])
        .op(0b01110110, "HALT")
        .add(0b10000000, ALU_OPS, "A,sss", &[Sss, Alu])
        .add(0b11000000, "RET", "cc", &[Cc3])
        .add(0b11000001, "POP", "rp", &[Rp2Af])
        .add(0b11000010, "JP", "cc,add", &[Cc3, AddLo, AddHi])
        .add(0b11000011, "JP", "add", &[AddLo, AddHi])
        .add(0b11000100, "CALL", "cc,add", &[Cc3, AddLo, AddHi])
        .add(0b11000101, "PUSH", "rp", &[Rp2Af])
        .add(0b11000110, ALU_OPS, "A,data", &[Alu, Data])
        .add(0b11000111, "RST", "n", &[N3])
        .op(0b11001001, "RET")
        .add(0b11001011, "CB", "", &[Prefix])
        .add(0b11001101, "CALL", "add", &[AddLo, AddHi])
        .add(0b11010011, "OUT", "(port),A", &[Port])
        .op(0b11011001, "EXX")
        .add(0b11011011, "IN", "A,(port)", &[Port])
        .add(0b11011101, "IX", "", &[Override])
        .add(0b11100011, "EX", "(SP),HL", &[])
        .add(0b11101001, "JP", "(HL)", &[])
        .add(0b11101011, "EX", "DE,HL", &[])
        .add(0b11101101, "ED", "", &[Prefix])
        .op(0b11110011, "DI")
        .add(0b11111001, "LD", "SP,HL", &[])
        .op(0b11111011, "EI")
        .add(0b11111101, "IY", "", &[Override])
        .build();

    let ed = TableBuilder::new()
        .add(0b01000000, "IN", "ddd,(C)", &[Ddd])
        .add(0b01000001, "OUT", "(C),ddd", &[Ddd])
        .add(0b01000010, "SBC", "HL,rp", &[Rp2Sp])
        .add(0b01000011, "LD", "(add),rp", &[AddLo, AddHi, Rp2Sp])
        .op(0b01000100, "NEG")
        .op(0b01000101, "RETN")
        .add(0b01000110, "IM", "0", &[])
        .add(0b01010110, "IM", "1", &[])
        .add(0b01011110, "IM", "2", &[])
        .add(0b01000111, "LD", "I,A", &[])
        .add(0b01001010, "ADC", "HL,rp", &[Rp2Sp])
        .add(0b01001011, "LD", "rp,(add)", &[AddLo, AddHi, Rp2Sp])
        .op(0b01001101, "RETI")
        .add(0b01001111, "LD", "R,A", &[])
        .add(0b01010111, "LD", "A,I", &[])
        .add(0b01011111, "LD", "A,R", &[])
        .op(0b01100111, "RRD")
        .op(0b01101111, "RLD")
        .add(0b10100000, "LDI,LDD,LDIR,LDDR", "", &[Rd])
        .add(0b10100001, "CPI,CPD,CPIR,CPDR", "", &[Rd])
        .add(0b10100010, "INI,IND,INIR,INDR", "", &[Rd])
        .add(0b10100011, "OUTI,OUTD,OTIR,OTDR", "", &[Rd])
        .build();

    let cb = TableBuilder::new()
        .add(0b00000000, "RLC", "sss", &[Sss])
        .add(0b00001000, "RRC", "sss", &[Sss])
        .add(0b00010000, "RL", "sss", &[Sss])
        .add(0b00011000, "RR", "sss", &[Sss])
        .add(0b00100000, "SLA", "sss", &[Sss])
        .add(0b00101000, "SRA", "sss", &[Sss])
        .add(0b00110000, "SLL", "sss", &[Sss])
        .add(0b00111000, "SRL", "sss", &[Sss])
        .add(0b01000000, "BIT", "bit,sss", &[Bit, Sss])
        .add(0b10000000, "RES", "bit,sss", &[Bit, Sss])
        .add(0b11000000, "SET", "bit,sss", &[Bit, Sss])
        .build();

    Z80Tables { root, ed, cb }
}

/// `(IX+05H)` / `(IY-02H)`
fn indexed(register: &str, displacement: i8) -> String {
    if displacement < 0 {
        format!("({}-{:02X}H)", register, displacement.unsigned_abs())
    } else {
        format!("({}+{:02X}H)", register, displacement)
    }
}

/// Z80 decoder. Stateless; the tables are shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Z80;

impl Z80 {
    pub fn new() -> Self {
        Z80
    }
}

impl InstructionSet for Z80 {
    fn defaults(&self) -> Defaults {
        Defaults {
            // CP/M .COM origin
            start_address: 0x0100,
            library_labels: &[],
            bytes_per_instruction: 5,
        }
    }

    fn decode_one(&mut self, cursor: &mut Cursor) -> Instruction {
        let tables = &*TABLES;
        let address = cursor.current_address();

        let mut length = 1;
        let mut b = cursor.peek_unsigned_byte(0);
        let mut op = &tables.root[b as usize];
        let mut index = None;
        let mut has_displacement = false;

        if op.has(Override) {
            index = Some(if op.opcode == 0xDD { "IX" } else { "IY" });
            b = cursor.peek_unsigned_byte(length);
            op = &tables.root[b as usize];
            length += 1;
        }
        // (DD|FD) (36|CB) <displacement> <opcode or data>
        if index.is_some() && (b == 0x36 || b == 0xCB) {
            has_displacement = true;
            length += 1;
        }
        if op.has(Prefix) {
            let next = cursor.peek_unsigned_byte(length) as usize;
            op = if op.opcode == 0xED {
                &tables.ed[next]
            } else {
                &tables.cb[next]
            };
            length += 1;
        }

        let mut value: u16 = 0;
        if (op.has(DatLo) && op.has(DatHi)) || (op.has(AddLo) && op.has(AddHi)) {
            value = cursor.peek_unsigned_short(length);
            length += 2;
        }
        if op.has(Data) || op.has(Port) {
            value = cursor.peek_unsigned_byte(length) as u16;
            length += 1;
        }
        if op.has(Offset) {
            let displacement = cursor.peek_signed_byte(length);
            length += 1;
            value = address
                .wrapping_add(length as u16)
                .wrapping_add(displacement as u16);
        }

        let mut builder = Instruction::at(address).mnemonic(op.mnemonic);
        for pattern in &op.operands {
            let mut text = pattern.clone();
            if let Some(register) = index {
                if text.contains("(HL)") {
                    if has_displacement {
                        text = text.replace("(HL)", &indexed(register, cursor.peek_signed_byte(2)));
                    } else if b == 0xE9 {
                        // JP (IX) and JP (IY) take no displacement
                        text = text.replace("(HL)", &format!("({})", register));
                    } else {
                        text = text.replace("(HL)", &indexed(register, cursor.peek_signed_byte(length)));
                        length += 1;
                    }
                } else if text.contains("HL") {
                    text = text.replace("HL", register);
                }
            }

            if text.contains("data") && op.has(DatLo) {
                builder.push_value(text.replace("data", &format!("{:04X}H", value)));
            } else if text.contains("add") {
                builder.push_address(text.replace("add", "{}"), format!("{:04X}H", value), value);
            } else if text.contains("port") {
                builder.push_value(text.replace("port", &format!("{:02X}H", value)));
            } else if text.contains("data") && op.has(Data) {
                builder.push_value(text.replace("data", &format!("{:02X}H", value)));
            } else if text.contains("offset") {
                builder.push_address(text.replace("offset", "{}"), format!("{:04X}H", value), value);
            } else {
                builder.push_value(text);
            }
        }

        builder.set_code(cursor.read(length));
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], address: u16) -> Instruction {
        Z80.decode_one(&mut Cursor::new(bytes.to_vec(), address))
    }

    fn text(instr: &Instruction) -> String {
        let operands: Vec<String> = instr.operands().iter().map(|o| o.format()).collect();
        format!("{} {}", instr.mnemonic(), operands.join(",")).trim_end().to_string()
    }

    #[test]
    fn test_tables_are_complete() {
        let tables = build_tables();
        for table in [&tables.root, &tables.ed, &tables.cb] {
            for (i, entry) in table.iter().enumerate() {
                assert_eq!(entry.opcode as usize, i);
            }
        }
        assert!(tables.root.iter().all(Opcode::is_defined));
        assert!(tables.cb.iter().all(Opcode::is_defined));
        assert_eq!(tables.ed.iter().filter(|o| o.is_defined()).count(), 60);
    }

    #[test]
    fn test_rebuild_is_identical() {
        assert_eq!(build_tables(), *TABLES);
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn test_duplicate_slot_panics() {
        TableBuilder::new()
            .add(0b00000100, "INC", "ddd", &[Ddd])
            .op(0b00111100, "OOPS");
    }

    #[test]
    fn test_halt_replaces_ld_hl_hl() {
        let tables = build_tables();
        assert_eq!(tables.root[0x76].mnemonic, "HALT");
        assert_eq!(tables.root[0x77].operands, vec!["(HL)", "A"]);
    }

    #[test]
    fn test_basic_forms() {
        assert_eq!(text(&decode(&[0x3E, 0x42], 0)), "LD A,42H");
        assert_eq!(text(&decode(&[0x21, 0x34, 0x12], 0)), "LD HL,1234H");
        assert_eq!(text(&decode(&[0xF5], 0)), "PUSH AF");
        assert_eq!(text(&decode(&[0x31, 0x00, 0xF0], 0)), "LD SP,F000H");
        assert_eq!(text(&decode(&[0xD3, 0x10], 0)), "OUT (10H),A");
        assert_eq!(text(&decode(&[0xFF], 0)), "RST 38H");
        assert_eq!(text(&decode(&[0x08], 0)), "EX AF,AF'");
        assert_eq!(text(&decode(&[0x76], 0)), "HALT");
    }

    #[test]
    fn test_jumps_are_address_bearing() {
        let jp = decode(&[0xC3, 0x00, 0x01], 0x0100);
        assert_eq!(text(&jp), "JP 0100H");
        assert_eq!(jp.operand_address(), Some(0x0100));

        let jr = decode(&[0x18, 0xFE], 0x0100);
        assert_eq!(jr.operand_address(), Some(0x0100));
        assert_eq!(jr.code().len(), 2);

        let jr_nz = decode(&[0x20, 0x05], 0x0100);
        assert_eq!(text(&jr_nz), "JR NZ,0107H");

        let ld = decode(&[0x3A, 0x00, 0x80], 0);
        assert_eq!(text(&ld), "LD A,(8000H)");
        assert_eq!(ld.operand_address(), Some(0x8000));
    }

    #[test]
    fn test_prefixed_tables() {
        let ldir = decode(&[0xED, 0xB0], 0);
        assert_eq!(text(&ldir), "LDIR");
        assert_eq!(ldir.code().len(), 2);

        let store = decode(&[0xED, 0x43, 0x34, 0x12], 0);
        assert_eq!(text(&store), "LD (1234H),BC");
        assert_eq!(store.code().len(), 4);

        assert_eq!(text(&decode(&[0xCB, 0x7E], 0)), "BIT 7,(HL)");

        let undefined = decode(&[0xED, 0x00], 0);
        assert_eq!(undefined.mnemonic(), UNDEFINED);
        assert_eq!(undefined.code().len(), 2);
    }

    #[test]
    fn test_index_register_overrides() {
        let ld_ix = decode(&[0xDD, 0x21, 0x34, 0x12], 0);
        assert_eq!(text(&ld_ix), "LD IX,1234H");
        assert_eq!(ld_ix.code().len(), 4);

        let ld_a = decode(&[0xDD, 0x7E, 0x05], 0);
        assert_eq!(text(&ld_a), "LD A,(IX+05H)");
        assert_eq!(ld_a.code().len(), 3);

        let ld_imm = decode(&[0xFD, 0x36, 0xFE, 0x42], 0);
        assert_eq!(text(&ld_imm), "LD (IY-02H),42H");
        assert_eq!(ld_imm.code().len(), 4);

        let set_bit = decode(&[0xDD, 0xCB, 0x03, 0xC6], 0);
        assert_eq!(text(&set_bit), "SET 0,(IX+03H)");
        assert_eq!(set_bit.code().len(), 4);

        let jp = decode(&[0xDD, 0xE9], 0);
        assert_eq!(text(&jp), "JP (IX)");
        assert_eq!(jp.code().len(), 2);

        assert_eq!(text(&decode(&[0xFD, 0xE3], 0)), "EX (SP),IY");
    }
}
