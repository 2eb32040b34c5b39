//! # 6502-Family Opcode Tables
//!
//! This module contains the 256-entry mnemonic and addressing-mode tables for
//! the three 6502-family variants:
//!
//! - **6502** - documented NMOS opcodes; every undocumented opcode decodes as
//!   a 1-byte `???`
//! - **6502X** - NMOS opcodes including the undocumented mnemonics
//!   (SLO, RLA, LAX, JAM, ...)
//! - **65C02** - CMOS opcodes; undefined opcodes keep their NOP length
//!   (1, 2 or 3 bytes) so decoding never desynchronizes
//!
//! Tables are laid out as 16x16 grids indexed by the opcode byte.

use crate::addressing::AddressingMode;
use crate::addressing::AddressingMode::*;

/// Mnemonic used for opcodes that have no instruction.
pub const UNDEFINED: &str = "???";

const ACC: AddressingMode = Accumulator;
const IMP: AddressingMode = Implicit;
const IMM: AddressingMode = Immediate;
const ZP: AddressingMode = ZeroPage;
const ZPX: AddressingMode = ZeroPageX;
const ZPY: AddressingMode = ZeroPageY;
const REL: AddressingMode = Relative;
const ABS: AddressingMode = Absolute;
const ABX: AddressingMode = AbsoluteX;
const ABY: AddressingMode = AbsoluteY;
const IND: AddressingMode = Indirect;
const IAX: AddressingMode = AbsoluteIndexedIndirect;
const IZP: AddressingMode = ZeroPageIndirect;
const INX: AddressingMode = IndirectX;
const INY: AddressingMode = IndirectY;
const U1: AddressingMode = Undefined1;
const U2: AddressingMode = Undefined2;
const U3: AddressingMode = Undefined3;

const ZZZ: &str = UNDEFINED;

/// Metadata for a single opcode.
///
/// # Examples
///
/// ```
/// use retrodis::opcodes::MOS6502;
/// use retrodis::AddressingMode;
///
/// let lda_imm = MOS6502.lookup(0xA9);
/// assert_eq!(lda_imm.mnemonic, "LDA");
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.size_bytes, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic (e.g., "LDA", "STA", "???" for undefined opcodes).
    pub mnemonic: &'static str,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,
}

/// One 6502-family instruction set: parallel mnemonic and mode grids.
#[derive(Debug)]
pub struct OpcodeTable {
    name: &'static str,
    mnemonics: &'static [&'static str; 256],
    modes: &'static [AddressingMode; 256],
    collapse_undefined: bool,
}

impl OpcodeTable {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up an opcode. Never fails: undefined slots return a sentinel entry.
    pub fn lookup(&self, opcode: u8) -> OpcodeMetadata {
        let mnemonic = self.mnemonics[opcode as usize];
        let addressing_mode = if self.collapse_undefined && mnemonic == UNDEFINED {
            Implicit
        } else {
            self.modes[opcode as usize]
        };
        OpcodeMetadata {
            mnemonic,
            addressing_mode,
            size_bytes: addressing_mode.instruction_length() as u8,
        }
    }
}

/// Documented NMOS 6502.
pub static MOS6502: OpcodeTable = OpcodeTable {
    name: "6502",
    mnemonics: &MOS6502_MNEMONICS,
    modes: &MOS6502_MODES,
    collapse_undefined: true,
};

/// NMOS 6502 including undocumented opcodes.
pub static MOS6502_ILLEGAL: OpcodeTable = OpcodeTable {
    name: "6502X",
    mnemonics: &MOS6502_ILLEGAL_MNEMONICS,
    modes: &MOS6502_MODES,
    collapse_undefined: true,
};

/// CMOS 65C02.
pub static WDC65C02: OpcodeTable = OpcodeTable {
    name: "65C02",
    mnemonics: &WDC65C02_MNEMONICS,
    modes: &WDC65C02_MODES,
    collapse_undefined: false,
};

#[rustfmt::skip]
static MOS6502_MODES: [AddressingMode; 256] = [
    //      -0   -1   -2   -3   -4   -5   -6   -7   -8   -9   -A   -B   -C   -D   -E   -F
    /* 0- */ IMP, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS,
    /* 1- */ REL, INY, IMM, INY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
    /* 2- */ ABS, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS,
    /* 3- */ REL, INY, IMM, INY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
    /* 4- */ IMP, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS,
    /* 5- */ REL, INY, IMM, INY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
    /* 6- */ IMP, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, ACC, IMM, IND, ABS, ABS, ABS,
    /* 7- */ REL, INY, IMM, INY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
    /* 8- */ IMM, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
    /* 9- */ REL, INY, IMM, INY, ZPX, ZPX, ZPY, ZPY, IMP, ABY, IMP, ABY, ABX, ABX, ABY, ABY,
    /* A- */ IMM, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
    /* B- */ REL, INY, IMM, INY, ZPX, ZPX, ZPY, ZPY, IMP, ABY, IMP, ABY, ABX, ABX, ABY, ABY,
    /* C- */ IMM, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
    /* D- */ REL, INY, IMM, INY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
    /* E- */ IMM, INX, IMM, INX, ZP,  ZP,  ZP,  ZP,  IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
    /* F- */ REL, INY, IMM, INY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
];

#[rustfmt::skip]
static MOS6502_MNEMONICS: [&str; 256] = [
    //        -0     -1     -2     -3     -4     -5     -6     -7     -8     -9     -A     -B     -C     -D     -E     -F
    /* 0- */ "BRK", "ORA", ZZZ,   ZZZ,   ZZZ,   "ORA", "ASL", ZZZ,   "PHP", "ORA", "ASL", ZZZ,   ZZZ,   "ORA", "ASL", ZZZ,
    /* 1- */ "BPL", "ORA", ZZZ,   ZZZ,   ZZZ,   "ORA", "ASL", ZZZ,   "CLC", "ORA", ZZZ,   ZZZ,   ZZZ,   "ORA", "ASL", ZZZ,
    /* 2- */ "JSR", "AND", ZZZ,   ZZZ,   "BIT", "AND", "ROL", ZZZ,   "PLP", "AND", "ROL", ZZZ,   "BIT", "AND", "ROL", ZZZ,
    /* 3- */ "BMI", "AND", ZZZ,   ZZZ,   ZZZ,   "AND", "ROL", ZZZ,   "SEC", "AND", ZZZ,   ZZZ,   ZZZ,   "AND", "ROL", ZZZ,
    /* 4- */ "RTI", "EOR", ZZZ,   ZZZ,   ZZZ,   "EOR", "LSR", ZZZ,   "PHA", "EOR", "LSR", ZZZ,   "JMP", "EOR", "LSR", ZZZ,
    /* 5- */ "BVC", "EOR", ZZZ,   ZZZ,   ZZZ,   "EOR", "LSR", ZZZ,   "CLI", "EOR", ZZZ,   ZZZ,   ZZZ,   "EOR", "LSR", ZZZ,
    /* 6- */ "RTS", "ADC", ZZZ,   ZZZ,   ZZZ,   "ADC", "ROR", ZZZ,   "PLA", "ADC", "ROR", ZZZ,   "JMP", "ADC", "ROR", ZZZ,
    /* 7- */ "BVS", "ADC", ZZZ,   ZZZ,   ZZZ,   "ADC", "ROR", ZZZ,   "SEI", "ADC", ZZZ,   ZZZ,   ZZZ,   "ADC", "ROR", ZZZ,
    /* 8- */ ZZZ,   "STA", ZZZ,   ZZZ,   "STY", "STA", "STX", ZZZ,   "DEY", ZZZ,   "TXA", ZZZ,   "STY", "STA", "STX", ZZZ,
    /* 9- */ "BCC", "STA", ZZZ,   ZZZ,   "STY", "STA", "STX", ZZZ,   "TYA", "STA", "TXS", ZZZ,   ZZZ,   "STA", ZZZ,   ZZZ,
    /* A- */ "LDY", "LDA", "LDX", ZZZ,   "LDY", "LDA", "LDX", ZZZ,   "TAY", "LDA", "TAX", ZZZ,   "LDY", "LDA", "LDX", ZZZ,
    /* B- */ "BCS", "LDA", ZZZ,   ZZZ,   "LDY", "LDA", "LDX", ZZZ,   "CLV", "LDA", "TSX", ZZZ,   "LDY", "LDA", "LDX", ZZZ,
    /* C- */ "CPY", "CMP", ZZZ,   ZZZ,   "CPY", "CMP", "DEC", ZZZ,   "INY", "CMP", "DEX", ZZZ,   "CPY", "CMP", "DEC", ZZZ,
    /* D- */ "BNE", "CMP", ZZZ,   ZZZ,   ZZZ,   "CMP", "DEC", ZZZ,   "CLD", "CMP", ZZZ,   ZZZ,   ZZZ,   "CMP", "DEC", ZZZ,
    /* E- */ "CPX", "SBC", ZZZ,   ZZZ,   "CPX", "SBC", "INC", ZZZ,   "INX", "SBC", "NOP", ZZZ,   "CPX", "SBC", "INC", ZZZ,
    /* F- */ "BEQ", "SBC", ZZZ,   ZZZ,   ZZZ,   "SBC", "INC", ZZZ,   "SED", "SBC", ZZZ,   ZZZ,   ZZZ,   "SBC", "INC", ZZZ,
];

#[rustfmt::skip]
static MOS6502_ILLEGAL_MNEMONICS: [&str; 256] = [
    //        -0     -1     -2     -3     -4     -5     -6     -7     -8     -9     -A     -B      -C     -D     -E     -F
    /* 0- */ "BRK", "ORA", "JAM", "SLO", "NOP", "ORA", "ASL", "SLO", "PHP", "ORA", "ASL", "ANC",  "NOP", "ORA", "ASL", "SLO",
    /* 1- */ "BPL", "ORA", "JAM", "SLO", "NOP", "ORA", "ASL", "SLO", "CLC", "ORA", "NOP", "SLO",  "NOP", "ORA", "ASL", "SLO",
    /* 2- */ "JSR", "AND", "JAM", "RLA", "BIT", "AND", "ROL", "RLA", "PLP", "AND", "ROL", "ANC",  "BIT", "AND", "ROL", "RLA",
    /* 3- */ "BMI", "AND", "JAM", "RLA", "NOP", "AND", "ROL", "RLA", "SEC", "AND", "NOP", "RLA",  "NOP", "AND", "ROL", "RLA",
    /* 4- */ "RTI", "EOR", "JAM", "SRE", "NOP", "EOR", "LSR", "SRE", "PHA", "EOR", "LSR", "ALR",  "JMP", "EOR", "LSR", "SRE",
    /* 5- */ "BVC", "EOR", "JAM", "SRE", "NOP", "EOR", "LSR", "SRE", "CLI", "EOR", "NOP", "SRE",  "NOP", "EOR", "LSR", "SRE",
    /* 6- */ "RTS", "ADC", "JAM", "RRA", "NOP", "ADC", "ROR", "RRA", "PLA", "ADC", "ROR", "ARR",  "JMP", "ADC", "ROR", "RRA",
    /* 7- */ "BVS", "ADC", "JAM", "RRA", "NOP", "ADC", "ROR", "RRA", "SEI", "ADC", "NOP", "RRA",  "NOP", "ADC", "ROR", "RRA",
    /* 8- */ "NOP", "STA", "NOP", "SAX", "STY", "STA", "STX", "SAX", "DEY", "NOP", "TXA", "ANE",  "STY", "STA", "STX", "SAX",
    /* 9- */ "BCC", "STA", "JAM", "SHA", "STY", "STA", "STX", "SAX", "TYA", "STA", "TXS", "TAS",  "SHY", "STA", "SHX", "SHA",
    /* A- */ "LDY", "LDA", "LDX", "LAX", "LDY", "LDA", "LDX", "LAX", "TAY", "LDA", "TAX", "LXA",  "LDY", "LDA", "LDX", "LAX",
    /* B- */ "BCS", "LDA", "JAM", "LAX", "LDY", "LDA", "LDX", "LAX", "CLV", "LDA", "TSX", "LAS",  "LDY", "LDA", "LDX", "LAX",
    /* C- */ "CPY", "CMP", "NOP", "DCP", "CPY", "CMP", "DEC", "DCP", "INY", "CMP", "DEX", "SBX",  "CPY", "CMP", "DEC", "DCP",
    /* D- */ "BNE", "CMP", "JAM", "DCP", "NOP", "CMP", "DEC", "DCP", "CLD", "CMP", "NOP", "DCP",  "NOP", "CMP", "DEC", "DCP",
    /* E- */ "CPX", "SBC", "NOP", "ISC", "CPX", "SBC", "INC", "ISC", "INX", "SBC", "NOP", "USBC", "CPX", "SBC", "INC", "ISC",
    /* F- */ "BEQ", "SBC", "JAM", "ISC", "NOP", "SBC", "INC", "ISC", "SED", "SBC", "NOP", "ISC",  "NOP", "SBC", "INC", "ISC",
];

// No Rockwell bit instructions: columns -7 and -F are 1-byte NOPs.
#[rustfmt::skip]
static WDC65C02_MODES: [AddressingMode; 256] = [
    //      -0   -1   -2   -3   -4   -5   -6   -7   -8   -9   -A   -B   -C   -D   -E   -F
    /* 0- */ IMP, INX, U2,  U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, ACC, U1,  ABS, ABS, ABS, U1,
    /* 1- */ REL, INY, IZP, U1,  ZP,  ZPX, ZPX, U1,  IMP, ABY, ACC, U1,  ABS, ABX, ABX, U1,
    /* 2- */ ABS, INX, U2,  U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, ACC, U1,  ABS, ABS, ABS, U1,
    /* 3- */ REL, INY, IZP, U1,  ZPX, ZPX, ZPX, U1,  IMP, ABY, ACC, U1,  ABX, ABX, ABX, U1,
    /* 4- */ IMP, INX, U2,  U1,  U2,  ZP,  ZP,  U1,  IMP, IMM, ACC, U1,  ABS, ABS, ABS, U1,
    /* 5- */ REL, INY, IZP, U1,  U2,  ZPX, ZPX, U1,  IMP, ABY, IMP, U1,  U3,  ABX, ABX, U1,
    /* 6- */ IMP, INX, U2,  U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, ACC, U1,  IND, ABS, ABS, U1,
    /* 7- */ REL, INY, IZP, U1,  ZPX, ZPX, ZPX, U1,  IMP, ABY, IMP, U1,  IAX, ABX, ABX, U1,
    /* 8- */ REL, INX, U2,  U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, IMP, U1,  ABS, ABS, ABS, U1,
    /* 9- */ REL, INY, IZP, U1,  ZPX, ZPX, ZPY, U1,  IMP, ABY, IMP, U1,  ABS, ABX, ABX, U1,
    /* A- */ IMM, INX, IMM, U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, IMP, U1,  ABS, ABS, ABS, U1,
    /* B- */ REL, INY, IZP, U1,  ZPX, ZPX, ZPY, U1,  IMP, ABY, IMP, U1,  ABX, ABX, ABY, U1,
    /* C- */ IMM, INX, U2,  U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, IMP, U1,  ABS, ABS, ABS, U1,
    /* D- */ REL, INY, IZP, U1,  U2,  ZPX, ZPX, U1,  IMP, ABY, IMP, U1,  U3,  ABX, ABX, U1,
    /* E- */ IMM, INX, U2,  U1,  ZP,  ZP,  ZP,  U1,  IMP, IMM, IMP, U1,  ABS, ABS, ABS, U1,
    /* F- */ REL, INY, IZP, U1,  U2,  ZPX, ZPX, U1,  IMP, ABY, IMP, U1,  U3,  ABX, ABX, U1,
];

#[rustfmt::skip]
static WDC65C02_MNEMONICS: [&str; 256] = [
    //        -0     -1     -2     -3     -4     -5     -6     -7     -8     -9     -A     -B     -C     -D     -E     -F
    /* 0- */ "BRK", "ORA", ZZZ,   ZZZ,   "TSB", "ORA", "ASL", ZZZ,   "PHP", "ORA", "ASL", ZZZ,   "TSB", "ORA", "ASL", ZZZ,
    /* 1- */ "BPL", "ORA", "ORA", ZZZ,   "TRB", "ORA", "ASL", ZZZ,   "CLC", "ORA", "INC", ZZZ,   "TRB", "ORA", "ASL", ZZZ,
    /* 2- */ "JSR", "AND", ZZZ,   ZZZ,   "BIT", "AND", "ROL", ZZZ,   "PLP", "AND", "ROL", ZZZ,   "BIT", "AND", "ROL", ZZZ,
    /* 3- */ "BMI", "AND", "AND", ZZZ,   "BIT", "AND", "ROL", ZZZ,   "SEC", "AND", "DEC", ZZZ,   "BIT", "AND", "ROL", ZZZ,
    /* 4- */ "RTI", "EOR", ZZZ,   ZZZ,   ZZZ,   "EOR", "LSR", ZZZ,   "PHA", "EOR", "LSR", ZZZ,   "JMP", "EOR", "LSR", ZZZ,
    /* 5- */ "BVC", "EOR", "EOR", ZZZ,   ZZZ,   "EOR", "LSR", ZZZ,   "CLI", "EOR", "PHY", ZZZ,   ZZZ,   "EOR", "LSR", ZZZ,
    /* 6- */ "RTS", "ADC", ZZZ,   ZZZ,   "STZ", "ADC", "ROR", ZZZ,   "PLA", "ADC", "ROR", ZZZ,   "JMP", "ADC", "ROR", ZZZ,
    /* 7- */ "BVS", "ADC", "ADC", ZZZ,   "STZ", "ADC", "ROR", ZZZ,   "SEI", "ADC", "PLY", ZZZ,   "JMP", "ADC", "ROR", ZZZ,
    /* 8- */ "BRA", "STA", ZZZ,   ZZZ,   "STY", "STA", "STX", ZZZ,   "DEY", "BIT", "TXA", ZZZ,   "STY", "STA", "STX", ZZZ,
    /* 9- */ "BCC", "STA", "STA", ZZZ,   "STY", "STA", "STX", ZZZ,   "TYA", "STA", "TXS", ZZZ,   "STZ", "STA", "STZ", ZZZ,
    /* A- */ "LDY", "LDA", "LDX", ZZZ,   "LDY", "LDA", "LDX", ZZZ,   "TAY", "LDA", "TAX", ZZZ,   "LDY", "LDA", "LDX", ZZZ,
    /* B- */ "BCS", "LDA", "LDA", ZZZ,   "LDY", "LDA", "LDX", ZZZ,   "CLV", "LDA", "TSX", ZZZ,   "LDY", "LDA", "LDX", ZZZ,
    /* C- */ "CPY", "CMP", ZZZ,   ZZZ,   "CPY", "CMP", "DEC", ZZZ,   "INY", "CMP", "DEX", ZZZ,   "CPY", "CMP", "DEC", ZZZ,
    /* D- */ "BNE", "CMP", "CMP", ZZZ,   ZZZ,   "CMP", "DEC", ZZZ,   "CLD", "CMP", "PHX", ZZZ,   ZZZ,   "CMP", "DEC", ZZZ,
    /* E- */ "CPX", "SBC", ZZZ,   ZZZ,   "CPX", "SBC", "INC", ZZZ,   "INX", "SBC", "NOP", ZZZ,   "CPX", "SBC", "INC", ZZZ,
    /* F- */ "BEQ", "SBC", "SBC", ZZZ,   ZZZ,   "SBC", "INC", ZZZ,   "SED", "SBC", "PLX", ZZZ,   ZZZ,   "SBC", "INC", ZZZ,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_undefined_collapses_to_implied() {
        // 0x0C is an undocumented 3-byte NOP on NMOS
        let meta = MOS6502.lookup(0x0C);
        assert_eq!(meta.mnemonic, UNDEFINED);
        assert_eq!(meta.addressing_mode, AddressingMode::Implicit);
        assert_eq!(meta.size_bytes, 1);
    }

    #[test]
    fn test_illegal_keeps_operand_length() {
        let meta = MOS6502_ILLEGAL.lookup(0x0C);
        assert_eq!(meta.mnemonic, "NOP");
        assert_eq!(meta.size_bytes, 3);

        let lax = MOS6502_ILLEGAL.lookup(0xA7);
        assert_eq!(lax.mnemonic, "LAX");
        assert_eq!(lax.addressing_mode, AddressingMode::ZeroPage);
    }

    #[test]
    fn test_65c02_undefined_size_classes() {
        for op in [0x03u8, 0x07, 0x0B, 0x0F, 0xF3, 0xFF] {
            assert_eq!(WDC65C02.lookup(op).size_bytes, 1, "opcode {:02X}", op);
        }
        for op in [0x02u8, 0x22, 0x42, 0x62, 0x82, 0xC2, 0xE2, 0x44, 0x54, 0xD4, 0xF4] {
            assert_eq!(WDC65C02.lookup(op).size_bytes, 2, "opcode {:02X}", op);
        }
        for op in [0x5Cu8, 0xDC, 0xFC] {
            assert_eq!(WDC65C02.lookup(op).size_bytes, 3, "opcode {:02X}", op);
        }
    }

    #[test]
    fn test_65c02_additions() {
        assert_eq!(WDC65C02.lookup(0x80).mnemonic, "BRA");
        assert_eq!(WDC65C02.lookup(0x64).mnemonic, "STZ");
        assert_eq!(WDC65C02.lookup(0x64).addressing_mode, AddressingMode::ZeroPage);
        assert_eq!(WDC65C02.lookup(0x7C).addressing_mode, AddressingMode::AbsoluteIndexedIndirect);
        assert_eq!(WDC65C02.lookup(0xB2).addressing_mode, AddressingMode::ZeroPageIndirect);
        assert_eq!(WDC65C02.lookup(0x1A).mnemonic, "INC");
    }

    #[test]
    fn test_undefined_entries_agree_with_mode() {
        // A 65C02 undefined opcode always carries an Undefined* mode and vice versa.
        for op in 0..=255u8 {
            let meta = WDC65C02.lookup(op);
            let undefined_mode = matches!(
                meta.addressing_mode,
                AddressingMode::Undefined1 | AddressingMode::Undefined2 | AddressingMode::Undefined3
            );
            assert_eq!(meta.mnemonic == UNDEFINED, undefined_mode, "opcode {:02X}", op);
        }
    }
}
