//! # Addressing Modes
//!
//! This module defines the addressing modes used by the 6502 family
//! (NMOS 6502, its undocumented opcodes, and the 65C02). Each mode
//! determines the instruction length and how the operand is displayed.

/// 6502-family addressing mode enumeration.
///
/// # Instruction Sizes
///
/// - **1 byte**: Implicit, Accumulator, Undefined1
/// - **2 bytes**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative,
///   ZeroPageIndirect, IndirectX, IndirectY, Undefined2
/// - **3 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect,
///   AbsoluteIndexedIndirect, Undefined3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR, ROL, ASL (displayed without an operand)
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Target is relative to the address following the 2-byte instruction.
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Example: JMP ($FFFC)
    Indirect,

    /// Indexed indirect through a 16-bit pointer table (65C02 only).
    ///
    /// Example: JMP ($1234,X)
    AbsoluteIndexedIndirect,

    /// Zero page indirect without indexing (65C02 only).
    ///
    /// Example: LDA ($40)
    ZeroPageIndirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,

    /// 65C02 undefined opcode that executes as a 1-byte NOP.
    Undefined1,

    /// 65C02 undefined opcode that executes as a 2-byte NOP.
    Undefined2,

    /// 65C02 undefined opcode that executes as a 3-byte NOP.
    Undefined3,
}

impl AddressingMode {
    /// Total instruction length in bytes (opcode + operand).
    pub const fn instruction_length(self) -> usize {
        use AddressingMode::*;
        match self {
            Implicit | Accumulator | Undefined1 => 1,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | ZeroPageIndirect
            | IndirectX | IndirectY | Undefined2 => 2,
            Absolute | AbsoluteX | AbsoluteY | Indirect | AbsoluteIndexedIndirect
            | Undefined3 => 3,
        }
    }

    /// True for the signed branch displacement mode.
    pub const fn is_relative(self) -> bool {
        matches!(self, AddressingMode::Relative)
    }
}
