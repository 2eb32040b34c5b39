//! Property-based tests for the decoders.
//!
//! These tests verify that decoding is total for every architecture, that
//! instruction lengths agree with the opcode tables, and that relative
//! branches and p-code big integers resolve correctly for all inputs.

use proptest::prelude::*;
use retrodis::decoders::pcode::big_value;
use retrodis::opcodes::{MOS6502, MOS6502_ILLEGAL, WDC65C02};
use retrodis::{decode, Architecture, Disassembler, LabelLibrary};

fn any_architecture() -> impl Strategy<Value = Architecture> {
    prop::sample::select(Architecture::ALL.to_vec())
}

/// Encode a p-code big parameter.
fn encode_big(value: u16) -> Vec<u8> {
    if value <= 127 {
        vec![value as u8]
    } else {
        vec![0x80 | (value >> 8) as u8, value as u8]
    }
}

// ========== Totality ==========

proptest! {
    /// Property: any byte sequence decodes, with addresses advancing by the
    /// bytes each instruction consumed
    #[test]
    fn prop_decode_is_total(
        arch in any_architecture(),
        bytes in prop::collection::vec(any::<u8>(), 0..96),
        base in any::<u16>(),
    ) {
        let instructions = decode(&bytes, base, arch);

        let mut expected = base;
        let mut consumed = 0usize;
        for instr in &instructions {
            prop_assert_eq!(instr.address(), expected);
            if !instr.code().is_empty() {
                prop_assert!(consumed < bytes.len(), "instruction starts past the end");
            }
            prop_assert!(!instr.mnemonic().is_empty());
            prop_assert!(instr.operands().iter().filter(|op| op.address().is_some()).count() <= 1
                || instr.mnemonic() == "XJP");
            consumed += instr.code().len();
            expected = expected.wrapping_add(instr.code().len() as u16);
        }
        prop_assert!(consumed >= bytes.len());
    }

    /// Property: the full disassembler never fails with default settings
    #[test]
    fn prop_disassembler_runs(
        arch in any_architecture(),
        bytes in prop::collection::vec(any::<u8>(), 0..64),
        base in any::<u16>(),
    ) {
        let result = Disassembler::new(arch).start_address(base).run(&bytes);
        prop_assert!(result.is_ok());
    }
}

/// Every single byte decodes to exactly one instruction on every architecture
#[test]
fn test_single_byte_totality() {
    for arch in Architecture::ALL {
        for byte in 0..=255u8 {
            let instructions = decode(&[byte], 0x0300, arch);
            assert_eq!(instructions.len(), 1, "{} opcode {:02X}", arch, byte);
            assert_eq!(instructions[0].code()[0], byte);
        }
    }
}

/// `DD CB d op` and `FD CB d op` are always one 4-byte instruction
#[test]
fn test_z80_indexed_bit_ops() {
    for prefix in [0xDD, 0xFD] {
        for op in 0..=255u8 {
            let code = [prefix, 0xCB, 0x05, op];
            let instructions = decode(&code, 0x0100, Architecture::Z80);
            assert_eq!(instructions.len(), 1, "{:02X} CB 05 {:02X}", prefix, op);
            assert_eq!(instructions[0].code(), &code);
        }
    }
}

// ========== Length Consistency ==========

proptest! {
    /// Property: 6502-family instructions consume exactly the table length
    #[test]
    fn prop_6502_length_matches_table(opcode in any::<u8>(), lo in any::<u8>(), hi in any::<u8>()) {
        let cases = [
            (Architecture::Mos6502, &MOS6502),
            (Architecture::Mos6502Illegal, &MOS6502_ILLEGAL),
            (Architecture::Wdc65C02, &WDC65C02),
        ];
        for (arch, table) in cases {
            let instructions = decode(&[opcode, lo, hi], 0x0300, arch);
            let expected = table.lookup(opcode).size_bytes as usize;
            prop_assert_eq!(instructions[0].code().len(), expected);
            prop_assert_eq!(instructions[0].code(), &[opcode, lo, hi][..expected]);
        }
    }

    /// Property: concatenated NOPs decode one per byte with increasing addresses
    #[test]
    fn prop_nop_run(count in 1usize..64, base in any::<u16>()) {
        let instructions = decode(&vec![0xEA; count], base, Architecture::Mos6502);
        prop_assert_eq!(instructions.len(), count);
        for (i, instr) in instructions.iter().enumerate() {
            prop_assert_eq!(instr.address(), base.wrapping_add(i as u16));
        }
    }
}

// ========== Relative Branches ==========

proptest! {
    /// Property: 6502 branch target is (A + 2 + D) mod 65536
    #[test]
    fn prop_6502_branch_target(base in any::<u16>(), displacement in any::<i8>()) {
        let instructions = decode(&[0xD0, displacement as u8], base, Architecture::Mos6502);
        let expected = (base as i32 + 2 + displacement as i32).rem_euclid(0x10000) as u16;
        prop_assert_eq!(instructions[0].operand_address(), Some(expected));
    }

    /// Property: SWEET16 branches resolve the same way
    #[test]
    fn prop_sweet16_branch_target(base in any::<u16>(), displacement in any::<i8>(), op in 1u8..=9) {
        let instructions = decode(&[op, displacement as u8], base, Architecture::Sweet16);
        let expected = (base as i32 + 2 + displacement as i32).rem_euclid(0x10000) as u16;
        prop_assert_eq!(instructions[0].operand_address(), Some(expected));
    }

    /// Property: Z80 JR resolves relative to the end of the instruction
    #[test]
    fn prop_z80_jr_target(base in any::<u16>(), displacement in any::<i8>()) {
        let instructions = decode(&[0x18, displacement as u8], base, Architecture::Z80);
        let expected = (base as i32 + 2 + displacement as i32).rem_euclid(0x10000) as u16;
        prop_assert_eq!(instructions[0].operand_address(), Some(expected));
    }
}

#[test]
fn test_branch_boundaries() {
    for (displacement, expected) in [(0i8, 0x0302u16), (127, 0x0381), (-128, 0x0282)] {
        let instructions = decode(&[0x10, displacement as u8], 0x0300, Architecture::Mos6502);
        assert_eq!(instructions[0].operand_address(), Some(expected));
    }
    let wrapped = decode(&[0x10, 0x10], 0xFFF8, Architecture::Mos6502);
    assert_eq!(wrapped[0].operand_address(), Some(0x000A));
}

// ========== p-code Big Integers ==========

proptest! {
    /// Property: big parameters decode back to the encoded value
    #[test]
    fn prop_pcode_big_round_trip(value in 0u16..=32767) {
        let encoded = encode_big(value);
        let second = encoded.get(1).copied().unwrap_or(0xFF);
        prop_assert_eq!(big_value(encoded[0], second), (value, encoded.len()));

        // LDL with the parameter
        let mut code = vec![202];
        code.extend(&encoded);
        let instructions = decode(&code, 0, Architecture::PCode);
        prop_assert_eq!(instructions.len(), 1);
        prop_assert_eq!(instructions[0].code().len(), 1 + encoded.len());
        prop_assert_eq!(instructions[0].operands()[0].format(), value.to_string());
    }
}

#[test]
fn test_pcode_big_boundaries() {
    assert_eq!(encode_big(0), vec![0x00]);
    assert_eq!(encode_big(127), vec![0x7F]);
    assert_eq!(encode_big(128), vec![0x80, 0x80]);
    assert_eq!(encode_big(32767), vec![0xFF, 0xFF]);
    for value in [0u16, 127, 128, 32767] {
        let encoded = encode_big(value);
        let second = encoded.get(1).copied().unwrap_or(0);
        assert_eq!(big_value(encoded[0], second).0, value);
    }
}

// ========== Labels ==========

proptest! {
    /// Property: an external name always beats the auto-generated one
    #[test]
    fn prop_external_label_wins(base in any::<u16>(), back in 0u8..=125) {
        // NOP sled then a branch back into it
        let mut code = vec![0xEA; back as usize];
        code.extend([0xD0, (-(back as i16) - 2) as u8]);
        let target = base;

        let mut library = LabelLibrary::new();
        library.insert("Local", "FOO", target);
        let result = Disassembler::new(Architecture::Mos6502)
            .start_address(base)
            .library(&library)
            .run(&code)
            .unwrap();

        let branch = result.instructions().last().unwrap();
        prop_assert_eq!(branch.operand_address(), Some(target));
        prop_assert_eq!(result.label_at(target), Some("FOO"));
    }
}
