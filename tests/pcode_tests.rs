//! Integration tests for p-code disassembly

use retrodis::decoders::pcode::PCode;
use retrodis::disassembler::formatter::format_instruction;
use retrodis::{decode, Architecture, Cursor, Disassembler, InstructionSet};

#[test]
fn test_simple_procedure() {
    let code = [
        0x03, // SLDC 3
        0xCC, 0x01, // STL 1
        0xD8, // SLDL 1
        0x9E, 0x04, // EXIT
        0xAD, 0x00, // RNP 0
    ];
    let instructions = decode(&code, 0, Architecture::PCode);
    let text: Vec<String> = instructions
        .iter()
        .map(|i| format_instruction(i, None))
        .collect();
    assert_eq!(text, vec!["SLDC 3", "STL 1", "SLDL 1", "EXIT", "RNP 0"]);
}

#[test]
fn test_jumps_are_labelled() {
    let code = [
        0xA1, 0x02, // FJP $0004
        0x00, // SLDC 0
        0x01, // SLDC 1
        0xD7, // NOP
    ];
    let result = Disassembler::new(Architecture::PCode).run(&code).unwrap();
    let instructions = result.instructions();

    assert_eq!(result.format(&instructions[0]), "FJP L0004");
    assert_eq!(instructions[0].operand_address(), Some(0x0004));
    assert_eq!(result.label_at(0x0004), Some("L0004"));
}

#[test]
fn test_jump_table_slots() {
    // The backward jump at offset 0 indexes the jump table at
    // length - 10 + 8 = offset 6; that slot holds 6, so the jump
    // lands at 6 - 6 = $0000.
    let code = [
        0xB9, 0xF6, // UJP
        0xD7, // NOP
        0xD7, // NOP
        0xD7, // NOP
        0xD7, // NOP
        0x06, 0x00, // J/T -> $0000
    ];
    let result = Disassembler::new(Architecture::PCode).run(&code).unwrap();
    let mnemonics: Vec<&str> = result.instructions().iter().map(|i| i.mnemonic()).collect();
    assert_eq!(mnemonics, vec!["UJP", "NOP", "NOP", "NOP", "NOP", "J/T"]);

    let slot = &result.instructions()[5];
    assert_eq!(slot.address(), 0x0006);
    assert_eq!(slot.operand_address(), Some(0x0000));
    assert_eq!(result.format(slot), "J/T L0000");
}

#[test]
fn test_case_jump() {
    let code = [
        0xAC, // XJP
        0x00, // pad
        0x01, 0x00, // min 1
        0x03, 0x00, // max 3
        0xB9, 0x06, // UJP past the table
        0x08, 0x00, // case 1
        0x06, 0x00, // case 2
        0x04, 0x00, // case 3
        0xD6, // XIT
    ];
    let instructions = decode(&code, 0, Architecture::PCode);
    assert_eq!(instructions.len(), 2);

    let xjp = &instructions[0];
    assert_eq!(xjp.code().len(), 14);
    assert_eq!(
        format_instruction(xjp, None),
        "XJP Range 1..3,UJP $000E,$0000,$0004,$0008"
    );
    assert_eq!(instructions[1].mnemonic(), "XIT");
    assert_eq!(instructions[1].address(), 0x000E);
}

#[test]
fn test_literals() {
    let code = [
        0xA6, 0x03, b'A', b'B', b'C', // LSA 'ABC'
        0xB3, 0x01, 0x00, 0x39, 0x30, // LDC 1, pad, 12345
        0xC7, 0xFF, 0xFF, // LDCI 65535
    ];
    let instructions = decode(&code, 0, Architecture::PCode);
    let text: Vec<String> = instructions
        .iter()
        .map(|i| format_instruction(i, None))
        .collect();
    assert_eq!(text, vec!["LSA 'ABC'", "LDC 1,12345", "LDCI 65535"]);
}

#[test]
fn test_most_negative_offset_sets_jump_table() {
    // -12 puts the jump table at 16 - 12 + 8 = offset 12. The later -2
    // must not move it back out to offset 22.
    let code = [
        0xA1, 0xF4, // FJP via slot 12
        0xA1, 0xFE, // FJP via offset 22, past the end
        0xD7, 0xD7, 0xD7, 0xD7, // NOP x4
        0xD7, 0xD7, 0xD7, 0xD7, // NOP x4
        0x0C, 0x00, // J/T -> $0000
        0x04, 0x00, // J/T -> $000A
    ];
    let mut cursor = Cursor::new(code.to_vec(), 0);
    let instructions = PCode::new().decode(&mut cursor);
    assert_eq!(cursor.mark(), -12);

    let mnemonics: Vec<&str> = instructions.iter().map(|i| i.mnemonic()).collect();
    let mut expected = vec!["FJP", "FJP"];
    expected.extend(["NOP"; 8]);
    expected.extend(["J/T", "J/T"]);
    assert_eq!(mnemonics, expected);

    assert_eq!(instructions[0].operand_address(), Some(0x0000));
    assert_eq!(instructions[1].operand_address(), Some(0x0016));
    assert_eq!(instructions[10].address(), 0x000C);
    assert_eq!(instructions[10].operand_address(), Some(0x0000));
    assert_eq!(instructions[11].address(), 0x000E);
    assert_eq!(instructions[11].operand_address(), Some(0x000A));
}
