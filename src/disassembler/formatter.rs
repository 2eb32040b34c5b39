//! Formatting functions for disassembled instructions

use crate::disassembler::labels::LabelMap;
use crate::instruction::Instruction;

/// Format a single instruction as assembly text
///
/// Operands are joined with commas. When `labels` is given, address-bearing
/// operands show their label instead of the numeric address.
pub fn format_instruction(instr: &Instruction, labels: Option<&LabelMap>) -> String {
    let operands = format_operands(instr, labels);

    if operands.is_empty() {
        instr.mnemonic().to_string()
    } else {
        format!("{} {}", instr.mnemonic(), operands)
    }
}

/// Format the operand list alone
pub fn format_operands(instr: &Instruction, labels: Option<&LabelMap>) -> String {
    instr
        .operands()
        .iter()
        .map(|op| match labels {
            Some(labels) => op.format_with(labels),
            None => op.format(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Hex dump of an instruction's bytes, e.g. `4C 00 03`
pub fn format_bytes(code: &[u8]) -> String {
    code.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
