//! # Instruction Model
//!
//! Decoders produce [`Instruction`] values through an [`InstructionBuilder`].
//! Once built an instruction is immutable; labels are applied at display time
//! by looking up an operand's resolved address in a
//! [`LabelMap`](crate::disassembler::labels::LabelMap).

use crate::disassembler::labels::LabelMap;

/// Substitution slot used in operand display templates.
pub const SLOT: &str = "{}";

/// A single decoded operand.
///
/// The display template contains one `{}` slot. The slot is filled with
/// `value` unless the operand carries an address that has a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    template: String,
    value: String,
    address: Option<u16>,
}

impl Operand {
    /// Display template, e.g. `"({})"`.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Literal text, e.g. `"$0300"`.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Resolved absolute address, present only for address-bearing operands.
    pub fn address(&self) -> Option<u16> {
        self.address
    }

    /// Render with the literal value.
    pub fn format(&self) -> String {
        self.template.replacen(SLOT, &self.value, 1)
    }

    /// Render with a label substituted when one exists for this operand's address.
    pub fn format_with(&self, labels: &LabelMap) -> String {
        match self.address.and_then(|addr| labels.get(addr)) {
            Some(label) => self.template.replacen(SLOT, label, 1),
            None => self.format(),
        }
    }
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    address: u16,
    code: Vec<u8>,
    mnemonic: String,
    operands: Vec<Operand>,
}

impl Instruction {
    /// Start building an instruction located at `address`.
    pub fn at(address: u16) -> InstructionBuilder {
        InstructionBuilder {
            address,
            code: Vec::new(),
            mnemonic: String::new(),
            operands: Vec::new(),
        }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// Bytes consumed by this instruction. Empty for directives.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// The first address-bearing operand, used for label propagation.
    pub fn address_ref(&self) -> Option<&Operand> {
        self.operands.iter().find(|op| op.address.is_some())
    }

    /// Resolved address of the first address-bearing operand.
    pub fn operand_address(&self) -> Option<u16> {
        self.address_ref().and_then(Operand::address)
    }
}

/// Incremental builder for [`Instruction`].
///
/// # Examples
///
/// ```
/// use retrodis::Instruction;
///
/// let instr = Instruction::at(0x0300)
///     .mnemonic("LDA")
///     .code(vec![0xBD, 0x00, 0x20])
///     .op_address("{}", format!("${:04X}", 0x2000), 0x2000)
///     .op_value("X")
///     .build();
///
/// assert_eq!(instr.operand_address(), Some(0x2000));
/// assert_eq!(instr.operands()[0].format(), "$2000");
/// ```
#[derive(Debug, Clone)]
pub struct InstructionBuilder {
    address: u16,
    code: Vec<u8>,
    mnemonic: String,
    operands: Vec<Operand>,
}

impl InstructionBuilder {
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.mnemonic = mnemonic.into();
        self
    }

    /// Replace the mnemonic in place; used when an operand byte renames the opcode.
    pub fn set_mnemonic(&mut self, mnemonic: impl Into<String>) {
        self.mnemonic = mnemonic.into();
    }

    pub fn code(mut self, code: Vec<u8>) -> Self {
        self.code = code;
        self
    }

    pub fn set_code(&mut self, code: Vec<u8>) {
        self.code = code;
    }

    /// Add an operand that is plain text.
    pub fn op_value(mut self, value: impl Into<String>) -> Self {
        self.push_value(value);
        self
    }

    pub fn push_value(&mut self, value: impl Into<String>) {
        self.operands.push(Operand {
            template: SLOT.to_string(),
            value: value.into(),
            address: None,
        });
    }

    /// Add an address-bearing operand.
    ///
    /// `template` holds a `{}` slot for either `literal` or a label.
    pub fn op_address(mut self, template: impl Into<String>, literal: impl Into<String>, address: u16) -> Self {
        self.push_address(template, literal, address);
        self
    }

    pub fn push_address(&mut self, template: impl Into<String>, literal: impl Into<String>, address: u16) {
        self.operands.push(Operand {
            template: template.into(),
            value: literal.into(),
            address: Some(address),
        });
    }

    /// Finalize into an immutable instruction.
    pub fn build(self) -> Instruction {
        Instruction {
            address: self.address,
            code: self.code,
            mnemonic: self.mnemonic,
            operands: self.operands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_label() {
        let instr = Instruction::at(0x300)
            .mnemonic("JMP")
            .op_address("({})", "$03F0", 0x03F0)
            .build();
        assert_eq!(instr.operands()[0].format(), "($03F0)");
    }

    #[test]
    fn test_format_with_label() {
        let mut labels = LabelMap::new();
        labels.insert_if_absent(0x03F0, "VECTOR");
        let instr = Instruction::at(0x300)
            .mnemonic("JMP")
            .op_address("({})", "$03F0", 0x03F0)
            .build();
        assert_eq!(instr.operands()[0].format_with(&labels), "(VECTOR)");
    }

    #[test]
    fn test_value_operand_never_labelled() {
        let mut labels = LabelMap::new();
        labels.insert_if_absent(0x0042, "ZP42");
        let instr = Instruction::at(0).mnemonic("LDA").op_value("#$42").build();
        assert_eq!(instr.operands()[0].address(), None);
        assert_eq!(instr.operands()[0].format_with(&labels), "#$42");
    }

    #[test]
    fn test_address_ref_is_first_address_operand() {
        let instr = Instruction::at(0)
            .mnemonic("XJP")
            .op_value("Range 0..1")
            .op_address("{}", "$0010", 0x10)
            .op_address("{}", "$0020", 0x20)
            .build();
        assert_eq!(instr.operand_address(), Some(0x10));
    }
}
