//! WASM API for the disassembler.
//!
//! Provides JavaScript-callable disassembly with optional label groups.

use crate::disassembler::formatter::{format_bytes, format_operands};
use crate::{Architecture, DisassembleError, Disassembler, LabelLibrary};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<DisassembleError> for JsError {
    fn from(err: DisassembleError) -> Self {
        JsError::new(&err.to_string())
    }
}

/// One row of disassembly output
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u16,
    bytes: Vec<u8>,
    hex: String,
    label: Option<String>,
    mnemonic: String,
    operand: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u16 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Bytes as a hex dump, e.g. `4C 00 03`
    #[wasm_bindgen(getter)]
    pub fn hex(&self) -> String {
        self.hex.clone()
    }

    /// Label defined at this line's address
    #[wasm_bindgen(getter)]
    pub fn label(&self) -> Option<String> {
        self.label.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mnemonic(&self) -> String {
        self.mnemonic.clone()
    }

    /// Operands with labels substituted
    #[wasm_bindgen(getter)]
    pub fn operand(&self) -> String {
        self.operand.clone()
    }
}

/// Disassembler holding a label library across calls
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct WasmDisassembler {
    library: LabelLibrary,
}

#[wasm_bindgen]
impl WasmDisassembler {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named address (`$FDED`, `0xFDED` or decimal) to a label group
    pub fn add_label(&mut self, group: &str, name: &str, address: &str) -> Result<(), JsError> {
        self.library.insert_parsed(group, name, address)?;
        Ok(())
    }

    /// Disassemble `bytes` loaded at `start_addr`
    pub fn disassemble(
        &self,
        bytes: &[u8],
        start_addr: u16,
        architecture: &str,
    ) -> Result<js_sys::Array, JsError> {
        let architecture: Architecture = architecture.parse()?;
        let disassembler = Disassembler::new(architecture)
            .start_address(start_addr)
            .library(&self.library);
        lines(&disassembler, bytes)
    }
}

/// Disassemble `bytes` loaded at `start_addr` without a label library
#[wasm_bindgen]
pub fn disassemble(
    bytes: &[u8],
    start_addr: u16,
    architecture: &str,
) -> Result<js_sys::Array, JsError> {
    let architecture: Architecture = architecture.parse()?;
    lines(&Disassembler::new(architecture).start_address(start_addr), bytes)
}

/// Names accepted by `disassemble`
#[wasm_bindgen]
pub fn architectures() -> js_sys::Array {
    Architecture::ALL
        .iter()
        .map(|arch| JsValue::from_str(arch.name()))
        .collect()
}

fn lines(disassembler: &Disassembler, bytes: &[u8]) -> Result<js_sys::Array, JsError> {
    let result = disassembler.run(bytes)?;
    let labels = result.labels();

    Ok(result
        .instructions()
        .iter()
        .map(|instr| {
            let line = DisassemblyLine {
                address: instr.address(),
                bytes: instr.code().to_vec(),
                hex: format_bytes(instr.code()),
                label: result.label_at(instr.address()).map(str::to_string),
                mnemonic: instr.mnemonic().to_string(),
                operand: format_operands(instr, Some(labels)),
            };
            JsValue::from(line)
        })
        .collect())
}
