//! WebAssembly bindings for the disassembler.
//!
//! This module provides JavaScript-callable disassembly, enabling
//! browser-based viewing of retro machine code.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::{disassemble, DisassemblyLine, WasmDisassembler};
