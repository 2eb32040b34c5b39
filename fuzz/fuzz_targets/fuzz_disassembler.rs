//! Fuzz target for the disassembler.
//!
//! This target feeds arbitrary byte sequences to every architecture
//! to find edge cases and crashes in instruction decoding.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use retrodis::{Architecture, Disassembler};

/// Disassembly options for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzOptions {
    start_address: u16,
    architecture: u8,
    bytes_to_skip: u8,
    bytes_to_decode: u16,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    bytes: Vec<u8>,
    options: FuzzOptions,
}

fuzz_target!(|input: FuzzInput| {
    // Limit input size to prevent OOM
    if input.bytes.len() > 65536 {
        return;
    }

    let architecture =
        Architecture::ALL[input.options.architecture as usize % Architecture::ALL.len()];
    let skip = (input.options.bytes_to_skip as usize).min(input.bytes.len());

    let result = Disassembler::new(architecture)
        .start_address(input.options.start_address)
        .bytes_to_skip(skip)
        .bytes_to_decode(input.options.bytes_to_decode as usize)
        .run(&input.bytes)
        .expect("skip is clamped and no label groups are requested");

    let decoded = match input.options.bytes_to_decode as usize {
        0 => input.bytes.len(),
        n => (skip + n).min(input.bytes.len()),
    };

    // Verify invariants
    let mut total_size: usize = 0;
    let mut expected_address = input.options.start_address;

    for instr in result.instructions() {
        // Each instruction should start where the previous one ended
        assert_eq!(instr.address(), expected_address);

        // Only directives are empty, and nothing starts past the end
        if !instr.code().is_empty() {
            assert!(total_size < decoded);
        }

        total_size += instr.code().len();
        expected_address = expected_address.wrapping_add(instr.code().len() as u16);
    }

    // Truncated final instructions read zeros, so they may run long
    assert!(total_size >= decoded);
});
