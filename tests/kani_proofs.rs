//! Kani formal verification proofs for the decoders.
//!
//! These proofs use bounded model checking to verify decoding invariants
//! hold for ALL possible inputs.
//!
//! To run these proofs, install Kani and run:
//! ```
//! cargo kani --tests
//! ```
//!
//! Note: Kani proofs are conditional on the `kani` cfg.
//! They will be ignored when running regular tests.

// Allow the `kani` cfg which is set by the Kani verifier
#![allow(unexpected_cfgs)]

// Only compile these tests when kani is available
#[cfg(kani)]
mod kani_proofs {
    use retrodis::decoders::mos6502::relative_target;
    use retrodis::decoders::pcode::big_value;
    use retrodis::decoders::sweet16;
    use retrodis::opcodes::{MOS6502, MOS6502_ILLEGAL, WDC65C02};
    use retrodis::Cursor;

    // ========== Branch Proofs ==========

    /// Proof: branch targets equal (A + 2 + D) mod 65536 and never panic
    #[kani::proof]
    fn proof_relative_target_wraps() {
        let address: u16 = kani::any();
        let displacement: i8 = kani::any();

        let expected = (address as i32 + 2 + displacement as i32).rem_euclid(0x10000) as u16;

        kani::assert(
            relative_target(address, displacement) == expected,
            "Branch target must wrap within 16 bits",
        );
    }

    // ========== Table Proofs ==========

    /// Proof: every 6502-family opcode has a length of 1 to 3 bytes
    #[kani::proof]
    fn proof_6502_lengths_bounded() {
        let opcode: u8 = kani::any();

        for table in [&MOS6502, &MOS6502_ILLEGAL, &WDC65C02] {
            let metadata = table.lookup(opcode);
            kani::assert(
                metadata.size_bytes >= 1 && metadata.size_bytes <= 3,
                "Instruction length must be 1-3 bytes",
            );
        }
    }

    /// Proof: every SWEET16 opcode has a mnemonic and a length of 1 to 3 bytes
    #[kani::proof]
    fn proof_sweet16_lookup_total() {
        let opcode: u8 = kani::any();
        let (mnemonic, mode) = sweet16::lookup(opcode);

        kani::assert(!mnemonic.is_empty(), "Mnemonic must not be empty");
        let length = mode.instruction_length();
        kani::assert(length >= 1 && length <= 3, "Length must be 1-3 bytes");
    }

    // ========== p-code Proofs ==========

    /// Proof: big parameters stay within 0..=32767 and use 1 or 2 bytes
    #[kani::proof]
    fn proof_big_value_range() {
        let first: u8 = kani::any();
        let second: u8 = kani::any();
        let (value, size) = big_value(first, second);

        kani::assert(value <= 32767, "Big value must fit in 15 bits");
        kani::assert(
            (first <= 127 && size == 1 && value == first as u16) || (first > 127 && size == 2),
            "One byte below 128, two bytes otherwise",
        );
    }

    // ========== Cursor Proofs ==========

    /// Proof: the cursor address wraps and reads past the end return zero
    #[kani::proof]
    fn proof_cursor_wraps_and_pads() {
        let base: u16 = kani::any();
        let byte: u8 = kani::any();
        let mut cursor = Cursor::new(vec![byte], base);

        kani::assert(cursor.peek_unsigned_byte(1) == 0, "Peek past the end reads zero");

        let code = cursor.read(2);
        kani::assert(code.len() == 2 && code[1] == 0, "Read past the end pads with zero");
        kani::assert(
            cursor.current_address() == base.wrapping_add(2),
            "Address must wrap within 16 bits",
        );
        kani::assert(!cursor.has_more(), "Cursor must be exhausted");
    }
}
