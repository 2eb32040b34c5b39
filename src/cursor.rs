//! # Byte Cursor
//!
//! The cursor owns the code being disassembled and the current read position.
//! Every decoder works against a cursor rather than a raw slice so that:
//!
//! - reads past the end of a truncated image yield zero instead of faulting,
//! - the current address is always available, wrapped to 16 bits,
//! - decoders that need running context (p-code's jump table boundary) can
//!   keep it in the `mark` without any global state.

/// Size of the 16-bit address space the cursor wraps within.
const ADDRESS_SPACE: usize = 0x1_0000;

/// Read position over a code buffer loaded at a base address.
///
/// # Examples
///
/// ```
/// use retrodis::Cursor;
///
/// let mut cursor = Cursor::new(vec![0xA9, 0x42], 0xFFFF);
/// assert_eq!(cursor.current_address(), 0xFFFF);
/// assert_eq!(cursor.read(2), vec![0xA9, 0x42]);
/// assert_eq!(cursor.current_address(), 0x0001); // wraps
/// assert!(!cursor.has_more());
/// ```
#[derive(Debug, Clone)]
pub struct Cursor {
    base_address: u16,
    bytes: Vec<u8>,
    offset: usize,
    mark: i32,
}

impl Cursor {
    /// Create a cursor positioned at the first byte of `bytes`.
    pub fn new(bytes: impl Into<Vec<u8>>, base_address: u16) -> Self {
        Self {
            base_address,
            bytes: bytes.into(),
            offset: 0,
            mark: 0,
        }
    }

    /// Total number of bytes in the buffer.
    pub fn length(&self) -> usize {
        self.bytes.len()
    }

    /// True while the read position is inside the buffer.
    pub fn has_more(&self) -> bool {
        self.offset < self.bytes.len()
    }

    /// Peek an unsigned byte `n` bytes ahead of the read position.
    ///
    /// Returns 0 past the end of the buffer.
    pub fn peek_unsigned_byte(&self, n: usize) -> u8 {
        self.bytes.get(self.offset + n).copied().unwrap_or(0)
    }

    /// Peek a signed byte `n` bytes ahead of the read position.
    pub fn peek_signed_byte(&self, n: usize) -> i8 {
        self.peek_unsigned_byte(n) as i8
    }

    /// Peek a little-endian word starting `n` bytes ahead.
    pub fn peek_unsigned_short(&self, n: usize) -> u16 {
        u16::from_le_bytes([self.peek_unsigned_byte(n), self.peek_unsigned_byte(n + 1)])
    }

    /// Peek an unsigned byte at an absolute buffer offset.
    ///
    /// Offsets outside the buffer (including negative ones) read as 0.
    pub fn peek_absolute(&self, offset: i64) -> u8 {
        usize::try_from(offset)
            .ok()
            .and_then(|o| self.bytes.get(o))
            .copied()
            .unwrap_or(0)
    }

    /// Consume `n` bytes, advancing the read position by exactly `n`.
    ///
    /// Positions past the end of the buffer are filled with zero.
    pub fn read(&mut self, n: usize) -> Vec<u8> {
        let code = (0..n).map(|i| self.peek_unsigned_byte(i)).collect();
        self.offset += n;
        code
    }

    /// Offset of the read position from the start of the buffer.
    pub fn current_offset(&self) -> usize {
        self.offset
    }

    /// Address the buffer was loaded at.
    pub fn base_address(&self) -> u16 {
        self.base_address
    }

    /// Address of the read position, wrapped within the 64K address space.
    pub fn current_address(&self) -> u16 {
        ((self.base_address as usize + self.offset) % ADDRESS_SPACE) as u16
    }

    /// Auxiliary decoder context. Starts at 0.
    pub fn mark(&self) -> i32 {
        self.mark
    }

    pub fn set_mark(&mut self, mark: i32) {
        self.mark = mark;
    }
}
