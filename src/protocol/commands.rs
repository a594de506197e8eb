//! # Control Bytes
//!
//! Shared control characters for ESC/POS and StarPRNT command sequences.
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// - ESC/POS: `GS v 0` raster images, `GS V` cutter
/// - StarPRNT: `ESC GS` prefix for graphics and alignment
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Both ESC/POS and
/// StarPRNT use the same sequence.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// Encode a 16-bit value as `[low, high]`.
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}
