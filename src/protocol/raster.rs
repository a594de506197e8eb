//! # Raster Encoding
//!
//! Packs a 1-bit [`Bitmap`] into printer raster lines.
//!
//! ## Bit Packing
//!
//! Each byte holds 8 horizontal dots:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```
//!
//! ## Width Calculation
//!
//! ```text
//! bytes_per_line = ceil(width_dots / 8)
//!
//! 576 dots → 72 bytes
//! 9 dots   → 2 bytes (last byte: 1 used bit, 7 padding bits left at 0)
//! ```
//!
//! Padding bits are always white. Printers treat stray set bits as dots.
//!
//! ## Header
//!
//! ```text
//! ┌─────────┬──────┬──────┐
//! │ density │  nL  │  nH  │   bytes_per_line = nL + nH × 256
//! └─────────┴──────┴──────┘
//! ```

use super::commands::u16_le;
use crate::error::PrintyError;
use crate::render::Bitmap;

/// Raster header: density selector plus line geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterHeader {
    /// Density mode selector byte (printer-specific meaning)
    pub density: u8,
    /// Bytes in every raster line
    pub bytes_per_line: u16,
    /// Number of raster lines
    pub rows: usize,
}

impl RasterHeader {
    /// `[density, bytes_per_line low, bytes_per_line high]`
    pub fn to_bytes(&self) -> [u8; 3] {
        let [lo, hi] = u16_le(self.bytes_per_line);
        [self.density, lo, hi]
    }
}

/// An encoded image: header plus one packed line per bitmap row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub header: RasterHeader,
    pub lines: Vec<Vec<u8>>,
    width_dots: usize,
    height_dots: usize,
}

impl Raster {
    /// Width of the source bitmap in dots.
    #[inline]
    pub fn width_dots(&self) -> usize {
        self.width_dots
    }

    /// Height of the source bitmap in dots.
    ///
    /// Differs from `lines.len()` only for zero-width bitmaps, which encode
    /// to no lines at all.
    #[inline]
    pub fn height_dots(&self) -> usize {
        self.height_dots
    }

    /// All lines concatenated in row order.
    pub fn data(&self) -> Vec<u8> {
        self.lines.concat()
    }

    /// Unpack the lines back into a bitmap.
    pub fn to_bitmap(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width_dots, self.height_dots);
        for (y, line) in self.lines.iter().take(self.height_dots).enumerate() {
            for (x, black) in unpack_row(line, self.width_dots).into_iter().enumerate() {
                bitmap.set(x, y, black);
            }
        }
        bitmap
    }
}

/// Pack a row of boolean values into bytes, MSB first.
///
/// ```
/// use printy::protocol::raster::pack_row;
///
/// // 8 pixels pack into 1 byte
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]); // 11110000
///
/// // 12 pixels pack into 2 bytes (4 bits padding)
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]); // 11111111 11110000
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

/// Inverse of [`pack_row`]: read `width` dots from packed bytes.
pub fn unpack_row(bytes: &[u8], width: usize) -> Vec<bool> {
    (0..width)
        .map(|x| (bytes[x / 8] >> (7 - (x % 8))) & 1 == 1)
        .collect()
}

/// Encode a bitmap into raster lines.
///
/// Rows are emitted top to bottom, one line per row. Fails only when a line
/// would exceed the 16-bit `bytes_per_line` field.
pub fn encode(bitmap: &Bitmap, density: u8) -> Result<Raster, PrintyError> {
    // An empty image has no lines, so there is no line geometry to declare
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Ok(Raster {
            header: RasterHeader {
                density,
                bytes_per_line: 0,
                rows: 0,
            },
            lines: Vec::new(),
            width_dots: bitmap.width(),
            height_dots: bitmap.height(),
        });
    }

    let width_bytes = bitmap.width().div_ceil(8);
    let bytes_per_line = u16::try_from(width_bytes).map_err(|_| {
        PrintyError::Encode(format!(
            "{} dots need {} bytes per line, limit is {}",
            bitmap.width(),
            width_bytes,
            u16::MAX
        ))
    })?;

    let lines: Vec<Vec<u8>> = bitmap.rows().map(pack_row).collect();

    Ok(Raster {
        header: RasterHeader {
            density,
            bytes_per_line,
            rows: lines.len(),
        },
        lines,
        width_dots: bitmap.width(),
        height_dots: bitmap.height(),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_byte() {
        let bitmap =
            Bitmap::from_rows(&[[true, false, true, false, true, false, true, false]]).unwrap();
        let raster = encode(&bitmap, 0).unwrap();

        assert_eq!(raster.header.bytes_per_line, 1);
        assert_eq!(raster.lines, vec![vec![0xAA]]);
    }

    #[test]
    fn test_nine_dots_padding() {
        let bitmap = Bitmap::from_rows(&[[true; 9]]).unwrap();
        let raster = encode(&bitmap, 0).unwrap();

        assert_eq!(raster.header.bytes_per_line, 2);
        assert_eq!(raster.lines, vec![vec![0xFF, 0x80]]);
    }

    #[test]
    fn test_header_bytes_little_endian() {
        let bitmap = Bitmap::new(576, 1);
        let raster = encode(&bitmap, 1).unwrap();
        assert_eq!(raster.header.to_bytes(), [1, 72, 0]);

        let bitmap = Bitmap::new(8 * 300, 1);
        let raster = encode(&bitmap, 0).unwrap();
        // 300 = 0x012C
        assert_eq!(raster.header.to_bytes(), [0, 0x2C, 0x01]);
    }

    #[test]
    fn test_every_line_matches_header() {
        for width in [1, 7, 8, 9, 15, 16, 17, 383, 384, 577] {
            let mut bitmap = Bitmap::new(width, 5);
            for y in 0..5 {
                for x in (y..width).step_by(3) {
                    bitmap.set(x, y, true);
                }
            }
            let raster = encode(&bitmap, 0).unwrap();
            assert_eq!(raster.header.bytes_per_line as usize, width.div_ceil(8));
            assert_eq!(raster.lines.len(), 5);
            for line in &raster.lines {
                assert_eq!(line.len(), raster.header.bytes_per_line as usize);
            }
        }
    }

    #[test]
    fn test_round_trip() {
        let mut bitmap = Bitmap::new(21, 13);
        for y in 0..13 {
            for x in 0..21 {
                bitmap.set(x, y, (x * 7 + y * 3) % 5 < 2);
            }
        }
        let raster = encode(&bitmap, 0).unwrap();
        assert_eq!(raster.to_bitmap(), bitmap);
    }

    #[test]
    fn test_rows_keep_order() {
        let bitmap = Bitmap::from_rows(&[
            [true, false, false, false, false, false, false, false],
            [false, true, false, false, false, false, false, false],
            [false, false, true, false, false, false, false, false],
        ])
        .unwrap();
        let raster = encode(&bitmap, 0).unwrap();
        assert_eq!(raster.data(), vec![0x80, 0x40, 0x20]);
    }

    #[test]
    fn test_empty_bitmaps() {
        let raster = encode(&Bitmap::new(0, 0), 0).unwrap();
        assert_eq!(raster.header.bytes_per_line, 0);
        assert!(raster.lines.is_empty());

        let raster = encode(&Bitmap::new(16, 0), 0).unwrap();
        assert_eq!(raster.header.bytes_per_line, 0);
        assert!(raster.lines.is_empty());

        let raster = encode(&Bitmap::new(0, 2), 0).unwrap();
        assert_eq!(raster.header.bytes_per_line, 0);
        assert_eq!(raster.header.rows, 0);
        assert!(raster.lines.is_empty());
    }

    #[test]
    fn test_empty_bitmaps_keep_dimensions() {
        for (width, height) in [(0, 0), (0, 5), (12, 0)] {
            let bitmap = Bitmap::new(width, height);
            let raster = encode(&bitmap, 0).unwrap();
            assert_eq!(raster.height_dots(), height);
            assert_eq!(raster.to_bitmap(), bitmap);
        }
    }

    #[test]
    fn test_too_wide_is_encode_error() {
        let bitmap = Bitmap::new(8 * (u16::MAX as usize + 1), 1);
        assert!(matches!(encode(&bitmap, 0), Err(PrintyError::Encode(_))));
    }
}
