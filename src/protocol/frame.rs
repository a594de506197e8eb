//! # Print Job Framing
//!
//! Wraps encoded raster lines in the control sequences of a [`CommandSet`],
//! producing one self-terminating [`PrintJob`].
//!
//! ## Job Layout
//!
//! ```text
//! ┌────────────┬───────────┬──────────────────────┬────────────┬─────┬─────┐
//! │ initialize │ alignment │ raster cmd + lines … │ line feeds │ cut │ end │
//! └────────────┴───────────┴──────────────────────┴────────────┴─────┴─────┘
//!                (≠ left)                             (n ≥ 0)   (opt)
//! ```
//!
//! The framer never looks at pixel values. It only checks that the lines
//! agree with the header before concatenating them.
//!
//! ## Example
//!
//! ```
//! use printy::protocol::{frame, raster, CommandSet, FrameOptions};
//! use printy::render::Bitmap;
//!
//! let bitmap = Bitmap::from_rows(&[[true; 8]]).unwrap();
//! let raster = raster::encode(&bitmap, 0).unwrap();
//! let job = frame::frame(&CommandSet::escpos(), &raster, &FrameOptions::default()).unwrap();
//!
//! assert!(job.as_bytes().starts_with(&[0x1B, 0x40]));
//! assert!(job.as_bytes().ends_with(&[0x1B, 0x40]));
//! ```

use std::fs;
use std::path::Path;

use super::command_set::{Alignment, CommandSet, RasterFormat};
use super::commands::u16_le;
use super::raster::Raster;
use crate::error::PrintyError;

/// Options for [`frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    pub align: Alignment,
    /// Line feeds after the image, before the cut
    pub feed_lines: u16,
    pub cut_after: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            align: Alignment::Left,
            feed_lines: 3,
            cut_after: true,
        }
    }
}

/// A complete, immutable job buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob(Vec<u8>);

impl PrintJob {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Write the raw job bytes to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PrintyError> {
        fs::write(path, &self.0)?;
        Ok(())
    }
}

impl AsRef<[u8]> for PrintJob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Check that the lines agree with the header.
fn validate(raster: &Raster) -> Result<(), PrintyError> {
    if raster.lines.len() != raster.header.rows {
        return Err(PrintyError::Encode(format!(
            "header declares {} rows but {} lines were encoded",
            raster.header.rows,
            raster.lines.len()
        )));
    }

    let expected = raster.header.bytes_per_line as usize;
    if let Some((row, line)) = raster
        .lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.len() != expected)
    {
        return Err(PrintyError::Encode(format!(
            "line {} is {} bytes, header declares {}",
            row,
            line.len(),
            expected
        )));
    }

    Ok(())
}

/// Append the raster command(s) and line data.
fn push_raster(out: &mut Vec<u8>, format: &RasterFormat, raster: &Raster) {
    if raster.lines.is_empty() {
        return;
    }

    let header = raster.header.to_bytes();

    match format {
        RasterFormat::Block {
            opcode,
            trailer,
            max_rows,
        } => {
            let max_rows = if *max_rows == 0 { u16::MAX } else { *max_rows };
            for chunk in raster.lines.chunks(max_rows as usize) {
                out.extend_from_slice(opcode);
                out.extend_from_slice(&header);
                // chunk.len() <= max_rows, which fits in u16
                out.extend_from_slice(&u16_le(chunk.len() as u16));
                out.extend_from_slice(trailer);
                for line in chunk {
                    out.extend_from_slice(line);
                }
            }
        }
        RasterFormat::Line {
            enter,
            opcode,
            exit,
        } => {
            out.extend_from_slice(enter);
            for line in &raster.lines {
                // Line commands carry the width only, no density selector
                out.extend_from_slice(opcode);
                out.extend_from_slice(&header[1..]);
                out.extend_from_slice(line);
            }
            out.extend_from_slice(exit);
        }
    }
}

/// Build a print job from encoded raster lines.
///
/// Fails with [`PrintyError::Encode`] if a line length disagrees with the
/// header; such a job would garble every following row on the printer.
pub fn frame(
    commands: &CommandSet,
    raster: &Raster,
    options: &FrameOptions,
) -> Result<PrintJob, PrintyError> {
    validate(raster)?;

    let data_len = raster.header.rows * raster.header.bytes_per_line as usize;
    let mut out = Vec::with_capacity(data_len + 64);

    out.extend_from_slice(&commands.initialize);

    if options.align != Alignment::Left {
        out.extend_from_slice(commands.align(options.align));
    }

    push_raster(&mut out, &commands.raster, raster);

    for _ in 0..options.feed_lines {
        out.extend_from_slice(&commands.line_feed);
    }

    if options.cut_after {
        out.extend_from_slice(&commands.cut);
    }

    out.extend_from_slice(&commands.end);

    Ok(PrintJob(out))
}

// ============================================================================
// TESTS
// ============================================================================
