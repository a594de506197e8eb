//! # Printer Command Sets
//!
//! Every byte sequence the framer emits comes from a [`CommandSet`]. Printer
//! families differ mostly in how they accept raster data, so the table is
//! plain data: adding a model means adding a table, not code.
//!
//! ## Built-in Tables
//!
//! | Table | Raster command | Alignment | Cut |
//! |-------|----------------|-----------|-----|
//! | [`CommandSet::escpos`] | `GS v 0 m xL xH yL yH` | `ESC a n` | `GS V 0` |
//! | [`CommandSet::star`] | `ESC GS S m xL xH yL yH n` | `ESC GS a n` | `ESC d 2` |
//! | [`CommandSet::star_line`] | `ESC * r A`, `b nL nH` per line, `ESC * r B` | `ESC GS a n` | `ESC d 2` |
//!
//! ## JSON Form
//!
//! ```json
//! {
//!   "initialize": [27, 64],
//!   "align_left": [27, 97, 0],
//!   "align_center": [27, 97, 1],
//!   "align_right": [27, 97, 2],
//!   "raster": { "type": "block", "opcode": [29, 118, 48], "trailer": [], "max_rows": 256 },
//!   "density": 0,
//!   "line_feed": [10],
//!   "cut": [29, 86, 0],
//!   "end": [27, 64]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::commands::{ESC, GS, LF, init};

/// Default maximum rows per raster block.
///
/// Large blocks overflow receive buffers on slow links, so tall images are
/// sent as consecutive blocks of at most this many rows.
pub const DEFAULT_MAX_ROWS: u16 = 256;

fn default_max_rows() -> u16 {
    DEFAULT_MAX_ROWS
}

/// How raster lines are wrapped in commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RasterFormat {
    /// One command per run of rows:
    /// `opcode, density, xL, xH, yL, yH, trailer…, data…`
    Block {
        opcode: Vec<u8>,
        #[serde(default)]
        trailer: Vec<u8>,
        #[serde(default = "default_max_rows")]
        max_rows: u16,
    },
    /// Raster mode entered once, then one command per row:
    /// `enter…, (opcode, nL, nH, data…)*, exit…`
    Line {
        enter: Vec<u8>,
        opcode: Vec<u8>,
        exit: Vec<u8>,
    },
}

/// Opcode table for one printer family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSet {
    pub initialize: Vec<u8>,
    pub align_left: Vec<u8>,
    pub align_center: Vec<u8>,
    pub align_right: Vec<u8>,
    pub raster: RasterFormat,
    /// Density mode selector placed in the raster header
    #[serde(default)]
    pub density: u8,
    pub line_feed: Vec<u8>,
    pub cut: Vec<u8>,
    pub end: Vec<u8>,
}

impl CommandSet {
    /// Generic ESC/POS printers (Epson TM series and most 58/80mm clones).
    ///
    /// Raster via `GS v 0` with `m = 0` (normal density).
    pub fn escpos() -> Self {
        Self {
            initialize: init(),
            align_left: vec![ESC, b'a', 0],
            align_center: vec![ESC, b'a', 1],
            align_right: vec![ESC, b'a', 2],
            raster: RasterFormat::Block {
                opcode: vec![GS, b'v', b'0'],
                trailer: Vec::new(),
                max_rows: DEFAULT_MAX_ROWS,
            },
            density: 0,
            line_feed: vec![LF],
            cut: vec![GS, b'V', 0],
            end: init(),
        }
    }

    /// Star Micronics StarPRNT printers, raster via `ESC GS S`.
    ///
    /// `m = 1` selects monochrome, the trailing `n = 0` selects black.
    pub fn star() -> Self {
        Self {
            initialize: init(),
            align_left: vec![ESC, GS, b'a', 0],
            align_center: vec![ESC, GS, b'a', 1],
            align_right: vec![ESC, GS, b'a', 2],
            raster: RasterFormat::Block {
                opcode: vec![ESC, GS, b'S'],
                trailer: vec![0],
                max_rows: DEFAULT_MAX_ROWS,
            },
            density: 1,
            line_feed: vec![LF],
            cut: vec![ESC, b'd', 2],
            end: init(),
        }
    }

    /// Star printers in line raster mode (`ESC * r A` … `ESC * r B`).
    ///
    /// Older Star firmware only understands this form.
    pub fn star_line() -> Self {
        Self {
            raster: RasterFormat::Line {
                enter: vec![ESC, b'*', b'r', b'A'],
                opcode: vec![b'b'],
                exit: vec![ESC, b'*', b'r', b'B'],
            },
            ..Self::star()
        }
    }

    /// Alignment sequence for `align`.
    pub fn align(&self, align: Alignment) -> &[u8] {
        match align {
            Alignment::Left => &self.align_left,
            Alignment::Center => &self.align_center,
            Alignment::Right => &self.align_right,
        }
    }
}

/// Horizontal placement of the image on the paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl std::str::FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!(
                "Unknown alignment '{}'. Use left, center or right",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escpos_raster_opcode() {
        let cs = CommandSet::escpos();
        match cs.raster {
            RasterFormat::Block { opcode, trailer, .. } => {
                assert_eq!(opcode, vec![0x1D, 0x76, 0x30]);
                assert!(trailer.is_empty());
            }
            RasterFormat::Line { .. } => panic!("ESC/POS uses block raster"),
        }
    }

    #[test]
    fn test_star_alignment() {
        let cs = CommandSet::star();
        assert_eq!(cs.align(Alignment::Center), &[0x1B, 0x1D, 0x61, 1]);
        assert_eq!(cs.align(Alignment::Right), &[0x1B, 0x1D, 0x61, 2]);
    }

    #[test]
    fn test_star_line_keeps_star_envelope() {
        let line = CommandSet::star_line();
        let block = CommandSet::star();
        assert_eq!(line.initialize, block.initialize);
        assert_eq!(line.cut, block.cut);
        assert_ne!(line.raster, block.raster);
    }

    #[test]
    fn test_json_round_trip() {
        let cs = CommandSet::star_line();
        let json = serde_json::to_string(&cs).unwrap();
        let back: CommandSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cs);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "initialize": [27, 64],
            "align_left": [27, 97, 0],
            "align_center": [27, 97, 1],
            "align_right": [27, 97, 2],
            "raster": { "type": "block", "opcode": [29, 118, 48] },
            "line_feed": [10],
            "cut": [29, 86, 0],
            "end": [27, 64]
        }"#;
        let cs: CommandSet = serde_json::from_str(json).unwrap();
        assert_eq!(cs.density, 0);
        assert_eq!(cs, CommandSet::escpos());
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!("Center".parse::<Alignment>(), Ok(Alignment::Center));
        assert_eq!("right".parse::<Alignment>(), Ok(Alignment::Right));
        assert!("middle".parse::<Alignment>().is_err());
    }
}
