//! # Printer Profiles
//!
//! A profile describes one printer model: its printable width, resolution,
//! and the [`CommandSet`] it speaks.
//!
//! ## Built-in Profiles
//!
//! | Key | Model | Width (dots) | Raster command |
//! |-----|-------|--------------|----------------|
//! | `escpos` | Generic ESC/POS 80mm | 576 | `GS v 0` |
//! | `escpos-58` | Generic ESC/POS 58mm | 384 | `GS v 0` |
//! | `tsp650ii` | Star TSP650II | 576 | `ESC GS S` |
//! | `tsp650ii-line` | Star TSP650II (line raster) | 576 | `ESC * r` / `b` |
//!
//! ## Custom Profiles
//!
//! Any other model is a JSON file:
//!
//! ```json
//! {
//!   "name": "My Printer",
//!   "width_dots": 512,
//!   "dpi": 203,
//!   "commands": { "initialize": [27, 64], "...": "see CommandSet" }
//! }
//! ```
//!
//! ## Calculations
//!
//! ```text
//! dots_per_mm = dpi / 25.4
//! width_mm = width_dots / dots_per_mm
//!
//! For 576 dots at 203 DPI:
//!   dots_per_mm = 203 / 25.4 ≈ 8
//!   width_mm = 576 / 8 = 72mm
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PrintyError;
use crate::protocol::{CommandSet, FrameOptions, PrintJob, Raster, frame, raster};
use crate::render::Bitmap;

/// Hardware description of one printer model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterProfile {
    /// Human-readable name (e.g. "Star TSP650II")
    pub name: String,

    /// Maximum print width in dots (pixels)
    pub width_dots: u16,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Opcode table
    pub commands: CommandSet,
}

impl PrinterProfile {
    /// Generic 80mm ESC/POS printer.
    pub fn escpos() -> Self {
        Self {
            name: "ESC/POS 80mm".to_string(),
            width_dots: 576,
            dpi: 203,
            commands: CommandSet::escpos(),
        }
    }

    /// Generic 58mm ESC/POS printer.
    pub fn escpos_58() -> Self {
        Self {
            name: "ESC/POS 58mm".to_string(),
            width_dots: 384,
            ..Self::escpos()
        }
    }

    /// # Star TSP650II
    ///
    /// 80mm paper, 72mm (576 dots) printable at 203 DPI.
    ///
    /// ```text
    /// ├── 4mm ──┼────── 72mm printable ──────┼── 4mm ──┤
    /// │ margin  │         576 dots           │ margin  │
    /// ```
    pub fn tsp650ii() -> Self {
        Self {
            name: "Star TSP650II".to_string(),
            width_dots: 576,
            dpi: 203,
            commands: CommandSet::star(),
        }
    }

    /// Star TSP650II using line raster mode.
    pub fn tsp650ii_line() -> Self {
        Self {
            name: "Star TSP650II (line raster)".to_string(),
            commands: CommandSet::star_line(),
            ..Self::tsp650ii()
        }
    }

    /// All built-in profiles with their lookup keys.
    pub fn built_in() -> Vec<(&'static str, Self)> {
        vec![
            ("escpos", Self::escpos()),
            ("escpos-58", Self::escpos_58()),
            ("tsp650ii", Self::tsp650ii()),
            ("tsp650ii-line", Self::tsp650ii_line()),
        ]
    }

    /// Look up a built-in profile by key or display name.
    pub fn parse(s: &str) -> Result<Self, PrintyError> {
        let wanted = s.trim().to_lowercase();
        Self::built_in()
            .into_iter()
            .find(|(key, profile)| *key == wanted || profile.name.to_lowercase() == wanted)
            .map(|(_, profile)| profile)
            .ok_or_else(|| {
                let keys: Vec<&str> = Self::built_in().iter().map(|(k, _)| *k).collect();
                PrintyError::Profile(format!(
                    "Unknown profile '{}'. Use one of {} or a .json file",
                    s,
                    keys.join(", ")
                ))
            })
    }

    /// Load a profile from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PrintyError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, PrintyError> {
        let profile: Self = serde_json::from_str(text)?;
        if profile.width_dots == 0 {
            return Err(PrintyError::Profile(format!(
                "Profile '{}' has zero width",
                profile.name
            )));
        }
        Ok(profile)
    }

    /// A built-in key/name, or a path to a JSON profile.
    pub fn load(spec: &str) -> Result<Self, PrintyError> {
        if spec.ends_with(".json") || Path::new(spec).is_file() {
            Self::from_path(spec)
        } else {
            Self::parse(spec)
        }
    }

    /// Print width in bytes per raster line.
    #[inline]
    pub fn width_bytes(&self) -> u16 {
        self.width_dots.div_ceil(8)
    }

    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    #[inline]
    pub fn width_mm(&self) -> f32 {
        self.width_dots as f32 / self.dots_per_mm()
    }

    /// Encode a bitmap with this profile's density selector.
    pub fn encode(&self, bitmap: &Bitmap) -> Result<Raster, PrintyError> {
        raster::encode(bitmap, self.commands.density)
    }

    /// Frame raster lines with this profile's opcodes.
    ///
    /// Rejects rasters wider than the print head; the printer would wrap
    /// each line onto the next and garble the image.
    pub fn frame(&self, raster: &Raster, options: &FrameOptions) -> Result<PrintJob, PrintyError> {
        if raster.width_dots() > self.width_dots as usize {
            return Err(PrintyError::Encode(format!(
                "image is {} dots wide, {} prints at most {}",
                raster.width_dots(),
                self.name,
                self.width_dots
            )));
        }
        frame(&self.commands, raster, options)
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::escpos()
    }
}

// ============================================================================
// TESTS
// ============================================================================
