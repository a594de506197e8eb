//! # Rendering Module
//!
//! Turns decoded images into 1-bit bitmaps for thermal printing.
//!
//! ## Modules
//!
//! - [`threshold`]: Luminance threshold conversion (with optional inversion)
//! - [`preview`]: PNG previews of the 1-bit result
//!
//! ## Usage Example
//!
//! ```no_run
//! use printy::render::{self, threshold::ConvertOptions};
//!
//! let image = render::open("ticket.png")?;
//! let image = render::fit_width(image, 576);
//! let bitmap = render::threshold::convert(&image, ConvertOptions::default());
//!
//! render::preview::save_png(&bitmap, "ticket-1bit.png")?;
//! # Ok::<(), printy::PrintyError>(())
//! ```

pub mod preview;
pub mod threshold;

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

pub use threshold::{Bitmap, ConvertOptions};

use crate::error::PrintyError;

/// Decode an image from memory, guessing its format from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PrintyError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Decode an image file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<DynamicImage, PrintyError> {
    Ok(image::open(path.as_ref())?)
}

/// Shrink an image to at most `max_width` pixels wide, keeping aspect ratio.
///
/// Images that already fit are returned unchanged. Uses Lanczos3 for print
/// quality.
pub fn fit_width(image: DynamicImage, max_width: u32) -> DynamicImage {
    if image.width() <= max_width || max_width == 0 {
        return image;
    }

    let aspect_ratio = image.height() as f32 / image.width() as f32;
    let target_height = ((max_width as f32 * aspect_ratio).round() as u32).max(1);
    image.resize_exact(max_width, target_height, FilterType::Lanczos3)
}
