//! # Luminance Threshold Conversion
//!
//! Converts a decoded image into a 1-bit [`Bitmap`] by comparing each pixel's
//! luminance against a fixed threshold.
//!
//! ## Luminance
//!
//! ```text
//! luma  = 0.299 R + 0.587 G + 0.114 B      (normalized to 0.0..=1.0)
//! paper = luma × alpha + 1.0 × (1 - alpha) (composited over white paper)
//! ```
//!
//! ## Decision
//!
//! | invert | black dot when |
//! |--------|----------------|
//! | false  | `paper < threshold` |
//! | true   | `paper >= threshold` |
//!
//! Inversion flips the decision itself, so the inverted bitmap is the exact
//! complement of the normal one. Some printers define a set bit as "no dot".
//!
//! ## Example
//!
//! ```
//! use image::{DynamicImage, GrayImage, Luma};
//! use printy::render::threshold::{self, ConvertOptions};
//!
//! let mut img = GrayImage::new(2, 1);
//! img.put_pixel(0, 0, Luma([0]));
//! img.put_pixel(1, 0, Luma([255]));
//!
//! let bitmap = threshold::convert(&DynamicImage::ImageLuma8(img), ConvertOptions::default());
//! assert!(bitmap.get(0, 0));
//! assert!(!bitmap.get(1, 0));
//! ```

use image::DynamicImage;

/// Default luminance threshold (mid-gray)
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Options for [`convert`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Luminance cutoff in `0.0..=1.0`. Out-of-range values are clamped;
    /// NaN falls back to [`DEFAULT_THRESHOLD`].
    pub threshold: f32,
    /// Flip the black/white decision.
    pub invert: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            invert: false,
        }
    }
}

impl ConvertOptions {
    pub fn new(threshold: f32, invert: bool) -> Self {
        Self { threshold, invert }
    }

    /// Decide whether a pixel of the given luminance prints a dot.
    #[inline]
    pub fn is_black(&self, luminance: f32) -> bool {
        let threshold = if self.threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        (luminance < threshold) != self.invert
    }
}

/// # 1-bit Bitmap
///
/// A `width × height` grid of dots, row-major, `true` = black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    dots: Vec<bool>,
}

impl Bitmap {
    /// Create an all-white bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![false; width * height],
        }
    }

    /// Build a bitmap from rows of dots.
    ///
    /// Returns `None` if the rows have differing lengths.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Option<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut dots = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return None;
            }
            dots.extend_from_slice(row);
        }
        Some(Self {
            width,
            height: rows.len(),
            dots,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Dot at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.dots[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, black: bool) {
        self.dots[y * self.width + x] = black;
    }

    /// One row of dots, left to right.
    #[inline]
    pub fn row(&self, y: usize) -> &[bool] {
        &self.dots[y * self.width..(y + 1) * self.width]
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks_exact(0) panics, and a zero-width bitmap still has `height` rows
        (0..self.height).map(move |y| self.row(y))
    }

    /// Number of black dots.
    pub fn count_black(&self) -> usize {
        self.dots.iter().filter(|&&d| d).count()
    }
}

/// Paper luminance of an RGBA pixel, alpha composited over white.
#[inline]
pub fn luminance(rgba: [u8; 4]) -> f32 {
    let [r, g, b, a] = rgba.map(|c| c as f32 / 255.0);
    let luma = 0.299 * r + 0.587 * g + 0.114 * b;
    luma * a + (1.0 - a)
}

/// Convert an image to a 1-bit bitmap.
///
/// Every pixel maps to exactly one dot; this never fails for a decoded image.
pub fn convert(image: &DynamicImage, options: ConvertOptions) -> Bitmap {
    let rgba = image.to_rgba8();
    let width = rgba.width() as usize;
    let height = rgba.height() as usize;

    let dots = rgba
        .pixels()
        .map(|p| options.is_black(luminance(p.0)))
        .collect();

    Bitmap {
        width,
        height,
        dots,
    }
}

// ============================================================================
// TESTS
// ============================================================================
