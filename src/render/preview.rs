//! PNG previews of 1-bit bitmaps.

use std::path::Path;

use image::{GrayImage, Luma};

use super::threshold::Bitmap;
use crate::error::PrintyError;

/// Render a bitmap as a black-on-white grayscale image.
pub fn to_image(bitmap: &Bitmap) -> GrayImage {
    let mut img = GrayImage::new(bitmap.width() as u32, bitmap.height() as u32);

    for (y, row) in bitmap.rows().enumerate() {
        for (x, &is_black) in row.iter().enumerate() {
            let color = if is_black { 0u8 } else { 255u8 };
            img.put_pixel(x as u32, y as u32, Luma([color]));
        }
    }

    img
}

/// Save a bitmap as a PNG file.
pub fn save_png<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<(), PrintyError> {
    to_image(bitmap).save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_image_colors() {
        let bitmap = Bitmap::from_rows(&[[true, false, true]]).unwrap();
        let img = to_image(&bitmap);

        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.get_pixel(0, 0), &Luma([0]));
        assert_eq!(img.get_pixel(1, 0), &Luma([255]));
        assert_eq!(img.get_pixel(2, 0), &Luma([0]));
    }

    #[test]
    fn test_save_png_round_trip() {
        let bitmap = Bitmap::from_rows(&[[true, false], [false, true]]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");

        save_png(&bitmap, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_luma8();

        assert_eq!(loaded, to_image(&bitmap));
    }
}
