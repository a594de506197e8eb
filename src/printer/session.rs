//! # Printer Session
//!
//! [`Printer`] is the handle callers own for one physical printer. It runs
//! the full pipeline and serializes sends so two jobs never interleave on the
//! same device.
//!
//! ```text
//! image ─► fit_width ─► threshold ─► encode ─► frame ─► (lock) send
//! ```
//!
//! Share one `Printer` (e.g. in an `Arc`) between threads that print to the
//! same target. There is no process-wide printer state.
//!
//! The lock belongs to the handle, not to the target: two `Printer`s built
//! for the same device do not exclude each other.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use image::DynamicImage;
use log::debug;

use super::profile::PrinterProfile;
use crate::error::PrintyError;
use crate::protocol::{FrameOptions, PrintJob};
use crate::render::{self, Bitmap, ConvertOptions, threshold};
use crate::transport::{self, Delivery, PrinterTarget, RetryPolicy};

/// # Printer Handle
///
/// ```no_run
/// use printy::printer::{Printer, PrinterProfile};
/// use printy::transport::PrinterTarget;
///
/// let printer = Printer::new(PrinterTarget::queue("Thermal"), PrinterProfile::escpos());
/// let delivery = printer.print_file("ticket.png")?;
/// println!("printed after {} attempt(s)", delivery.attempts);
/// # Ok::<(), printy::PrintyError>(())
/// ```
#[derive(Debug)]
pub struct Printer {
    target: PrinterTarget,
    profile: PrinterProfile,
    policy: RetryPolicy,
    convert: ConvertOptions,
    frame: FrameOptions,
    lock: Mutex<()>,
}

impl Printer {
    pub fn new(target: PrinterTarget, profile: PrinterProfile) -> Self {
        Self {
            target,
            profile,
            policy: RetryPolicy::default(),
            convert: ConvertOptions::default(),
            frame: FrameOptions::default(),
            lock: Mutex::new(()),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }

    pub fn with_frame_options(mut self, options: FrameOptions) -> Self {
        self.frame = options;
        self
    }

    pub fn target(&self) -> &PrinterTarget {
        &self.target
    }

    pub fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    /// Threshold an image, shrinking it to the print width first if needed.
    pub fn rasterize(&self, image: &DynamicImage) -> Bitmap {
        let max_width = self.profile.width_dots as u32;
        if image.width() > max_width {
            debug!("scaling {}px wide image to {}px", image.width(), max_width);
            let scaled = render::fit_width(image.clone(), max_width);
            threshold::convert(&scaled, self.convert)
        } else {
            threshold::convert(image, self.convert)
        }
    }

    /// Build the job for an image without sending it.
    pub fn prepare(&self, image: &DynamicImage) -> Result<PrintJob, PrintyError> {
        let bitmap = self.rasterize(image);
        let raster = self.profile.encode(&bitmap)?;
        self.profile.frame(&raster, &self.frame)
    }

    /// Send a finished job, holding this handle's lock for the whole send,
    /// retries included.
    pub fn send(&self, job: &PrintJob) -> Result<Delivery, PrintyError> {
        // A panic in another sender leaves no state to repair
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("sending {} bytes to {}", job.len(), self.target);
        Ok(transport::send(&self.target, job, &self.policy)?)
    }

    /// Convert, encode, frame and send one image.
    pub fn print_image(&self, image: &DynamicImage) -> Result<Delivery, PrintyError> {
        let job = self.prepare(image)?;
        self.send(&job)
    }

    /// Decode an image file and print it.
    pub fn print_file<P: AsRef<Path>>(&self, path: P) -> Result<Delivery, PrintyError> {
        let image = render::open(path)?;
        self.print_image(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x + y) % 2 == 0 { 0 } else { 255 }])
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_rasterize_keeps_narrow_images() {
        let printer = Printer::new(PrinterTarget::queue("Thermal"), PrinterProfile::escpos_58());
        let bitmap = printer.rasterize(&checkerboard(16, 4));
        assert_eq!((bitmap.width(), bitmap.height()), (16, 4));
        assert_eq!(bitmap.count_black(), 32);
    }

    #[test]
    fn test_rasterize_scales_wide_images() {
        let printer = Printer::new(PrinterTarget::queue("Thermal"), PrinterProfile::escpos_58());
        let bitmap = printer.rasterize(&checkerboard(768, 100));
        assert_eq!((bitmap.width(), bitmap.height()), (384, 50));
    }

    #[test]
    fn test_prepare_uses_profile_commands() {
        let printer = Printer::new(PrinterTarget::queue("Thermal"), PrinterProfile::tsp650ii())
            .with_frame_options(FrameOptions {
                cut_after: true,
                ..FrameOptions::default()
            });
        let job = printer.prepare(&checkerboard(8, 1)).unwrap();
        // ESC GS S header follows ESC @
        assert_eq!(&job.as_bytes()[2..5], &[0x1B, 0x1D, 0x53]);
        // ESC d 2 cut, then ESC @ reset
        assert!(job.as_bytes().ends_with(&[0x1B, b'd', 2, 0x1B, 0x40]));
    }

    #[test]
    fn test_print_to_device_file() {
        let device = tempfile::NamedTempFile::new().unwrap();

        let printer = Printer::new(PrinterTarget::device(device.path()), PrinterProfile::escpos())
            .with_retry_policy(RetryPolicy::immediate(3));
        let image = checkerboard(24, 3);
        let delivery = printer.print_image(&image).unwrap();

        let written = std::fs::read(device.path()).unwrap();
        assert_eq!(delivery.attempts, 1);
        assert_eq!(written, printer.prepare(&image).unwrap().into_bytes());
    }
}
