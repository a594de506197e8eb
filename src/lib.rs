//! # Printy - Image Printing for Thermal Receipt Printers
//!
//! Printy turns rendered images (ticket notices, receipts) into thermal
//! printer jobs and delivers them. It provides:
//!
//! - **Bi-level conversion**: luminance threshold with optional inversion
//! - **Raster encoding**: MSB-first bit packing with a bytes-per-line header
//! - **Framing**: data-driven opcode tables for ESC/POS and StarPRNT
//! - **Transport**: device nodes or CUPS queues, with bounded retry
//!
//! ## Quick Start
//!
//! ```no_run
//! use printy::{
//!     printer::{Printer, PrinterProfile},
//!     protocol::{Alignment, FrameOptions},
//!     transport::PrinterTarget,
//! };
//!
//! let printer = Printer::new(PrinterTarget::queue("Thermal_Printer"), PrinterProfile::escpos())
//!     .with_frame_options(FrameOptions {
//!         align: Alignment::Center,
//!         ..FrameOptions::default()
//!     });
//!
//! let delivery = printer.print_file("ticket.png")?;
//! println!("Printed after {} attempt(s)", delivery.attempts);
//!
//! # Ok::<(), printy::PrintyError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Image decoding and 1-bit conversion |
//! | [`protocol`] | Raster encoding and job framing |
//! | [`transport`] | Device and queue delivery, retry policy |
//! | [`printer`] | Printer profiles and the printer handle |
//! | [`error`] | Error types |
//!
//! ## Pipeline
//!
//! ```text
//! image ─► render::threshold ─► protocol::raster ─► protocol::frame ─► transport
//! ```

pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use error::{PrintyError, TransportError};
pub use printer::{Printer, PrinterProfile};
pub use transport::PrinterTarget;
