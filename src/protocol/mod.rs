//! # Thermal Printer Protocol
//!
//! Byte-level encoding of 1-bit images for ESC/POS and StarPRNT printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Shared control bytes (ESC, GS, LF) and helpers
//! - [`raster`]: Bitmap → raster lines (bit packing, bytes-per-line header)
//! - [`command_set`]: Per-family opcode tables (data, not code)
//! - [`frame`]: Raster lines + opcode table → complete print job
//!
//! ## Usage Example
//!
//! ```
//! use printy::protocol::{frame, raster, CommandSet, FrameOptions};
//! use printy::render::Bitmap;
//!
//! let commands = CommandSet::star();
//! let bitmap = Bitmap::from_rows(&[[true, false, true, false, true, false, true, false]]).unwrap();
//!
//! let raster = raster::encode(&bitmap, commands.density)?;
//! assert_eq!(raster.lines, vec![vec![0xAA]]);
//!
//! let job = frame(&commands, &raster, &FrameOptions::default())?;
//! // Send `job` to the printer via transport...
//! # Ok::<(), printy::PrintyError>(())
//! ```

pub mod command_set;
pub mod commands;
pub mod frame;
pub mod raster;

pub use command_set::{Alignment, CommandSet, RasterFormat};
pub use frame::{FrameOptions, PrintJob, frame};
pub use raster::{Raster, RasterHeader};
