//! # Printer Module
//!
//! Printer models and the caller-owned printer handle.
//!
//! ## Modules
//!
//! - [`profile`]: Printer hardware descriptions and opcode tables
//! - [`session`]: [`Printer`], which runs the pipeline and serializes sends

pub mod profile;
pub mod session;

pub use profile::PrinterProfile;
pub use session::Printer;
