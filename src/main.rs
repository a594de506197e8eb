//! # Printy CLI
//!
//! Command-line interface for printing images on thermal receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # List printer profiles
//! printy profiles
//!
//! # Print to a CUPS queue (raw)
//! printy print ticket.png --printer Thermal_Printer
//!
//! # Print straight to a device node with a Star printer profile
//! printy print ticket.png --device /dev/usb/lp0 --profile tsp650ii
//!
//! # Save the 1-bit preview instead of printing
//! printy print ticket.png --png preview.png
//!
//! # Dump the job bytes instead of printing
//! printy print ticket.png --dump job.bin
//! ```
//!
//! Set `RUST_LOG=debug` to see retry attempts.

use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use printy::{
    PrintyError,
    printer::{Printer, PrinterProfile},
    protocol::{Alignment, FrameOptions},
    render::{self, ConvertOptions, preview},
    transport::{PrinterTarget, RetryPolicy},
};

/// Printy - Thermal printer image utility
#[derive(Parser, Debug)]
#[command(name = "printy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an image on the thermal printer
    Print {
        /// Image file (PNG, JPEG, GIF, BMP)
        image: PathBuf,

        /// CUPS queue name
        #[arg(long, env = "PRINTER_NAME")]
        printer: Option<String>,

        /// Device path, written directly (takes precedence over --printer)
        #[arg(long, env = "PRINTY_DEVICE")]
        device: Option<PathBuf>,

        /// Built-in profile key or a JSON profile file
        #[arg(long, env = "PRINTY_PROFILE", default_value = "escpos")]
        profile: String,

        /// Luminance threshold (0.0 - 1.0)
        #[arg(long, default_value_t = 0.5, value_parser = parse_threshold)]
        threshold: f32,

        /// Flip the black/white decision
        #[arg(long)]
        invert: bool,

        /// Image alignment: left, center or right
        #[arg(long, default_value = "left")]
        align: Alignment,

        /// Line feeds after the image
        #[arg(long, default_value_t = 3)]
        feed: u16,

        /// Do not cut the paper after printing
        #[arg(long)]
        no_cut: bool,

        /// Delivery attempts before giving up
        #[arg(long, default_value_t = 3)]
        attempts: u32,

        /// Delay between attempts in milliseconds
        #[arg(long, default_value_t = 2000)]
        retry_delay_ms: u64,

        /// Save the 1-bit preview to a PNG file instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Write the raw job bytes to a file instead of printing
        #[arg(long, value_name = "FILE")]
        dump: Option<PathBuf>,
    },

    /// List built-in printer profiles
    Profiles,
}

fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 1, got {}", value))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PrintyError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Profiles => {
            println!("Available profiles:");
            for (key, profile) in PrinterProfile::built_in() {
                println!(
                    "  {:<14} {} ({} dots, {:.0}mm)",
                    key,
                    profile.name,
                    profile.width_dots,
                    profile.width_mm()
                );
            }
        }
        Commands::Print {
            image,
            printer,
            device,
            profile,
            threshold,
            invert,
            align,
            feed,
            no_cut,
            attempts,
            retry_delay_ms,
            png,
            dump,
        } => {
            let profile = PrinterProfile::load(&profile)?;
            let frame = FrameOptions {
                align,
                feed_lines: feed,
                cut_after: !no_cut,
            };
            let policy = RetryPolicy::new(attempts, Duration::from_millis(retry_delay_ms));

            // Previews and dumps need no real target
            let offline = png.is_some() || dump.is_some();
            let target = if offline {
                PrinterTarget::resolve(printer, device)
                    .unwrap_or_else(|_| PrinterTarget::queue("preview"))
            } else {
                PrinterTarget::resolve(printer, device)?
            };

            let printer = Printer::new(target, profile)
                .with_convert_options(ConvertOptions::new(threshold, invert))
                .with_frame_options(frame)
                .with_retry_policy(policy);

            let source = render::open(&image)?;
            info!(
                "Loaded {} ({}x{})",
                image.display(),
                source.width(),
                source.height()
            );

            if let Some(png_path) = png {
                preview::save_png(&printer.rasterize(&source), &png_path)?;
                println!("Saved preview to {}", png_path.display());
            }

            if let Some(dump_path) = dump {
                let job = printer.prepare(&source)?;
                job.save(&dump_path)?;
                println!("Wrote {} bytes to {}", job.len(), dump_path.display());
            }

            if offline {
                return Ok(());
            }

            println!("Printing {} to {}...", image.display(), printer.target());
            let delivery = printer.print_image(&source)?;
            println!("Printed successfully ({} attempt(s))", delivery.attempts);
        }
    }

    Ok(())
}
