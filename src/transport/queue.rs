//! # Print Queue Transport
//!
//! Submits a job to a CUPS (or LPD-compatible) queue by piping the raw bytes
//! into the spooler's submit command:
//!
//! ```bash
//! lp -d <printer> -o raw      # default
//! lpr -P <printer> -o raw     # QueueCommand::lpr()
//! ```
//!
//! `-o raw` keeps CUPS from running the bytes through a filter. The job is
//! accepted once the command exits successfully; physical completion is not
//! observable from here.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use log::trace;

use super::Sink;

/// Placeholder in [`QueueCommand::args`] replaced by the printer name
pub const PRINTER_PLACEHOLDER: &str = "{printer}";

/// The spooler command used to submit jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for QueueCommand {
    fn default() -> Self {
        Self::lp()
    }
}

impl QueueCommand {
    /// `lp -d {printer} -o raw`
    pub fn lp() -> Self {
        Self {
            program: "lp".to_string(),
            args: ["-d", PRINTER_PLACEHOLDER, "-o", "raw"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// `lpr -P {printer} -o raw`
    pub fn lpr() -> Self {
        Self {
            program: "lpr".to_string(),
            args: ["-P", PRINTER_PLACEHOLDER, "-o", "raw"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Arguments with the printer name substituted.
    pub fn args_for(&self, printer: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace(PRINTER_PLACEHOLDER, printer))
            .collect()
    }
}

/// # Queue Sink
///
/// ```no_run
/// use printy::transport::{QueueSink, Sink};
///
/// let mut sink = QueueSink::new("Thermal_Printer");
/// sink.deliver(&[0x1B, 0x40])?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueueSink {
    printer: String,
    command: QueueCommand,
}

impl QueueSink {
    pub fn new<S: Into<String>>(printer: S) -> Self {
        Self::with_command(printer, QueueCommand::default())
    }

    pub fn with_command<S: Into<String>>(printer: S, command: QueueCommand) -> Self {
        Self {
            printer: printer.into(),
            command,
        }
    }

    pub fn printer(&self) -> &str {
        &self.printer
    }
}

impl Sink for QueueSink {
    fn deliver(&mut self, job: &[u8]) -> io::Result<()> {
        if self.printer.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "printer name is empty",
            ));
        }

        let args = self.command.args_for(&self.printer);
        trace!("{} {} <- {} bytes", self.command.program, args.join(" "), job.len());

        let mut child = Command::new(&self.command.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr concurrently so a chatty spooler cannot fill the pipe
        // and stall while we are still writing its stdin
        let stderr = child.stderr.take();
        let drain = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf);
            }
            buf
        });

        // Close stdin before waiting, or the spooler never sees EOF
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(job).and_then(|()| stdin.flush()),
            None => Err(io::Error::other("spooler stdin unavailable")),
        };

        // Always reap the child, even if the write failed
        let status = child.wait()?;
        let stderr = drain.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(io::Error::other(format!(
                "{} rejected job ({}): {}",
                self.command.program,
                status,
                stderr.trim()
            )));
        }

        write_result
    }
}
