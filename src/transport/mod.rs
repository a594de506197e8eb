//! # Printer Transport Layer
//!
//! Delivers a finished [`PrintJob`] to the printer. This is the only part of
//! the crate that performs I/O.
//!
//! ## Available Transports
//!
//! - [`device`]: Direct writes to a device node (USB `lp`, serial, RFCOMM)
//! - [`queue`]: Raw submission to a CUPS/LPD queue via `lp` or `lpr`
//!
//! ## Retries
//!
//! [`send`] resubmits the complete job according to a [`RetryPolicy`]. A
//! job is never partially resent.
//!
//! ## Serialization
//!
//! Two jobs interleaved on one printer garble both. `send` does not lock;
//! callers serialize sends per target (see [`crate::printer::Printer`]).

pub mod device;
pub mod queue;
pub mod retry;

use std::fmt;
use std::io;
use std::path::PathBuf;

use log::debug;

pub use device::DeviceSink;
pub use queue::{QueueCommand, QueueSink};
pub use retry::RetryPolicy;

use crate::error::{PrintyError, TransportError};
use crate::protocol::PrintJob;

/// Something that accepts a whole job in one attempt.
///
/// Implementations open their handle per call and release it before
/// returning, on every path.
pub trait Sink {
    fn deliver(&mut self, job: &[u8]) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&mut self, job: &[u8]) -> io::Result<()> {
        (**self).deliver(job)
    }
}

/// Where a job goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrinterTarget {
    /// A named OS print queue (CUPS)
    Queue { name: String },
    /// A device node written directly
    Device { path: PathBuf },
}

impl PrinterTarget {
    pub fn queue<S: Into<String>>(name: S) -> Self {
        Self::Queue { name: name.into() }
    }

    pub fn device<P: Into<PathBuf>>(path: P) -> Self {
        Self::Device { path: path.into() }
    }

    /// Pick a target from a printer name and/or a device path.
    ///
    /// A device path wins when both are given. Empty values count as unset.
    pub fn resolve(name: Option<String>, device: Option<PathBuf>) -> Result<Self, PrintyError> {
        let device = device.filter(|path| !path.as_os_str().is_empty());
        match (name, device) {
            (_, Some(path)) => Ok(Self::device(path)),
            (Some(name), None) if !name.trim().is_empty() => Ok(Self::queue(name)),
            _ => Err(PrintyError::Target(
                "set a printer name or a device path".to_string(),
            )),
        }
    }

    /// The sink delivering to this target with default settings.
    pub fn sink(&self) -> Box<dyn Sink> {
        match self {
            Self::Queue { name } => Box::new(QueueSink::new(name.clone())),
            Self::Device { path } => Box::new(DeviceSink::new(path.clone())),
        }
    }
}

impl fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue { name } => write!(f, "queue {}", name),
            Self::Device { path } => write!(f, "device {}", path.display()),
        }
    }
}

/// A job the OS accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Send a job to a target with retries.
pub fn send(
    target: &PrinterTarget,
    job: &PrintJob,
    policy: &RetryPolicy,
) -> Result<Delivery, TransportError> {
    let mut sink = target.sink();
    send_with(&mut sink, job, policy)
}

/// Send a job through any sink with retries.
///
/// Each attempt resends the complete job. Stops early when the policy says
/// an error is not retryable.
pub fn send_with<S: Sink + ?Sized>(
    sink: &mut S,
    job: &PrintJob,
    policy: &RetryPolicy,
) -> Result<Delivery, TransportError> {
    let max_attempts = policy.attempts();
    let mut attempts = 0;

    loop {
        attempts += 1;

        match sink.deliver(job.as_bytes()) {
            Ok(()) => {
                debug!("job of {} bytes accepted on attempt {}", job.len(), attempts);
                return Ok(Delivery { attempts });
            }
            Err(source) => {
                if attempts >= max_attempts || !policy.should_retry(&source) {
                    return Err(TransportError { attempts, source });
                }
                debug!(
                    "attempt {}/{} failed: {}; retrying in {:?}",
                    attempts, max_attempts, source, policy.delay
                );
                policy.wait();
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CommandSet, FrameOptions, frame, raster};
    use crate::render::Bitmap;

    /// Fails `failures` times, then records what it receives.
    struct Flaky {
        failures: u32,
        kind: io::ErrorKind,
        calls: u32,
        received: Vec<Vec<u8>>,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                kind: io::ErrorKind::TimedOut,
                calls: 0,
                received: Vec::new(),
            }
        }
    }

    impl Sink for Flaky {
        fn deliver(&mut self, job: &[u8]) -> io::Result<()> {
            self.calls += 1;
            if self.calls <= self.failures {
                return Err(io::Error::new(self.kind, format!("stall {}", self.calls)));
            }
            self.received.push(job.to_vec());
            Ok(())
        }
    }

    fn job() -> PrintJob {
        let bitmap = Bitmap::from_rows(&[[true; 8]]).unwrap();
        let raster = raster::encode(&bitmap, 0).unwrap();
        frame(&CommandSet::escpos(), &raster, &FrameOptions::default()).unwrap()
    }

    #[test]
    fn test_first_attempt_succeeds() {
        let mut sink = Flaky::new(0);
        let delivery = send_with(&mut sink, &job(), &RetryPolicy::immediate(3)).unwrap();
        assert_eq!(delivery.attempts, 1);
    }

    #[test]
    fn test_fails_twice_then_succeeds() {
        let mut sink = Flaky::new(2);
        let job = job();
        let delivery = send_with(&mut sink, &job, &RetryPolicy::immediate(3)).unwrap();

        assert_eq!(delivery, Delivery { attempts: 3 });
        // Exactly one complete copy of the job was accepted
        assert_eq!(sink.received, vec![job.as_bytes().to_vec()]);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut sink = Flaky::new(u32::MAX);
        let err = send_with(&mut sink, &job(), &RetryPolicy::immediate(3)).unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(sink.calls, 3);
        assert_eq!(err.source.to_string(), "stall 3");
    }

    #[test]
    fn test_non_retryable_stops_immediately() {
        let mut sink = Flaky::new(u32::MAX);
        sink.kind = io::ErrorKind::PermissionDenied;
        let err = send_with(&mut sink, &job(), &RetryPolicy::immediate(3)).unwrap_err();

        assert_eq!(err.attempts, 1);
        assert_eq!(sink.calls, 1);
    }

    #[test]
    fn test_resolve_prefers_device() {
        let target =
            PrinterTarget::resolve(Some("Thermal".into()), Some("/dev/usb/lp0".into())).unwrap();
        assert_eq!(target, PrinterTarget::device("/dev/usb/lp0"));

        let target = PrinterTarget::resolve(Some("Thermal".into()), None).unwrap();
        assert_eq!(target, PrinterTarget::queue("Thermal"));

        assert!(PrinterTarget::resolve(None, None).is_err());
        assert!(PrinterTarget::resolve(Some("  ".into()), None).is_err());
    }

    #[test]
    fn test_resolve_ignores_empty_device() {
        assert!(matches!(
            PrinterTarget::resolve(None, Some(PathBuf::new())),
            Err(PrintyError::Target(_))
        ));

        let target = PrinterTarget::resolve(Some("Thermal".into()), Some("".into())).unwrap();
        assert_eq!(target, PrinterTarget::queue("Thermal"));
    }

    #[test]
    fn test_send_to_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lp0");
        let err = send(
            &PrinterTarget::device(&path),
            &job(),
            &RetryPolicy::immediate(2),
        )
        .unwrap_err();
        assert_eq!(err.attempts, 2);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_display() {
        assert_eq!(PrinterTarget::queue("Thermal").to_string(), "queue Thermal");
        assert_eq!(
            PrinterTarget::device("/dev/usb/lp0").to_string(),
            "device /dev/usb/lp0"
        );
    }
}
