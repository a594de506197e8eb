//! # Direct Device Transport
//!
//! Writes a job straight to a device node: a USB line printer
//! (`/dev/usb/lp0`), a serial port, or a Bluetooth RFCOMM TTY
//! (`/dev/rfcomm0`).
//!
//! ## TTY Configuration
//!
//! When the path is a terminal device it is switched to raw mode before
//! writing, so binary raster data is transmitted without modification:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//!
//! ## Chunked Writes
//!
//! Large jobs are written in chunks with a small delay between them so slow
//! links are not overwhelmed. The file is opened per delivery and closed when
//! the delivery returns, on success or failure.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::trace;

use super::Sink;

/// Default chunk size for writes (bytes)
pub const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Device Sink
///
/// ```no_run
/// use printy::transport::{DeviceSink, Sink};
///
/// let mut sink = DeviceSink::new("/dev/usb/lp0");
/// sink.deliver(&[0x1B, 0x40])?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeviceSink {
    path: PathBuf,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl DeviceSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    fn open(&self) -> io::Result<File> {
        // Never create: a missing device node must fail, not become a file
        let file = OpenOptions::new().write(true).open(&self.path)?;

        if is_tty(&file) {
            configure_tty_raw(file.as_raw_fd())?;
        }

        Ok(file)
    }

    fn write_chunked(&self, file: &mut File, data: &[u8]) -> io::Result<()> {
        if data.len() <= self.chunk_size {
            return file.write_all(data);
        }

        for chunk in data.chunks(self.chunk_size) {
            file.write_all(chunk)?;

            if !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }

        Ok(())
    }
}

impl Sink for DeviceSink {
    fn deliver(&mut self, job: &[u8]) -> io::Result<()> {
        let mut file = self.open()?;
        trace!("writing {} bytes to {}", job.len(), self.path.display());

        self.write_chunked(&mut file, job)?;
        file.flush()
    }
}

fn is_tty(file: &File) -> bool {
    unsafe { libc::isatty(file.as_raw_fd()) == 1 }
}

/// Configure a file descriptor for raw TTY mode.
///
/// IXON/IXOFF/IXANY are cleared too: 0x11 (XON) and 0x13 (XOFF) appear in
/// binary raster data and would otherwise be swallowed as flow control.
fn configure_tty_raw(fd: i32) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
