//! Adapters to run a [`Transceiver`](crate::Transceiver) on a host serial port.

use std::borrow::Cow;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use log::error;

use crate::hal::{Sink, Source, Timer};

#[cfg(windows)]
pub use serialport::COMPort as SerialPortImpl;

#[cfg(unix)]
pub use serialport::TTYPort as SerialPortImpl;

/// Opens a non-blocking serial port depending on the local operating system.
///
/// # Errors
/// For errors please refer to [`serialport::new()`] and the `open()` function of [`SerialPortImpl`].
pub fn open<'a>(
    path: impl Into<Cow<'a, str>>,
    baud_rate: u32,
) -> serialport::Result<SerialPortImpl> {
    SerialPortImpl::open(&serialport::new(path, baud_rate).timeout(Duration::ZERO))
}

/// Byte-wise [`Source`] and [`Sink`] over a blocking I/O handle with a zero timeout.
#[derive(Debug)]
pub struct Port<T> {
    inner: T,
}

impl<T> Port<T> {
    /// Wraps an I/O handle.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped I/O handle.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Source for Port<T>
where
    T: Read,
{
    fn read(&mut self) -> Option<u8> {
        let mut byte = [0];

        match self.inner.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(error) if is_transient(error.kind()) => None,
            Err(error) => {
                error!("Read failed: {error}");
                None
            }
        }
    }
}

impl<T> Sink for Port<T>
where
    T: Write,
{
    fn write(&mut self, byte: u8) -> bool {
        match self.inner.write(&[byte]) {
            Ok(written) => written == 1,
            Err(error) if is_transient(error.kind()) => false,
            Err(error) => {
                error!("Write failed: {error}");
                false
            }
        }
    }
}

/// Millisecond [`Timer`] based on the system's monotonic clock.
///
/// The tick count wraps after roughly 49 days.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock that starts counting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for SystemClock {
    type Tick = u32;

    fn now(&mut self) -> u32 {
        // Truncation is the wraparound.
        self.epoch.elapsed().as_millis() as u32
    }
}

const fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}
