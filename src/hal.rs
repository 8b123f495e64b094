//! Collaborators the transceiver is driven by.
//!
//! All of them must be non-blocking. Each trait is implemented for closures
//! of the matching signature, so simple setups need no wrapper types.

use crate::tick::Tick;

/// Non-blocking byte source, e.g. a UART receive register.
pub trait Source {
    /// Returns the next received byte, or `None` if no data is available.
    fn read(&mut self) -> Option<u8>;
}

/// Non-blocking byte sink, e.g. a UART transmit register.
pub trait Sink {
    /// Attempts to write one byte.
    ///
    /// Returns `false` if the sink cannot take the byte right now.
    fn write(&mut self, byte: u8) -> bool;
}

/// Monotonic, wrapping tick counter.
pub trait Timer {
    /// The tick type and thus the wraparound width.
    type Tick: Tick;

    /// Returns the current tick count.
    fn now(&mut self) -> Self::Tick;
}

/// Application-level message handler.
pub trait Handler {
    /// Handles a received payload.
    ///
    /// A reply is written into `response` and its length returned.
    /// Returning `None` or `Some(0)` sends nothing.
    fn handle(&mut self, request: &[u8], response: &mut [u8]) -> Option<usize>;
}

impl<F> Source for F
where
    F: FnMut() -> Option<u8>,
{
    fn read(&mut self) -> Option<u8> {
        self()
    }
}

impl<F> Sink for F
where
    F: FnMut(u8) -> bool,
{
    fn write(&mut self, byte: u8) -> bool {
        self(byte)
    }
}

impl<F, T> Timer for F
where
    F: FnMut() -> T,
    T: Tick,
{
    type Tick = T;

    fn now(&mut self) -> Self::Tick {
        self()
    }
}

impl<F> Handler for F
where
    F: FnMut(&[u8], &mut [u8]) -> Option<usize>,
{
    fn handle(&mut self, request: &[u8], response: &mut [u8]) -> Option<usize> {
        self(request, response)
    }
}
