mod dispatch;
mod receive;
mod timeout;

use log::trace;

use crate::config::Config;
use crate::deadline::Deadline;
use crate::error::Error;
use crate::frame::{MAX_FRAME_SIZE, MIN_FRAME_SIZE};
use crate::hal::{Handler, Sink, Source, Timer};
use crate::parser::{Parser, Phase};
use crate::transmitter::Transmitter;

/// Point-to-point framing engine.
///
/// The transceiver owns a byte [`Source`], a byte [`Sink`], a [`Timer`] and an
/// application [`Handler`]. It does nothing on its own: the owner calls
/// [`tick`](Self::tick) from a superloop or a timer interrupt, often enough
/// to keep up with the incoming byte rate.
///
/// `RX` and `TX` are the receive and transmit buffer capacities. Both must
/// hold at least a minimum frame, which is checked at compile time.
///
/// # Usage
///
/// ```
/// use sericon::{Config, Transceiver};
///
/// let mut line = b"\xFF\x55\x00\x01AB".iter().copied().collect::<Vec<u8>>();
/// let crc = sericon::checksum(&line);
/// line.extend_from_slice(&crc.to_le_bytes());
/// let mut line = line.into_iter();
/// let mut sent = Vec::new();
/// let mut ticks: u16 = 0;
///
/// let mut transceiver: Transceiver<_, _, _, _> = Transceiver::new(
///     Config::default(),
///     move || line.next(),
///     |byte: u8| {
///         sent.push(byte);
///         true
///     },
///     move || {
///         ticks = ticks.wrapping_add(1);
///         ticks
///     },
///     |request: &[u8], response: &mut [u8]| {
///         response[..request.len()].copy_from_slice(request);
///         Some(request.len())
///     },
/// );
///
/// for _ in 0..3 {
///     transceiver.tick();
/// }
///
/// assert_eq!(transceiver.error_count(), 0);
/// ```
#[derive(Debug)]
pub struct Transceiver<
    R,
    W,
    T,
    H,
    const RX: usize = MAX_FRAME_SIZE,
    const TX: usize = MAX_FRAME_SIZE,
> where
    T: Timer,
{
    source: R,
    sink: W,
    timer: T,
    handler: H,
    config: Config<T::Tick>,
    parser: Parser<RX>,
    transmitter: Transmitter<TX>,
    deadline: Deadline<T::Tick>,
    error_count: u32,
    last_error: Option<Error>,
}

impl<R, W, T, H, const RX: usize, const TX: usize> Transceiver<R, W, T, H, RX, TX>
where
    R: Source,
    W: Sink,
    T: Timer,
    H: Handler,
{
    const BUFFERS_HOLD_MIN_FRAME: () = assert!(
        RX >= MIN_FRAME_SIZE && TX >= MIN_FRAME_SIZE,
        "buffers must hold at least one minimum-size frame"
    );

    /// Creates an idle transceiver.
    pub fn new(config: Config<T::Tick>, source: R, sink: W, timer: T, handler: H) -> Self {
        let () = Self::BUFFERS_HOLD_MIN_FRAME;
        let capabilities = config.capabilities();

        Self {
            source,
            sink,
            timer,
            handler,
            config,
            parser: Parser::new(capabilities),
            transmitter: Transmitter::new(capabilities),
            deadline: Deadline::new(),
            error_count: 0,
            last_error: None,
        }
    }

    /// Runs one non-blocking step of the protocol.
    ///
    /// 1. Drain pending transmit bytes until the sink refuses.
    /// 2. Hand a completed frame to the handler, if the transmitter is idle.
    /// 3. Poll the source until it runs dry or a frame completes.
    /// 4. Expire stalled frames.
    pub fn tick(&mut self) {
        self.transmit();
        self.dispatch();
        self.receive();
    }

    /// Frames and queues `payload` for transmission.
    ///
    /// Returns the payload length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while a frame is being transmitted and
    /// [`Error::InvalidLength`] if the payload is empty or too large.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, Error> {
        self.transmitter.send(payload)
    }

    /// Returns the payload region of the transmit buffer, if idle.
    ///
    /// Frame the written bytes with [`commit`](Self::commit).
    pub fn write_slot(&mut self) -> Option<&mut [u8]> {
        self.transmitter.write_slot()
    }

    /// Frames and queues the first `len` bytes of the [`write_slot`](Self::write_slot).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while a frame is being transmitted and
    /// [`Error::InvalidLength`] if `len` is zero or too large.
    pub fn commit(&mut self, len: usize) -> Result<usize, Error> {
        self.transmitter.commit(len)
    }

    /// Returns whether a frame is being transmitted.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.transmitter.is_busy()
    }

    /// Returns the phase of the receive state machine.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.parser.phase()
    }

    /// Returns the number of discarded frames.
    #[must_use]
    pub const fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Returns the reason the most recent frame was discarded.
    #[must_use]
    pub const fn last_error(&self) -> Option<Error> {
        self.last_error
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config<T::Tick> {
        &self.config
    }

    /// Returns the timeout budget in timer ticks.
    #[must_use]
    pub fn timeout(&self) -> T::Tick {
        self.config.timeout()
    }

    /// Sets the timeout budget in timer ticks.
    ///
    /// Takes effect with the next received byte.
    pub fn set_timeout(&mut self, timeout: T::Tick) {
        self.config.set_timeout(timeout);
    }

    /// Returns a mutable reference to the byte source.
    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Returns a reference to the byte sink.
    pub const fn sink(&self) -> &W {
        &self.sink
    }

    /// Returns a mutable reference to the byte sink.
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Returns a mutable reference to the timer.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Returns a reference to the handler.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns a mutable reference to the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn transmit(&mut self) {
        let sent = self.transmitter.drain(&mut self.sink);

        if sent > 0 {
            trace!("Sent {sent} bytes. {} pending.", self.transmitter.pending());
        }
    }
}
