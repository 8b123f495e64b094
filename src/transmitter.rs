//! Single-frame transmit buffer.

use log::{debug, trace};

use crate::config::Capabilities;
use crate::crc16::checksum;
use crate::error::Error;
use crate::frame::{
    frame_size, max_payload, HEADER_SIZE, ID_OFFSET, LENGTH_OFFSET, RESEND_REQUEST, SYNC0, SYNC1,
};
use crate::hal::Sink;
use crate::utils::HexSlice;

/// Builds outgoing frames of up to `N` bytes and drains them into a [`Sink`].
///
/// Only one frame can be in flight. While bytes are pending, the transmitter
/// is busy and rejects new frames.
///
/// With resends enabled, the length of the last built frame is retained.
/// The frame bytes stay in the buffer after draining, so a resend only needs
/// to re-arm the drain.
#[derive(Debug)]
pub struct Transmitter<const N: usize> {
    capabilities: Capabilities,
    buffer: [u8; N],
    cursor: usize,
    remaining: usize,
    last_frame: Option<usize>,
    id: u8,
}

impl<const N: usize> Transmitter<N> {
    /// Largest payload that fits into the buffer.
    pub const MAX_PAYLOAD: usize = max_payload(N);

    /// Creates an idle transmitter.
    #[must_use]
    pub const fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            buffer: [0; N],
            cursor: 0,
            remaining: 0,
            last_frame: None,
            id: 0,
        }
    }

    /// Returns whether bytes are waiting to be drained.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.remaining != 0
    }

    /// Returns the number of bytes waiting to be drained.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.remaining
    }

    /// Returns the bytes waiting to be drained.
    #[must_use]
    pub fn pending_bytes(&self) -> &[u8] {
        &self.buffer[self.cursor..self.cursor + self.remaining]
    }

    /// Returns the size of the frame retained for resends.
    #[must_use]
    pub const fn last_frame(&self) -> Option<usize> {
        self.last_frame
    }

    /// Returns the payload region of the buffer, if idle.
    ///
    /// Bytes written here can be framed with [`commit`](Self::commit) without
    /// copying. Handing out the slot forfeits the retained frame, because
    /// the caller may overwrite its payload.
    pub fn write_slot(&mut self) -> Option<&mut [u8]> {
        if self.is_busy() {
            return None;
        }

        self.last_frame = None;
        self.buffer
            .get_mut(HEADER_SIZE..HEADER_SIZE + Self::MAX_PAYLOAD)
    }

    /// Copies `payload` into the buffer and frames it.
    ///
    /// Returns the payload length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if a frame is in flight and [`Error::InvalidLength`]
    /// if the payload is empty or too large.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, Error> {
        self.check(payload.len())?;
        self.buffer[HEADER_SIZE..HEADER_SIZE + payload.len()].copy_from_slice(payload);
        self.commit(payload.len())
    }

    /// Frames the first `len` bytes of the [`write_slot`](Self::write_slot).
    ///
    /// Returns the payload length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if a frame is in flight and [`Error::InvalidLength`]
    /// if `len` is zero or too large.
    pub fn commit(&mut self, len: usize) -> Result<usize, Error> {
        self.check(len)?;

        self.buffer[0] = SYNC0;
        self.buffer[1] = SYNC1;
        self.buffer[ID_OFFSET] = self.next_id();
        self.buffer[LENGTH_OFFSET] = (len - 1) as u8;

        let end = HEADER_SIZE + len;
        let [low, high] = checksum(&self.buffer[..end]).to_le_bytes();
        self.buffer[end] = low;
        self.buffer[end + 1] = high;

        let size = frame_size(len);
        trace!("Framed: {:#04X}", HexSlice::new(&self.buffer[..size]));
        self.arm(size);

        if self.capabilities.resend {
            self.last_frame = Some(size);
        }

        Ok(len)
    }

    /// Hands pending bytes to `sink` until it refuses one or the frame is done.
    ///
    /// Returns the number of bytes the sink accepted.
    pub fn drain<S>(&mut self, sink: &mut S) -> usize
    where
        S: Sink,
    {
        let mut sent = 0;

        while self.remaining > 0 {
            if !sink.write(self.buffer[self.cursor]) {
                trace!("Sink refused byte. {} pending.", self.remaining);
                break;
            }

            self.cursor += 1;
            self.remaining -= 1;
            sent += 1;
        }

        sent
    }

    /// Queues a resend request, if idle.
    ///
    /// The control frame overwrites the sync bytes of the retained frame,
    /// which [`resend`](Self::resend) restores.
    pub fn request_resend(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }

        debug!("Requesting resend.");
        self.buffer[..RESEND_REQUEST.len()].copy_from_slice(&RESEND_REQUEST);
        self.arm(RESEND_REQUEST.len());
        true
    }

    /// Re-sends the retained frame verbatim, if idle.
    pub fn resend(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }

        let Some(size) = self.last_frame else {
            return false;
        };

        debug!("Resending last frame ({size} bytes).");
        self.buffer[0] = SYNC0;
        self.buffer[1] = SYNC1;
        self.arm(size);
        true
    }

    fn check(&self, len: usize) -> Result<(), Error> {
        if self.is_busy() {
            return Err(Error::Busy);
        }

        if len == 0 || len > Self::MAX_PAYLOAD {
            return Err(Error::InvalidLength {
                size: len,
                max: Self::MAX_PAYLOAD,
            });
        }

        Ok(())
    }

    fn next_id(&mut self) -> u8 {
        if self.capabilities.id_filtering {
            self.id = self.id.wrapping_add(1);
            self.id
        } else {
            0
        }
    }

    fn arm(&mut self, size: usize) {
        self.cursor = 0;
        self.remaining = size;
    }
}
