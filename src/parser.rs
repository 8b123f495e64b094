//! Byte-driven receive state machine.

use log::{debug, trace, warn};

use crate::config::Capabilities;
use crate::crc16::Checksum;
use crate::error::Error;
use crate::frame::{
    frame_size, CRC_SIZE, HEADER_SIZE, ID_OFFSET, RESEND0, RESEND1, SYNC0, SYNC1,
};
use crate::utils::HexSlice;

pub use phase::Phase;

mod phase;

/// Receive state machine for frames of up to `N` bytes.
///
/// The parser consumes one byte per [`feed`](Self::feed) call. Errors are
/// latched in [`Phase::Error`] and the remaining bytes of a broken frame are
/// absorbed until the owner calls [`reset`](Self::reset), typically at the
/// next timeout boundary.
#[derive(Debug)]
pub struct Parser<const N: usize> {
    capabilities: Capabilities,
    phase: Phase,
    buffer: heapless::Vec<u8, N>,
    received: usize,
    expected: Option<usize>,
    checksum: Checksum,
    last_id: u8,
}

impl<const N: usize> Parser<N> {
    /// Creates an idle parser.
    #[must_use]
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            phase: Phase::Sync0,
            buffer: heapless::Vec::new(),
            received: 0,
            expected: None,
            checksum: Checksum::new(),
            last_id: 0,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the number of bytes consumed for the current frame.
    ///
    /// This never exceeds the buffer capacity `N`.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.received
    }

    /// Returns whether no byte of a frame has been consumed yet.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.received == 0
    }

    /// Returns the total frame size announced by the length byte, if received.
    #[must_use]
    pub const fn expected_len(&self) -> Option<usize> {
        self.expected
    }

    /// Returns the sequence id of the last accepted frame.
    #[must_use]
    pub const fn last_id(&self) -> u8 {
        self.last_id
    }

    /// Returns the payload of a completed frame.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        if self.phase != Phase::Done {
            return None;
        }

        self.expected
            .and_then(|size| self.buffer.get(HEADER_SIZE..size - CRC_SIZE))
    }

    /// Returns the sequence id of a completed frame.
    #[must_use]
    pub fn id(&self) -> Option<u8> {
        if self.phase == Phase::Done {
            self.buffer.get(ID_OFFSET).copied()
        } else {
            None
        }
    }

    /// Consumes one byte and returns the resulting phase.
    pub fn feed(&mut self, byte: u8) -> Phase {
        match self.phase {
            Phase::Error(_) => {
                trace!("Discarding {byte:#04X}");
                self.received = (self.received + 1).min(N);
                return self.phase;
            }
            Phase::Done => {
                warn!("Frame awaits dispatch. Ignoring {byte:#04X}");
                return self.phase;
            }
            _ => (),
        }

        if self.buffer.push(byte).is_err() {
            self.fail(Error::BufferOverrun);
            return self.phase;
        }

        self.received = self.buffer.len();
        self.checksum.update(byte);
        let phase = self.advance(byte);
        trace!("{byte:#04X}: {} -> {phase}", self.phase);

        match phase {
            Phase::Error(error) => self.fail(error),
            Phase::Done => {
                debug!("Received frame: {:#04X}", HexSlice::new(&self.buffer));
                self.phase = phase;
            }
            Phase::ResendRequested => {
                debug!("Peer requested a resend.");
                self.phase = phase;
            }
            _ => self.phase = phase,
        }

        self.phase
    }

    /// Marks a partially received frame as timed out.
    ///
    /// Returns `true` if a frame was in progress.
    pub fn abandon(&mut self) -> bool {
        if self.is_idle() || self.phase.is_terminal() {
            return false;
        }

        self.fail(Error::Timeout {
            received: self.received,
        });
        true
    }

    /// Returns to idle, discarding the current frame.
    ///
    /// The last accepted sequence id is kept.
    pub fn reset(&mut self) {
        self.phase = Phase::Sync0;
        self.buffer.clear();
        self.received = 0;
        self.expected = None;
        self.checksum.reset();
    }

    fn advance(&mut self, byte: u8) -> Phase {
        match self.phase {
            Phase::Sync0 => match byte {
                SYNC0 => Phase::Sync1,
                RESEND0 if self.capabilities.resend => Phase::ResendSync1,
                other => Phase::Error(Error::Header(other)),
            },
            Phase::Sync1 => {
                if byte == SYNC1 {
                    Phase::Id
                } else {
                    Phase::Error(Error::Header(byte))
                }
            }
            Phase::ResendSync1 => {
                if byte == RESEND1 {
                    Phase::ResendRequested
                } else {
                    Phase::Error(Error::Header(byte))
                }
            }
            Phase::ResendRequested => Phase::Error(Error::Header(byte)),
            Phase::Id => Phase::Length,
            Phase::Length => {
                let size = frame_size(usize::from(byte) + 1);

                if size > N {
                    Phase::Error(Error::Size { size, capacity: N })
                } else {
                    self.expected = Some(size);
                    Phase::Payload
                }
            }
            Phase::Payload => match self.expected {
                Some(size) if self.buffer.len() + CRC_SIZE >= size => Phase::CrcLow,
                _ => Phase::Payload,
            },
            Phase::CrcLow => Phase::CrcHigh,
            Phase::CrcHigh => self.validate(),
            Phase::Done | Phase::Error(_) => self.phase,
        }
    }

    fn validate(&mut self) -> Phase {
        let residue = self.checksum.finish();

        if residue != 0 {
            return Phase::Error(Error::Crc(residue));
        }

        let id = self.buffer[ID_OFFSET];

        if self.capabilities.id_filtering {
            if id == self.last_id {
                return Phase::Error(Error::DuplicateId(id));
            }

            self.last_id = id;
        }

        Phase::Done
    }

    fn fail(&mut self, error: Error) {
        debug!("Frame error in phase {}: {error}", self.phase);
        trace!("Buffer: {:#04X}", HexSlice::new(&self.buffer));
        self.phase = Phase::Error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::{Parser, Phase};
    use crate::config::Capabilities;
    use crate::error::Error;
    use crate::frame::MAX_FRAME_SIZE;
    use crate::testing::encode;

    fn feed_all<const N: usize>(parser: &mut Parser<N>, bytes: &[u8]) -> Phase {
        bytes
            .iter()
            .fold(parser.phase(), |_, &byte| parser.feed(byte))
    }

    #[test]
    fn test_scenario_without_ids() {
        let frame = encode(0, &[0x41, 0x42]);
        assert_eq!(&frame[..6], &[0xFF, 0x55, 0x00, 0x01, 0x41, 0x42]);
        assert_eq!(frame.len(), 8);

        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        let phases: Vec<Phase> = frame.iter().map(|&byte| parser.feed(byte)).collect();

        assert_eq!(
            phases,
            [
                Phase::Sync1,
                Phase::Id,
                Phase::Length,
                Phase::Payload,
                Phase::Payload,
                Phase::CrcLow,
                Phase::CrcHigh,
                Phase::Done,
            ]
        );
        assert_eq!(parser.payload(), Some([0x41, 0x42].as_slice()));
        assert_eq!(parser.expected_len(), Some(8));
        assert_eq!(parser.index(), 8);
    }

    #[test]
    fn test_single_byte_payload() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert_eq!(feed_all(&mut parser, &encode(0, &[0x7E])), Phase::Done);
        assert_eq!(parser.payload(), Some([0x7E].as_slice()));
    }

    #[test]
    fn test_invalid_sync0() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert_eq!(parser.feed(0x12), Phase::Error(Error::Header(0x12)));
    }

    #[test]
    fn test_invalid_sync1() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert_eq!(
            feed_all(&mut parser, &[0xFF, 0x54]),
            Phase::Error(Error::Header(0x54))
        );
    }

    #[test]
    fn test_resend_request_requires_capability() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert_eq!(
            feed_all(&mut parser, &[0x00, 0xAA]),
            Phase::Error(Error::Header(0x00))
        );

        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::ALL);
        assert_eq!(feed_all(&mut parser, &[0x00, 0xAA]), Phase::ResendRequested);
        assert_eq!(parser.payload(), None);
    }

    #[test]
    fn test_resend_request_with_trailing_byte() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::ALL);
        assert_eq!(
            feed_all(&mut parser, &[0x00, 0xAA, 0x01]),
            Phase::Error(Error::Header(0x01))
        );
    }

    #[test]
    fn test_invalid_resend_request() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::ALL);
        assert_eq!(
            feed_all(&mut parser, &[0x00, 0x55]),
            Phase::Error(Error::Header(0x55))
        );
    }

    #[test]
    fn test_size_exceeds_capacity() {
        let mut parser = Parser::<16>::new(Capabilities::NONE);
        assert_eq!(
            feed_all(&mut parser, &[0xFF, 0x55, 0x00, 0x0A]),
            Phase::Error(Error::Size {
                size: 17,
                capacity: 16
            })
        );

        parser.reset();
        assert_eq!(
            feed_all(&mut parser, &[0xFF, 0x55, 0x00, 0x09]),
            Phase::Payload
        );
    }

    #[test]
    fn test_largest_frame_fits_default_capacity() {
        let payload = [0xA5; 256];
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert_eq!(feed_all(&mut parser, &encode(0, &payload)), Phase::Done);
        assert_eq!(parser.payload(), Some(payload.as_slice()));
    }

    #[test]
    fn test_crc_error() {
        let mut frame = encode(0, b"Hello");
        frame[5] ^= 0x10;
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert!(matches!(
            feed_all(&mut parser, &frame),
            Phase::Error(Error::Crc(_))
        ));
        assert_eq!(parser.payload(), None);
    }

    #[test]
    fn test_duplicate_id() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::ALL);
        assert_eq!(feed_all(&mut parser, &encode(1, b"one")), Phase::Done);
        assert_eq!(parser.id(), Some(1));
        assert_eq!(parser.last_id(), 1);

        parser.reset();
        assert_eq!(
            feed_all(&mut parser, &encode(1, b"one")),
            Phase::Error(Error::DuplicateId(1))
        );

        parser.reset();
        assert_eq!(feed_all(&mut parser, &encode(2, b"two")), Phase::Done);
        assert_eq!(parser.payload(), Some(b"two".as_slice()));
    }

    #[test]
    fn test_duplicate_ids_pass_without_filtering() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert_eq!(feed_all(&mut parser, &encode(0, b"one")), Phase::Done);
        parser.reset();
        assert_eq!(feed_all(&mut parser, &encode(0, b"one")), Phase::Done);
    }

    #[test]
    fn test_buffer_overrun() {
        let mut parser = Parser::<2>::new(Capabilities::NONE);
        assert_eq!(
            feed_all(&mut parser, &[0xFF, 0x55, 0x00]),
            Phase::Error(Error::BufferOverrun)
        );
        assert_eq!(parser.index(), 2);
    }

    #[test]
    fn test_error_absorbs_bytes_up_to_capacity() {
        let mut parser = Parser::<16>::new(Capabilities::NONE);
        parser.feed(0x12);

        for byte in 0..=u8::MAX {
            assert_eq!(parser.feed(byte), Phase::Error(Error::Header(0x12)));
        }

        assert_eq!(parser.index(), 16);
    }

    #[test]
    fn test_abandon() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        assert!(!parser.abandon());

        feed_all(&mut parser, &[0xFF, 0x55, 0x00]);
        assert!(parser.abandon());
        assert_eq!(
            parser.phase(),
            Phase::Error(Error::Timeout { received: 3 })
        );
        assert!(!parser.abandon());
    }

    #[test]
    fn test_abandon_keeps_completed_frames() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        feed_all(&mut parser, &encode(0, b"done"));
        assert!(!parser.abandon());
        assert_eq!(parser.phase(), Phase::Done);
    }

    #[test]
    fn test_reset_restarts_checksum() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        feed_all(&mut parser, &[0xFF, 0x55, 0x00, 0x04, 0x01]);
        parser.reset();
        assert!(parser.is_idle());
        assert_eq!(parser.expected_len(), None);
        assert_eq!(feed_all(&mut parser, &encode(0, b"fresh")), Phase::Done);
    }

    #[test]
    fn test_ignores_bytes_while_done() {
        let mut parser = Parser::<MAX_FRAME_SIZE>::new(Capabilities::NONE);
        feed_all(&mut parser, &encode(0, b"held"));
        assert_eq!(parser.feed(0xFF), Phase::Done);
        assert_eq!(parser.payload(), Some(b"held".as_slice()));
    }
}
