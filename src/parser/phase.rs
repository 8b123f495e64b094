use core::fmt::{Display, Formatter};

use crate::error::Error;

/// Position of the receive state machine within a frame.
///
/// Each phase names the byte the parser expects next.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Phase {
    /// Idle, waiting for the first sync byte.
    #[default]
    Sync0,
    /// Waiting for the second sync byte of a data frame.
    Sync1,
    /// Waiting for the second byte of a resend request.
    ResendSync1,
    /// Waiting for the sequence id.
    Id,
    /// Waiting for the length byte.
    Length,
    /// Receiving payload bytes.
    Payload,
    /// Waiting for the low checksum byte.
    CrcLow,
    /// Waiting for the high checksum byte, which completes the frame.
    CrcHigh,
    /// A valid data frame awaits dispatch.
    Done,
    /// The peer asked for the last frame to be sent again.
    ResendRequested,
    /// The frame is broken. Further bytes are discarded until the next timeout.
    Error(Error),
}

impl Phase {
    /// Returns whether the current frame has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::ResendRequested | Self::Error(_))
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Sync0 => write!(f, "SYNC0"),
            Self::Sync1 => write!(f, "SYNC1"),
            Self::ResendSync1 => write!(f, "RESEND1"),
            Self::Id => write!(f, "ID"),
            Self::Length => write!(f, "LENGTH"),
            Self::Payload => write!(f, "PAYLOAD"),
            Self::CrcLow => write!(f, "CRC_LOW"),
            Self::CrcHigh => write!(f, "CRC_HIGH"),
            Self::Done => write!(f, "DONE"),
            Self::ResendRequested => write!(f, "RESEND_REQUESTED"),
            Self::Error(error) => write!(f, "ERROR({error})"),
        }
    }
}
