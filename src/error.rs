use core::fmt::{Display, Formatter};

/// Errors raised while receiving or sending frames.
///
/// Receive-side errors are latched by the parser and recovered at the next
/// timeout boundary. Only the send-side variants are ever returned to the
/// caller.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A sync byte did not match the expected preamble.
    Header(u8),
    /// The declared frame length exceeds the receive buffer.
    Size {
        /// Frame size announced by the length byte.
        size: usize,
        /// Capacity of the receive buffer.
        capacity: usize,
    },
    /// The checksum residue over the frame was not zero.
    Crc(u16),
    /// The frame repeated the last accepted sequence id.
    DuplicateId(u8),
    /// A byte arrived with the receive buffer already full.
    BufferOverrun,
    /// A partial frame was abandoned after the timeout budget elapsed.
    Timeout {
        /// Bytes of the frame received before the line went quiet.
        received: usize,
    },
    /// A frame is still being transmitted.
    Busy,
    /// The payload is empty or exceeds the send limits.
    InvalidLength {
        /// Requested payload length.
        size: usize,
        /// Largest payload the transmit buffer can frame.
        max: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Header(byte) => write!(f, "Invalid header byte: {byte:#04X}"),
            Self::Size { size, capacity } => write!(
                f,
                "Frame too large. Declared {size} bytes, but buffer holds {capacity} bytes."
            ),
            Self::Crc(residue) => write!(f, "CRC mismatch. Residue: {residue:#06X}"),
            Self::DuplicateId(id) => write!(f, "Duplicate sequence id: {id}"),
            Self::BufferOverrun => write!(f, "Receive buffer overrun."),
            Self::Timeout { received } => {
                write!(f, "Frame timed out after {received} bytes.")
            }
            Self::Busy => write!(f, "Transmitter is busy."),
            Self::InvalidLength { size, max } => {
                write!(f, "Invalid payload length: {size} (expected 1..={max})")
            }
        }
    }
}

impl core::error::Error for Error {}
