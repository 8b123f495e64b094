//! Wire layout of frames.
//!
//! ```text
//! ┌───────┬───────┬────┬─────────┬──────────────┬───────┬───────┐
//! │ SYNC0 │ SYNC1 │ ID │ LEN - 1 │ PAYLOAD      │ CRClo │ CRChi │
//! │ 0xFF  │ 0x55  │ 1B │ 1B      │ 1..=256 B    │ 1B    │ 1B    │
//! └───────┴───────┴────┴─────────┴──────────────┴───────┴───────┘
//! ```
//!
//! The checksum covers every byte before it, sync bytes included.
//! A resend request is the bare two-byte control frame `0x00 0xAA`.

/// First sync byte of a data frame.
pub const SYNC0: u8 = 0xFF;
/// Second sync byte of a data frame.
pub const SYNC1: u8 = 0x55;
/// First byte of a resend request.
pub const RESEND0: u8 = 0x00;
/// Second byte of a resend request.
pub const RESEND1: u8 = 0xAA;
/// The complete resend request control frame.
pub const RESEND_REQUEST: [u8; 2] = [RESEND0, RESEND1];

/// Offset of the sequence id.
pub const ID_OFFSET: usize = 2;
/// Offset of the length byte.
pub const LENGTH_OFFSET: usize = 3;
/// Sync bytes, id and length.
pub const HEADER_SIZE: usize = 4;
/// Trailing checksum bytes.
pub const CRC_SIZE: usize = 2;
/// Bytes a frame adds around its payload.
pub const OVERHEAD: usize = HEADER_SIZE + CRC_SIZE;

/// Smallest payload a frame can carry.
pub const MIN_PAYLOAD_SIZE: usize = 1;
/// Largest payload a frame can carry, limited by the length byte.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize + 1;
/// Size of a frame carrying a single payload byte.
pub const MIN_FRAME_SIZE: usize = MIN_PAYLOAD_SIZE + OVERHEAD;
/// Size of a frame carrying the largest payload.
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + OVERHEAD;

/// Returns the wire size of a frame carrying `payload_len` bytes.
#[must_use]
pub const fn frame_size(payload_len: usize) -> usize {
    payload_len + OVERHEAD
}

/// Returns the largest payload that fits into a buffer of `capacity` bytes.
#[must_use]
pub const fn max_payload(capacity: usize) -> usize {
    let fits = capacity.saturating_sub(OVERHEAD);

    if fits < MAX_PAYLOAD_SIZE {
        fits
    } else {
        MAX_PAYLOAD_SIZE
    }
}
