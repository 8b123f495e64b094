//! CRC-16 checksum shared by both directions of the link.
//!
//! The algorithm is the reflected CCITT polynomial (`0x8408`) seeded with
//! `0xFFFF` and without a final XOR, known as `CRC-16/MCRF4XX`.
//! Because there is no final XOR, folding a frame *including* its trailing
//! checksum (low byte first) leaves a residue of zero. The receiver uses that
//! residue as its validity test instead of comparing two values.

use core::fmt::{self, Debug, Formatter};
use core::mem::replace;

use crc::{Crc, Digest, CRC_16_MCRF4XX};

/// CRC-16/MCRF4XX checksum function.
///
/// The 256-entry lookup table is computed at compile time.
pub static CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Calculates the checksum of a whole buffer.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u16 {
    CRC.checksum(bytes)
}

/// A running checksum that is fed one byte at a time.
pub struct Checksum {
    digest: Digest<'static, u16>,
}

impl Checksum {
    /// Creates a checksum at its initial value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            digest: CRC.digest(),
        }
    }

    /// Folds one byte into the checksum.
    pub fn update(&mut self, byte: u8) {
        self.digest.update(&[byte]);
    }

    /// Returns the checksum of all folded bytes and starts over.
    pub fn finish(&mut self) -> u16 {
        replace(&mut self.digest, CRC.digest()).finalize()
    }

    /// Restarts the checksum at its initial value.
    pub fn reset(&mut self) {
        self.digest = CRC.digest();
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Checksum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checksum").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{checksum, Checksum};

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0x6F91);
    }

    #[test]
    fn test_empty_is_initial_value() {
        assert_eq!(checksum(&[]), 0xFFFF);
        assert_eq!(Checksum::new().finish(), 0xFFFF);
    }

    #[test]
    fn test_incremental_matches_whole_buffer() {
        let mut running = Checksum::new();

        for &byte in b"123456789" {
            running.update(byte);
        }

        assert_eq!(running.finish(), checksum(b"123456789"));
        assert_eq!(running.finish(), 0xFFFF);
    }

    #[test]
    fn test_residue_is_zero_with_appended_checksum() {
        let data = [0xFF, 0x55, 0x00, 0x01, 0x41, 0x42];
        let [low, high] = checksum(&data).to_le_bytes();
        let mut running = Checksum::new();

        for byte in data.into_iter().chain([low, high]) {
            running.update(byte);
        }

        assert_eq!(running.finish(), 0);
    }

    #[test]
    fn test_residue_is_non_zero_on_corruption() {
        let data = [0xFF, 0x55, 0x00, 0x01, 0x41, 0x42];
        let [low, high] = checksum(&data).to_le_bytes();
        let mut running = Checksum::new();

        for byte in data.into_iter().chain([low ^ 0x01, high]) {
            running.update(byte);
        }

        assert_ne!(running.finish(), 0);
    }
}
