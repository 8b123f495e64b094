use core::fmt::{Formatter, LowerHex, Result, UpperHex};

/// Formats a byte slice as a list of hexadecimal numbers.
///
/// The format flags, e.g. `{:#04X}`, apply to every byte.
#[derive(Clone, Copy, Debug)]
pub struct HexSlice<'a>(&'a [u8]);

impl<'a> HexSlice<'a> {
    /// Wraps a slice of bytes.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    fn fmt_with(
        &self,
        f: &mut Formatter<'_>,
        fmt_byte: fn(&u8, &mut Formatter<'_>) -> Result,
    ) -> Result {
        f.write_str("[")?;

        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }

            fmt_byte(byte, f)?;
        }

        f.write_str("]")
    }
}

impl UpperHex for HexSlice<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.fmt_with(f, UpperHex::fmt)
    }
}

impl LowerHex for HexSlice<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.fmt_with(f, LowerHex::fmt)
    }
}
