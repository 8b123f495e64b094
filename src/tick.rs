use core::fmt::{Debug, Display};

/// A fixed-width, wrapping tick count as returned by a [`Timer`](crate::Timer).
///
/// The unit is up to the timer, e.g. 16 bit milliseconds or 32 bit microseconds.
pub trait Tick: Copy + Debug + Display + Ord + From<u16> {
    /// The empty budget.
    const ZERO: Self;

    /// Returns the ticks elapsed from `earlier` to `self`, correcting for one wraparound.
    #[must_use]
    fn elapsed_since(self, earlier: Self) -> Self;

    /// Returns `self - rhs`, saturating at zero.
    #[must_use]
    fn saturating_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_tick {
    ($($type:ty),+) => {
        $(
            impl Tick for $type {
                const ZERO: Self = 0;

                fn elapsed_since(self, earlier: Self) -> Self {
                    self.wrapping_sub(earlier)
                }

                fn saturating_sub(self, rhs: Self) -> Self {
                    <$type>::saturating_sub(self, rhs)
                }
            }
        )+
    };
}

impl_tick!(u16, u32, u64, usize);
