//! Miscellaneous utility types.

pub use hex_slice::HexSlice;

mod hex_slice;
