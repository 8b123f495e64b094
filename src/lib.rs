//! Point-to-point framing for byte-oriented serial links.
//!
//! This library turns a raw, error-prone byte stream into discrete,
//! CRC-checked messages and frames outgoing messages for transmission.
//! It is meant for interrupt or superloop driven targets: no threads, no heap
//! and no blocking I/O. The whole protocol runs inside repeated calls to
//! [`Transceiver::tick`].
//!
//! # Wire format
//!
//! ```text
//! 0xFF 0x55 ID LEN-1 PAYLOAD[1..=256] CRClo CRChi
//! ```
//!
//! The checksum is CRC-16/MCRF4XX over all preceding bytes. With the resend
//! protocol enabled, a receiver that discarded a frame answers with the
//! control frame `0x00 0xAA`, upon which the peer sends its last frame again.
//!
//! # Features
//!
//! * `std`: adapters to run the transceiver on a serial port of the host.
//! * `cli`: the `sericon` command line tool.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub use config::{Capabilities, Config, DEFAULT_TIMEOUT};
pub use crc16::{checksum, Checksum, CRC};
pub use deadline::{Countdown, Deadline};
pub use error::Error;
pub use frame::{MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, MIN_PAYLOAD_SIZE};
pub use hal::{Handler, Sink, Source, Timer};
pub use parser::{Parser, Phase};
pub use tick::Tick;
pub use transceiver::Transceiver;
pub use transmitter::Transmitter;
pub use utils::HexSlice;

mod config;
mod crc16;
mod deadline;
mod error;
pub mod frame;
mod hal;
mod parser;
#[cfg(feature = "std")]
pub mod serial_port;
#[cfg(test)]
mod testing;
mod tick;
mod transceiver;
mod transmitter;
mod utils;
