//! Test doubles for the collaborators.

use std::collections::VecDeque;

use crate::crc16::checksum;
use crate::hal::{Handler, Sink, Source, Timer};

/// Builds the wire bytes of a frame independently of the transmitter.
pub fn encode(id: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0xFF, 0x55, id, (payload.len() - 1) as u8];
    frame.extend_from_slice(payload);
    let crc = checksum(&frame);
    frame.extend_from_slice(&crc.to_le_bytes());
    frame
}

/// Bytes waiting on the line.
#[derive(Debug, Default)]
pub struct Wire {
    pub bytes: VecDeque<u8>,
}

impl Wire {
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes);
    }
}

impl Source for Wire {
    fn read(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

/// Records written bytes, optionally refusing them after a budget is used up.
#[derive(Debug, Default)]
pub struct Capture {
    pub bytes: Vec<u8>,
    pub budget: Option<usize>,
}

impl Capture {
    pub fn with_budget(budget: usize) -> Self {
        Self {
            bytes: Vec::new(),
            budget: Some(budget),
        }
    }

    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

impl Sink for Capture {
    fn write(&mut self, byte: u8) -> bool {
        match &mut self.budget {
            Some(0) => false,
            Some(budget) => {
                *budget -= 1;
                self.bytes.push(byte);
                true
            }
            None => {
                self.bytes.push(byte);
                true
            }
        }
    }
}

/// A 16 bit clock that only moves when told to.
#[derive(Debug, Default)]
pub struct Clock {
    pub now: u16,
}

impl Clock {
    pub fn advance(&mut self, ticks: u16) {
        self.now = self.now.wrapping_add(ticks);
    }
}

impl Timer for Clock {
    type Tick = u16;

    fn now(&mut self) -> u16 {
        self.now
    }
}

/// Records every request and answers with a fixed reply, if any.
#[derive(Debug, Default)]
pub struct Recorder {
    pub requests: Vec<Vec<u8>>,
    pub reply: Option<Vec<u8>>,
}

impl Recorder {
    pub fn replying(reply: &[u8]) -> Self {
        Self {
            requests: Vec::new(),
            reply: Some(reply.to_vec()),
        }
    }
}

impl Handler for Recorder {
    fn handle(&mut self, request: &[u8], response: &mut [u8]) -> Option<usize> {
        self.requests.push(request.to_vec());
        let reply = self.reply.as_ref()?;
        response[..reply.len()].copy_from_slice(reply);
        Some(reply.len())
    }
}
