use crate::deadline::Countdown;
use crate::hal::{Handler, Sink, Source, Timer};
use crate::parser::Phase;
use crate::Transceiver;

impl<R, W, T, H, const RX: usize, const TX: usize> Transceiver<R, W, T, H, RX, TX>
where
    R: Source,
    W: Sink,
    T: Timer,
    H: Handler,
{
    /// Feeds available bytes to the parser.
    ///
    /// Polling continues while idle or while a deadline is armed. It stops
    /// once the source runs dry, charging the idle time against the deadline.
    /// A frame awaiting dispatch pauses reading but keeps the deadline running.
    pub(in crate::transceiver) fn receive(&mut self) {
        while self.parser.is_idle() || self.deadline.is_armed() {
            let now = self.timer.now();
            let byte = if self.parser.phase() == Phase::Done {
                None
            } else {
                self.source.read()
            };

            if let Some(byte) = byte {
                self.deadline.arm(self.config.timeout(), now);
                self.parser.feed(byte);
            } else {
                if self.deadline.sample(now) == Countdown::Expired {
                    self.expire();
                }

                break;
            }
        }
    }
}
