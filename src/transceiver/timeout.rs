use log::{debug, warn};

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
    /// Resolves the current frame once the line has been quiet for the timeout budget.
    pub(in crate::transceiver) fn expire(&mut self) {
        self.parser.abandon();

        match self.parser.phase() {
            Phase::ResendRequested => {
                if !self.transmitter.resend() {
                    debug!("No frame to resend.");
                }
            }
            Phase::Error(error) => {
                warn!("Discarding frame: {error}");
                self.error_count = self.error_count.wrapping_add(1);
                self.last_error = Some(error);

                if self.config.capabilities().resend && !self.transmitter.request_resend() {
                    debug!("Transmitter busy. Not requesting a resend.");
                }
            }
            Phase::Done => warn!("Dropping frame that was not dispatched in time."),
            _ => (),
        }

        self.parser.reset();
        self.deadline.disarm();
    }
}
