use log::{debug, warn};

use crate::hal::{Handler, Sink, Source, Timer};
use crate::Transceiver;

impl<R, W, T, H, const RX: usize, const TX: usize> Transceiver<R, W, T, H, RX, TX>
where
    R: Source,
    W: Sink,
    T: Timer,
    H: Handler,
{
    /// Hands a completed frame to the handler and queues its reply.
    ///
    /// Frames wait while a previous reply is still being transmitted.
    pub(in crate::transceiver) fn dispatch(&mut self) {
        if self.transmitter.is_busy() {
            return;
        }

        let Some(request) = self.parser.payload() else {
            return;
        };

        let Some(response) = self.transmitter.write_slot() else {
            return;
        };

        match self.handler.handle(request, response) {
            None | Some(0) => debug!("Handler did not reply."),
            Some(len) => {
                if let Err(error) = self.transmitter.commit(len) {
                    warn!("Discarding reply: {error}");
                }
            }
        }

        self.parser.reset();
        self.deadline.disarm();
    }
}
