//! Talk to a peer over a serial port.
//!
//! Without `--send`, every received payload is logged and echoed back.
//! With `--send`, one payload is sent and the tool waits for the reply.

use std::process::ExitCode;
use std::thread::sleep;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};
use sericon::serial_port::{open, Port, SystemClock};
use sericon::{Capabilities, Config, Handler, HexSlice, Transceiver};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Parser)]
struct Args {
    #[arg(index = 1, help = "Path to the serial port")]
    tty: String,
    #[arg(long, short, default_value_t = 115_200)]
    baud: u32,
    #[arg(long, short, default_value_t = 50, help = "Inter-byte timeout in ms")]
    timeout: u32,
    #[arg(long, help = "Stamp frames with sequence ids and drop repeats")]
    ids: bool,
    #[arg(long, help = "Request and honor resends")]
    resend: bool,
    #[arg(long, short, help = "Hex payload to send")]
    send: Option<String>,
    #[arg(long, short, default_value_t = 1000, help = "Time to wait for a reply in ms")]
    wait: u64,
}

/// Logs received payloads and optionally echoes them.
#[derive(Debug)]
struct Console {
    echo: bool,
    received: usize,
}

impl Handler for Console {
    fn handle(&mut self, request: &[u8], response: &mut [u8]) -> Option<usize> {
        info!("Received: {:#04X}", HexSlice::new(request));
        self.received += 1;

        if !self.echo {
            return None;
        }

        let len = request.len().min(response.len());
        response[..len].copy_from_slice(&request[..len]);
        Some(len)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let payload = match args.send.as_deref().map(decode_hex).transpose() {
        Ok(payload) => payload,
        Err(error) => {
            error!("Invalid hex payload: {error}");
            return ExitCode::FAILURE;
        }
    };

    let writer = match open(args.tty.as_str(), args.baud) {
        Ok(serial_port) => serial_port,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let reader = match writer.try_clone_native() {
        Ok(serial_port) => serial_port,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let capabilities = Capabilities {
        id_filtering: args.ids,
        resend: args.resend,
    };
    let mut transceiver: Transceiver<_, _, _, _> = Transceiver::new(
        Config::new(capabilities, args.timeout),
        Port::new(reader),
        Port::new(writer),
        SystemClock::new(),
        Console {
            echo: payload.is_none(),
            received: 0,
        },
    );

    let Some(payload) = payload else {
        info!("Echoing on {}.", args.tty);

        loop {
            transceiver.tick();
            sleep(POLL_INTERVAL);
        }
    };

    if let Err(error) = transceiver.send(&payload) {
        error!("{error}");
        return ExitCode::FAILURE;
    }

    info!("Sent: {:#04X}", HexSlice::new(&payload));
    let wait = Duration::from_millis(args.wait);
    let start = Instant::now();

    while transceiver.handler().received == 0 {
        if start.elapsed() > wait {
            warn!(
                "No reply within {wait:?}. {} frames discarded.",
                transceiver.error_count()
            );
            return ExitCode::FAILURE;
        }

        transceiver.tick();
        sleep(POLL_INTERVAL);
    }

    ExitCode::SUCCESS
}

fn decode_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(text.split_whitespace().collect::<String>())
}
