//! Long-running mode.
//!
//! A single task owns the controller. Camera scans are driven by a timer;
//! control commands arrive over a bounded channel, each carrying a oneshot
//! for its reply. Nothing else touches the controller, so no locking is
//! needed around it.

use std::time::Duration;

use catpoint_image::ImageClassifier;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::cli::Command;
use crate::cli::StatusReport;
use crate::security::SecurityController;
use crate::security::SecurityError;
use crate::security::SecurityRepository;

/// Capacity for the stdin→controller request channel
pub const REQUEST_CHANNEL_SIZE: usize = 64;

pub type RequestSender = mpsc::Sender<Request>;
pub type RequestReceiver = mpsc::Receiver<Request>;

/// A command waiting to be applied, with somewhere to send the outcome
#[derive(Debug)]
pub struct Request {
    pub command: Command,
    pub reply: oneshot::Sender<Result<StatusReport, SecurityError>>,
}

impl Request {
    pub fn new(command: Command) -> (Self, oneshot::Receiver<Result<StatusReport, SecurityError>>) {
        let (reply, rx) = oneshot::channel();
        (Self { command, reply }, rx)
    }
}

/// Run the controller until `shutdown_rx` fires.
///
/// Scans the camera every `scan_interval` (the first scan happens
/// immediately) and applies requests as they arrive. The request channel
/// closing does not stop scanning. Returns the controller so callers can
/// inspect its final state.
pub async fn serve<R, C>(
    mut controller: SecurityController<R, C>,
    scan_interval: Duration,
    mut requests: RequestReceiver,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> SecurityController<R, C>
where
    R: SecurityRepository,
    C: ImageClassifier,
{
    info!("Scan loop starting (interval {:?})", scan_interval);

    let mut ticker = tokio::time::interval(scan_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut requests_open = true;

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown_rx => {
                info!("Scan loop shutting down");
                break;
            }
            request = requests.recv(), if requests_open => match request {
                Some(Request { command, reply }) => {
                    debug!("Applying {:?}", command);
                    let result = command.execute(&mut controller);
                    if let Err(e) = &result {
                        warn!("Command {:?} failed: {}", command, e);
                    }
                    // The requester may have gone away; nothing to do then.
                    let _ = reply.send(result);
                }
                None => {
                    debug!("Request channel closed, continuing with scans only");
                    requests_open = false;
                }
            },
            _ = ticker.tick() => {
                if let Err(e) = controller.process_image() {
                    warn!("Image scan failed: {}", e);
                }
            }
        }
    }

    controller
}

/// Read control commands from stdin, one per line, and forward them to the
/// scan loop. Replies are printed to stdout, parse errors to stderr.
///
/// Blocks the calling thread; run it on a dedicated `std::thread`, not on the
/// runtime.
pub fn forward_stdin_requests(tx: RequestSender) {
    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read from stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let (request, reply_rx) = Request::new(command);
        if tx.blocking_send(request).is_err() {
            break;
        }

        match reply_rx.blocking_recv() {
            Ok(Ok(report)) => println!("{}", report),
            Ok(Err(e)) => eprintln!("error: {}", e),
            Err(_) => break,
        }
    }

    debug!("stdin reader exiting");
}
