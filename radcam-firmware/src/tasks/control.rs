//! Control loop
//!
//! The single owner of the gimbal state. Each iteration:
//!
//! 1. advances servo motion
//! 2. waits briefly for bytes from the bridge
//! 3. routes a completed request, saves targets if they changed, and
//!    writes the response
//!
//! After a response the loop waits a fixed settle time and then throws
//! away whatever the bridge echoed back before accepting the next request.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration, Instant, Timer};
use embedded_io_async::{Error as _, Read, Write};

use radcam_core::config::AxisTargets;
use radcam_core::router::{Dispatch, Reply};
use radcam_core::traits::ServoOutput;
use radcam_core::{Axis, Gimbal, Receive};
use radcam_hal::FlashStorage;
use radcam_protocol::Response;

use crate::config::save_targets;
use crate::page;

/// Settle time after a plain-text response
pub const TEXT_SETTLE_MS: u64 = 100;

/// Settle time after the control page
pub const PAGE_SETTLE_MS: u64 = 200;

/// Most echoed bytes discarded after a response
pub const MAX_ECHO_DISCARD: usize = 512;

/// Longest wait for bridge bytes before the next motion update
const POLL_INTERVAL_MS: u64 = 5;

/// Wait for further echo bytes once the settle time has passed
const ECHO_READ_TIMEOUT_MS: u64 = 2;

/// Receive chunk size
const RX_CHUNK_SIZE: usize = 64;

/// Everything the loop owns
pub struct ControlLoop<S, T, R, F> {
    pub gimbal: Gimbal,
    pub servos: S,
    pub tx: T,
    pub rx: R,
    pub storage: F,
}

impl<S, T, R, F> ControlLoop<S, T, R, F>
where
    S: ServoOutput,
    T: Write,
    R: Read,
    F: FlashStorage,
{
    /// Run forever
    pub async fn run(mut self) -> ! {
        info!("Control loop started");

        let start = Instant::now();
        let mut saved = self.gimbal.targets();
        let mut buf = [0u8; RX_CHUNK_SIZE];

        let report = self.gimbal.prime(start.elapsed().as_millis(), &mut self.servos);
        if report.failed > 0 {
            warn!("{} servo(s) failed to prime", report.failed);
        }

        loop {
            let report = self.gimbal.tick(start.elapsed().as_millis(), &mut self.servos);
            if report.failed > 0 {
                warn!("{} servo write(s) failed", report.failed);
            }

            let read = select(
                self.rx.read(&mut buf),
                Timer::after(Duration::from_millis(POLL_INTERVAL_MS)),
            )
            .await;

            match read {
                Either::First(Ok(n)) if n > 0 => {
                    trace!("RX: {} bytes", n);
                    if let Receive::Handled(dispatch) = self.receive(&buf[..n]) {
                        self.complete(dispatch, &mut saved).await;
                    }
                }
                Either::First(Ok(_)) => {}
                Either::First(Err(e)) => {
                    warn!("UART read error: {:?}", Debug2Format(&e.kind()));
                }
                Either::Second(()) => {}
            }
        }
    }

    fn receive(&mut self, bytes: &[u8]) -> Receive {
        let outcome = self.gimbal.receive(bytes);
        if let Receive::Dropped(e) = outcome {
            warn!("Dropped request: {:?}", e);
        }
        outcome
    }

    /// Persist and answer a routed request
    async fn complete(&mut self, dispatch: Dispatch, saved: &mut AxisTargets) {
        if let Some(rejection) = dispatch.rejected {
            debug!("Request ignored: {:?}", rejection);
        }

        if dispatch.persist {
            let targets = self.gimbal.targets();
            info!(
                "Targets: tilt={} zoom={} focus={} yaw={}",
                targets.get(Axis::Tilt),
                targets.get(Axis::Zoom),
                targets.get(Axis::Focus),
                targets.get(Axis::Yaw)
            );
            if targets.targets != saved.targets {
                match save_targets(&mut self.storage, &targets).await {
                    Ok(()) => *saved = targets,
                    Err(e) => warn!("Failed to save targets: {:?}", e),
                }
            }
        }

        match dispatch.reply {
            Some(reply) => self.respond(reply).await,
            None => self.gimbal.discard_pending(),
        }
    }

    /// Write a response, wait for the echo, then discard it
    async fn respond(&mut self, reply: Reply) {
        debug!("Reply: {:?}", reply);

        let (result, settle_ms) = match reply.text_body() {
            Some(body) => (
                write_response(&mut self.tx, &Response::text(&body)).await,
                TEXT_SETTLE_MS,
            ),
            None => match page::render(&self.gimbal) {
                Ok(html) => (
                    write_response(&mut self.tx, &Response::html(&html)).await,
                    PAGE_SETTLE_MS,
                ),
                Err(_) => {
                    error!("Control page exceeds {} bytes", page::PAGE_CAPACITY);
                    (Ok(()), 0)
                }
            },
        };

        if let Err(e) = result {
            warn!("UART write error: {:?}", Debug2Format(&e.kind()));
        }

        Timer::after(Duration::from_millis(settle_ms)).await;
        let discarded = discard_echo(&mut self.rx, MAX_ECHO_DISCARD).await;
        if discarded > 0 {
            trace!("Discarded {} echoed bytes", discarded);
        }
        self.gimbal.discard_pending();
    }
}

/// Write the header block and body
async fn write_response<T: Write>(tx: &mut T, response: &Response<'_>) -> Result<(), T::Error> {
    tx.write_all(response.head().as_bytes()).await?;
    tx.write_all(response.body.as_bytes()).await?;
    tx.flush().await
}

/// Read and drop pending bytes, up to `limit`
///
/// Stops as soon as the line has been quiet for a short while.
pub async fn discard_echo<R: Read>(rx: &mut R, limit: usize) -> usize {
    let mut buf = [0u8; RX_CHUNK_SIZE];
    let mut discarded = 0;

    while discarded < limit {
        let want = (limit - discarded).min(buf.len());
        let read = with_timeout(
            Duration::from_millis(ECHO_READ_TIMEOUT_MS),
            rx.read(&mut buf[..want]),
        )
        .await;
        match read {
            Ok(Ok(n)) if n > 0 => discarded += n,
            _ => break,
        }
    }

    discarded
}
