//! Run orchestration
//!
//! Owns the validated config and the shared state, starts the duration
//! timer, dispatches the send loops, and assembles the final report only
//! after every worker has stopped writing to the counters.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::cancel::CancelToken;
use super::counters::SendCounters;
use super::payload::make_message;
use super::sender::PacketSender;
use crate::config::RunConfig;
use crate::metrics::reporter::RunReport;

/// Sleep granularity of the duration timer; bounds how long the timer
/// thread outlives a run that was cancelled by another trigger.
const TIMER_SLICE: Duration = Duration::from_millis(50);

pub struct Orchestrator {
    config: RunConfig,
    counters: Arc<SendCounters>,
    cancel: Arc<CancelToken>,
}

impl Orchestrator {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            counters: Arc::new(SendCounters::new()),
            cancel: Arc::new(CancelToken::new()),
        }
    }

    /// Shared cancellation token, for wiring external triggers (SIGINT)
    pub fn cancel_token(&self) -> Arc<CancelToken> {
        Arc::clone(&self.cancel)
    }

    /// Execute the run and return the final report.
    ///
    /// Returns only after every send loop has observed cancellation and
    /// exited. Transport errors never surface here; they arrive as an
    /// early cancellation, and the report carries whatever the counters
    /// accumulated before the error.
    pub fn run(&self) -> RunReport {
        let message = make_message(self.config.datagram_size);
        let sender = PacketSender::new(
            message,
            self.config.target,
            Arc::clone(&self.counters),
            Arc::clone(&self.cancel),
        );

        info!(
            "sending {}-byte datagrams to {} from {} worker(s) for {:?}",
            self.config.datagram_size, self.config.target, self.config.workers, self.config.duration
        );

        let timer = Self::spawn_timer(Arc::clone(&self.cancel), self.config.duration);
        let start = Instant::now();

        if self.config.workers == 1 {
            sender.send_single_threaded();
        } else {
            sender.send_with_workers(self.config.workers);
        }

        let elapsed = start.elapsed();

        // Release the timer early when the run ended for another reason.
        self.cancel.cancel();
        timer.join().expect("timer thread panicked");

        RunReport {
            bytes_sent: self.counters.bytes_sent(),
            async_completions: self.counters.async_completions(),
            elapsed,
        }
    }

    /// Timer trigger: cancels the token once the run duration elapses.
    ///
    /// Sleeps in bounded slices and exits early if something else
    /// cancelled first, so it never pins the process past the run.
    fn spawn_timer(cancel: Arc<CancelToken>, duration: Duration) -> JoinHandle<()> {
        thread::Builder::new()
            .name("run-timer".to_string())
            .spawn(move || {
                let deadline = Instant::now() + duration;
                loop {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    thread::sleep(remaining.min(TIMER_SLICE));
                }
                if cancel.cancel() {
                    debug!("run duration elapsed");
                }
            })
            .expect("failed to spawn timer thread")
    }
}
