//! Final run report and its formatting

use std::time::Duration;

/// Result of one benchmark run
///
/// Built from the counters only after the worker join barrier, so the
/// values are final.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Total payload bytes transferred by successful sends
    pub bytes_sent: u64,
    /// Sends that did not complete synchronously at issue time
    pub async_completions: u64,
    /// Wall-clock time between dispatch and the join barrier
    pub elapsed: Duration,
}

impl RunReport {
    /// Achieved throughput in MiB per second
    ///
    /// Always finite and non-negative; a zero-length run reports 0.0.
    pub fn throughput_mib_s(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        (self.bytes_sent as f64 / 1024.0 / 1024.0) / secs
    }

    /// Print the post-run summary to stdout
    pub fn print_summary(&self) {
        println!("MiB/s: {:.3}", self.throughput_mib_s());
        println!(
            "I/O operations that completed async: {}",
            self.async_completions
        );
    }
}
