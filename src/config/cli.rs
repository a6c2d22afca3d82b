//! Command-line argument parsing

use clap::Parser;
use std::net::IpAddr;

/// UDP send throughput benchmark
#[derive(Parser, Debug, Clone)]
#[command(name = "udp-send-benchmark")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Destination =====
    /// Destination IP address
    #[arg(long = "ip")]
    pub ip: IpAddr,

    /// Destination UDP port
    #[arg(long = "port")]
    pub port: u16,

    // ===== Benchmark Parameters =====
    /// Number of concurrent send workers
    #[arg(long = "t", default_value_t = 1)]
    pub threads: u32,

    /// Run duration in seconds
    #[arg(long = "duration", default_value_t = 5)]
    pub duration_secs: u64,

    /// Datagram payload size in bytes
    #[arg(long = "dgram-size", default_value_t = 1000)]
    pub datagram_size: usize,

    // ===== Output Options =====
    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse CLI arguments from the command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument values beyond what the types enforce
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("--t must be at least 1".to_string());
        }

        if self.duration_secs == 0 {
            return Err("--duration must be at least 1 second".to_string());
        }

        if self.datagram_size == 0 {
            return Err("--dgram-size must be at least 1 byte".to_string());
        }

        Ok(())
    }
}
