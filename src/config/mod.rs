//! Configuration: CLI surface and the validated run configuration

mod cli;

pub use cli::CliArgs;

use std::net::SocketAddr;
use std::time::Duration;

use crate::utils::{BenchmarkError, Result};

/// Validated configuration consumed by the core
///
/// Constructed only from arguments that passed validation; the core
/// never sees a zero worker count, duration, or datagram size.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Destination endpoint for every datagram
    pub target: SocketAddr,
    /// Number of concurrent send loops
    pub workers: u32,
    /// Run time budget
    pub duration: Duration,
    /// Payload size of each datagram in bytes
    pub datagram_size: usize,
}

impl RunConfig {
    /// Build the validated config from parsed CLI arguments
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        args.validate().map_err(BenchmarkError::Config)?;

        Ok(Self {
            target: SocketAddr::new(args.ip, args.port),
            workers: args.threads,
            duration: Duration::from_secs(args.duration_secs),
            datagram_size: args.datagram_size,
        })
    }
}
