//! udp-send-benchmark - UDP send throughput measurement tool

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use udp_send_benchmark::benchmark::Orchestrator;
use udp_send_benchmark::config::{CliArgs, RunConfig};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &RunConfig, quiet: bool) {
    if quiet {
        return;
    }

    println!("udp-send-benchmark v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Target:   {}", config.target);
    println!("Workers:  {}", config.workers);
    println!("Duration: {}s", config.duration.as_secs());
    println!("Datagram: {} bytes", config.datagram_size);
    println!();
}

fn main() -> Result<()> {
    let args = CliArgs::parse_args();
    setup_logging(args.verbose, args.quiet);

    let config = RunConfig::from_args(&args).context("invalid arguments")?;
    print_banner(&config, args.quiet);

    let orchestrator = Orchestrator::new(config);

    // Convert Ctrl-C into the shared cancellation so the run stops
    // early but the accumulated counters still get reported.
    let cancel = orchestrator.cancel_token();
    ctrlc::set_handler(move || {
        if cancel.cancel() {
            info!("interrupt received, stopping run");
        }
    })
    .context("failed to install interrupt handler")?;

    let report = orchestrator.run();
    report.print_summary();

    Ok(())
}
