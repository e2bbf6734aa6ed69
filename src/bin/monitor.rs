use std::time::Duration;

use clap::Parser;
use resource_monitor::{
    actors::monitor::MonitorHandle,
    config::{Config, read_config_file},
    monitor::Monitor,
};
use tracing::{error, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Watch CPU, memory and disk usage and alert on high usage")]
struct Args {
    /// JSON config file (falls back to environment variables)
    #[arg(short, long)]
    file: Option<String>,

    /// Run a single check and exit
    #[arg(long)]
    once: bool,

    /// Seconds between two checks (overrides the configuration)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init(verbose: u8) {
    dotenv::dotenv().ok();

    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // the library and this binary share the `resource_monitor` target
    let filter = filter::Targets::new().with_target("resource_monitor", level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.file {
        Some(file) => read_config_file(file)?,
        None => Config::from_env()?,
    };

    if let Some(interval) = args.interval {
        config.interval = interval;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init(args.verbose);
    trace!("started with args: {args:?}");

    let config = load_config(&args)?;
    let mut monitor = Monitor::from_config(&config);

    let channels = monitor.channels().join(", ");
    if channels.is_empty() {
        warn!("no notification channels configured, alerts will only be logged");
    }

    if args.once {
        info!("starting system resource monitoring (single run, channels: [{channels}])");
        let report = monitor.tick().await?;
        info!(
            "monitoring finished: {} event(s), {} failed notification(s)",
            report.events.len(),
            report.failed_deliveries()
        );
        return Ok(());
    }

    let interval = Duration::from_secs(config.interval.max(1));
    info!("starting system resource monitoring every {interval:?} (channels: [{channels}])");
    let handle = MonitorHandle::spawn(monitor, interval);

    tokio::signal::ctrl_c().await?;
    info!("received interrupt, stopping");

    if let Err(e) = handle.shutdown().await {
        error!("{e}");
    }

    Ok(())
}
