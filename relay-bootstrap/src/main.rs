use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "deathlog-relay")]
#[command(about = "Relays death logs from a Discord log channel to the collector API", long_about = None)]
struct Args {
    /// Path to config file (overrides DEATHLOG_CONFIG)
    #[arg(short, long)]
    config: Option<String>,

    /// Emit one JSON object per log line
    #[arg(long)]
    json_logs: bool,

    /// Default filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    if let Some(config) = args.config {
        std::env::set_var("DEATHLOG_CONFIG", config);
    }

    relay_bootstrap::run_standalone().await
}
