use anyhow::Result;
use bizledger::cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run().await
}

/// `RUST_LOG` wins when set; otherwise warnings only, or debug output for this
/// crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,bizledger=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
