use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;

use commands::Outcome;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(Outcome::Success) => {}
        Ok(Outcome::Failure) => std::process::exit(1),
        Err(error) => {
            eprintln!("dtk error: {error:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<Outcome> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    // Decoding is offline and needs no configuration.
    if let cli::Commands::Token { action } = &cli.command {
        return commands::token::handle(action, &flags);
    }

    let config = bootstrap::load_config()?;
    bootstrap::warn_unconfigured(&config);

    commands::dispatch(cli.command, &config, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DTK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries the response documents; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
