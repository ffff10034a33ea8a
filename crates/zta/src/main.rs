mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zta_core::Console;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    // Shell completions need neither config nor gateway
    if let Command::Completions(args) = command {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "zta", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config()?;
    config::apply_defaults(&mut global, &cfg);

    match command {
        // Config commands don't talk to the gateway
        Command::Config(args) => commands::config_cmd::handle(args, &global, cfg),

        cmd => {
            let console_config = config::resolve_console_config(&global, &cfg)?;
            tracing::debug!(api = %console_config.base_url, "using gateway");
            let console = Console::new(console_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &console, &global).await;
            console.shutdown().await;
            result
        }
    }
}
