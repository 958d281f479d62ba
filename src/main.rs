use clap::Parser;
use movie_actions::cli::commands::{cmd_action, cmd_toggle};
use movie_actions::cli::config::{Cli, Commands, load_config};
use movie_actions::client::request::MovieAction;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    let confirmed = match &cli.command {
        Commands::Delete { movie, behavior } => {
            cmd_action(&cli, &config, MovieAction::Delete, movie, behavior).await?
        }
        Commands::Update { movie, behavior } => {
            cmd_action(&cli, &config, MovieAction::Update, movie, behavior).await?
        }
        Commands::Add { movie, behavior } => {
            cmd_action(&cli, &config, MovieAction::Add, movie, behavior).await?
        }
        Commands::Toggle { element, mode } => {
            cmd_toggle(&cli, &config, element, *mode)?;
            true
        }
    };

    if !confirmed {
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise -v, -vv, -vvv raise the level from `warn`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("movie_actions={}", default_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
