use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shinkan::app::AppContext;
use shinkan::cli::{commands, Cli, Commands};
use shinkan::config::Config;
use shinkan::notify::ConsoleSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let ctx = AppContext::new(config, cli.db, cli.workers).await?;

    match cli.command {
        Commands::Scan => {
            commands::scan(&ctx, &ConsoleSink).await?;
        }
        Commands::Ack { id } => {
            commands::ack(&ctx, id)?;
        }
        Commands::List { chapters } => {
            if chapters {
                commands::list_chapters(&ctx)?;
            } else {
                commands::list_works(&ctx)?;
            }
        }
        Commands::Seed => {
            commands::seed(&ctx).await?;
        }
    }

    Ok(())
}
