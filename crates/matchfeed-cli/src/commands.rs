use anyhow::Result;
use matchfeed_runtime::{Config, resolve_data_dir};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands, LocationCommand, StatusCommand};
use crate::handlers;

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(&cli);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Replay {
            pages,
            swipes,
            batch_size,
        } => {
            let mut config = Config::load_in(&data_dir)?;
            if let Some(batch_size) = batch_size {
                config.feed.batch_size = batch_size;
            }
            handlers::replay::handle(&config, &pages, &swipes, cli.format)
        }

        Commands::Location { command } => match command {
            LocationCommand::Show => handlers::location::show(&data_dir, cli.format),
            LocationCommand::Set {
                country,
                country_name,
                city,
                district,
            } => handlers::location::set(
                &data_dir,
                country,
                country_name,
                city,
                district,
                cli.format,
            ),
            LocationCommand::Clear => handlers::location::clear(&data_dir, cli.format),
        },

        Commands::Status { command } => match command {
            StatusCommand::List => handlers::status::list(cli.format),
        },
    }
}

/// Logs go to stderr so `--format json` output stays parseable.
/// `RUST_LOG` wins over `--log-level` when set.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
