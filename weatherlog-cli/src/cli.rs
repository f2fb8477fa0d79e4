use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use std::path::PathBuf;

use weatherlog_core::{
    Config, RecordCursor, ViewMode, WeatherStore, action::SAVED_MESSAGE, fetch_and_save,
    provider::fetcher_from_config, view,
};

use crate::session::Session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlog", version, about = "Record and browse weather for Poznan")]
pub struct Cli {
    /// Path to the SQLite database; overrides the config file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Fetch current weather and forecast once and save them.
    Fetch,

    /// Print the stored data once.
    Show {
        /// View mode: "table" or "record".
        #[arg(long, default_value = "table")]
        mode: String,

        /// Record position, 0 being the newest (record mode only).
        #[arg(long, default_value_t = 0)]
        index: u64,
    },

    /// Interactive session (default).
    Browse,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Browse);
        // `configure` must still work when the existing file is broken.
        let config = match command {
            Command::Configure => Config::load_or_default(),
            _ => Config::load()?,
        };

        match command {
            Command::Configure => configure(config)?,
            Command::Fetch => {
                let store = open_store(&config, self.db)?;
                let fetcher = fetcher_from_config(&config)?;
                let summary = fetch_and_save(fetcher.as_ref(), &store).await?;
                println!("{SAVED_MESSAGE} ({})", summary.timestamp);
            }
            Command::Show { mode, index } => {
                let mode = ViewMode::try_from(mode.as_str())?;
                let store = open_store(&config, self.db)?;
                match mode {
                    ViewMode::Table => println!("{}", view::table_view(&store)?),
                    ViewMode::SingleRecord => {
                        let shown =
                            view::single_record_view(&store, RecordCursor::at(index), None)?;
                        if let Some(text) = shown.rendered {
                            println!("{text}");
                        }
                    }
                }
            }
            Command::Browse => {
                let store = open_store(&config, self.db)?;
                Session::new(config, store).run().await?;
            }
        }

        Ok(())
    }
}

fn open_store(config: &Config, explicit: Option<PathBuf>) -> anyhow::Result<WeatherStore> {
    let path = config.resolve_database_path(explicit)?;
    tracing::debug!(path = %path.display(), "using weather database");
    WeatherStore::open(path)
}

/// Starts from whatever config loads; an unreadable file is replaced.
fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!(
        "API key saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}
