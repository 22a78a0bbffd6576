use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use skyglass_core::{
    Config, Coordinates, ErrorKind, FileStore, FixedPosition, Geolocator, HistoryStore,
    KeyValueStore, LookupCoordinator, NoPosition, WeatherGateway, gateway_from_config,
};
use std::sync::Arc;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyglass", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a city, or for the given position.
    Show {
        /// City name. When absent, the position flags are used.
        city: Option<String>,

        #[command(flatten)]
        position: PositionArgs,
    },

    /// List recent searches.
    History,

    /// Interactive search with quick-select from recent searches.
    Browse {
        #[command(flatten)]
        position: PositionArgs,
    },
}

/// Stand-in for device geolocation.
#[derive(Debug, Args)]
pub struct PositionArgs {
    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl PositionArgs {
    fn geolocator(&self) -> Arc<dyn Geolocator> {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Arc::new(FixedPosition(Coordinates {
                latitude,
                longitude,
            })),
            _ => Arc::new(NoPosition),
        }
    }
}

const NEW_SEARCH: &str = "New search...";
const QUIT: &str = "Quit";

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        tracing::debug!(base_url = %config.base_url, "Loaded configuration");

        match self.command {
            Command::Configure => {
                let api_key = Password::new("OpenWeather API key:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                config.set_api_key(api_key.trim().to_string());
                config.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
            Command::Show { city, position } => {
                let coordinator = build_coordinator(&config, position.geolocator())?;

                match city {
                    Some(city) => {
                        if let Err(ErrorKind::ValidationError) =
                            coordinator.search_by_name(&city).await
                        {
                            bail!("{}", ErrorKind::ValidationError);
                        }
                    }
                    None => {
                        if coordinator.startup().await.is_none() {
                            println!("Hint: pass a city name, or --lat and --lon.");
                        }
                    }
                }

                println!("{}", render::state(&coordinator.state()));
            }
            Command::History => {
                let mut store = HistoryStore::new(history_storage(&config)?);
                println!("{}", render::history(&store.load()));
            }
            Command::Browse { position } => {
                let coordinator = build_coordinator(&config, position.geolocator())?;
                if coordinator.startup().await.is_some() {
                    println!("{}", render::state(&coordinator.state()));
                }
                browse(&coordinator).await?;
            }
        }

        Ok(())
    }
}

async fn browse(coordinator: &LookupCoordinator) -> anyhow::Result<()> {
    loop {
        let history = coordinator.history();
        let mut options: Vec<String> = history.clone();
        options.push(NEW_SEARCH.to_string());
        options.push(QUIT.to_string());

        let choice = match Select::new("Where to?", options).raw_prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let outcome = if choice.index < history.len() {
            coordinator.select_history(choice.index).await
        } else if choice.value == NEW_SEARCH {
            let city = match Text::new("City:").prompt() {
                Ok(city) => city,
                Err(InquireError::OperationCanceled) => continue,
                Err(InquireError::OperationInterrupted) => break,
                Err(err) => return Err(err.into()),
            };
            coordinator.search_by_name(&city).await
        } else {
            break;
        };

        match outcome {
            Ok(_) => println!("{}", render::state(&coordinator.state())),
            Err(kind) => println!("{kind}"),
        }
    }

    Ok(())
}

fn history_storage(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(FileStore::new(config.history_dir()?)))
}

fn build_coordinator(
    config: &Config,
    geolocator: Arc<dyn Geolocator>,
) -> anyhow::Result<LookupCoordinator> {
    let gateway: Arc<dyn WeatherGateway> = Arc::from(gateway_from_config(config)?);
    let store = HistoryStore::new(history_storage(config)?);

    Ok(LookupCoordinator::new(gateway, geolocator, store))
}
