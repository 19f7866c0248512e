use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use inquire::Select;

use weatherhub_core::{Config, SimulatedProvider, WeatherObservation, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherhub", version, about = "Reactive weather dashboard (simulated data)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the selectable cities.
    Cities,

    /// Watch a city, printing each update as it lands.
    Watch {
        /// City name; prompts interactively when omitted and no default is
        /// configured.
        city: Option<String>,

        /// Auto-update interval in minutes; 0 disables auto-update.
        /// Defaults to the configured interval.
        #[arg(long)]
        interval_minutes: Option<i64>,

        /// How many auto-update rounds to wait for before exiting.
        #[arg(long, default_value_t = 3)]
        rounds: u32,
    },

    /// Persist a default city and auto-update interval.
    Configure {
        /// City refreshed first on startup.
        city: String,

        /// Auto-update interval in minutes; 0 disables auto-update.
        #[arg(long)]
        interval_minutes: Option<i64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Cities => {
                let config = Config::load()?;
                let list = config.city_list();
                for index in 0..list.count() {
                    println!("{index:>3}  {:<12} ({})", list.name_at(index), list.key_at(index));
                }
            }

            Command::Watch { city, interval_minutes, rounds } => {
                let config = Config::load()?;
                let provider = Rc::new(SimulatedProvider::new());
                let service = WeatherService::with_cities(provider, config.city_list()).await;

                service.loading_changed().subscribe(|loading: &bool| {
                    if *loading {
                        println!("refreshing...");
                    }
                });
                service.weather_updated().subscribe(|obs: &WeatherObservation| {
                    println!(
                        "[{}] {}: {:.1} C, {}% humidity, {:.1} km/h wind, {}",
                        obs.observation_time.format("%H:%M:%S"),
                        obs.city,
                        obs.temperature_c,
                        obs.humidity_pct,
                        obs.wind_speed_kmh,
                        obs.condition,
                    );
                });
                service.weather_fetch_failed().subscribe(|reason: &String| {
                    eprintln!("fetch failed: {reason}");
                });

                let city = match city.or_else(|| config.default_city.clone()) {
                    Some(city) => city,
                    None => Select::new("Pick a city:", service.cities().names()).prompt()?,
                };
                service.request_refresh(&city).await?;

                let minutes = interval_minutes.unwrap_or_else(|| config.update_interval_minutes());
                service.set_auto_update_interval(minutes);
                if minutes > 0 {
                    for _ in 0..rounds {
                        tokio::time::sleep(Duration::from_secs(minutes as u64 * 60)).await;
                    }
                    service.stop_auto_update();
                }
            }

            Command::Configure { city, interval_minutes } => {
                let mut config = Config::load()?;
                config.set_default_city(city);
                if interval_minutes.is_some() {
                    config.auto_update_minutes = interval_minutes;
                }
                config.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}
