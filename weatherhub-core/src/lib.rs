//! Core library for the `weatherhub` app.
//!
//! This crate defines:
//! - The observable weather record and the selectable city list
//! - The refresh scheduler and the sync coordinator ([`WeatherService`])
//! - The data-source collaborator trait plus a simulated implementation
//! - Configuration handling
//!
//! It is driven by `weatherhub-cli`, but any view layer can subscribe to
//! its signals and issue refresh requests.
//!
//! The whole core is single-threaded and cooperative: all state lives on
//! one current-thread runtime, signal delivery is synchronous and ordered,
//! and the only suspension points are timer ticks and fetch completions.
//! Arming auto-update spawns a local task, so a
//! [`tokio::task::LocalSet`] must be running.

pub mod cities;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod record;
pub mod scheduler;
pub mod service;
pub mod signal;

pub use cities::{CityEntry, CityList, RowRange};
pub use config::{CityConfig, Config};
pub use error::CoreError;
pub use model::WeatherObservation;
pub use provider::{SimulatedProvider, WeatherProvider};
pub use record::{WeatherField, WeatherRecord};
pub use scheduler::RefreshScheduler;
pub use service::WeatherService;
pub use signal::Signal;
