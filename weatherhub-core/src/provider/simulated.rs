use std::cell::RefCell;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time;

use crate::model::WeatherObservation;

use super::WeatherProvider;

const CONDITIONS: &[&str] = &[
    "sunny",
    "partly cloudy",
    "overcast",
    "light rain",
    "moderate rain",
    "heavy rain",
    "snow showers",
    "fog",
    "thunderstorm",
    "clearing",
];

const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Stand-in data source: sleeps a simulated network latency, then answers
/// with plausible randomized conditions for the requested city.
///
/// No real HTTP call is ever made; a production deployment would swap in a
/// [`WeatherProvider`] backed by an actual API.
#[derive(Debug)]
pub struct SimulatedProvider {
    latency: Duration,
    rng: RefCell<StdRng>,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self { latency: DEFAULT_LATENCY, rng: RefCell::new(StdRng::from_entropy()) }
    }

    /// Deterministic value stream for tests and demos.
    pub fn with_seed(seed: u64) -> Self {
        Self { latency: DEFAULT_LATENCY, rng: RefCell::new(StdRng::seed_from_u64(seed)) }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait(?Send)]
impl WeatherProvider for SimulatedProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherObservation> {
        time::sleep(self.latency).await;

        let mut rng = self.rng.borrow_mut();
        let condition_index = rng.gen_range(0..CONDITIONS.len());

        Ok(WeatherObservation {
            city: city.to_owned(),
            temperature_c: rng.gen_range(10.0..30.0),
            humidity_pct: rng.gen_range(30..80),
            wind_speed_kmh: rng.gen_range(1.0..10.0),
            condition: CONDITIONS[condition_index].to_owned(),
            observation_time: Utc::now(),
        })
    }
}
