use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One snapshot of conditions for a city, as reported by a data source.
///
/// This is the payload a refresh delivers; the coordinator applies it
/// field-by-field onto the observable [`crate::record::WeatherRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: i32,
    pub wind_speed_kmh: f64,
    pub condition: String,
    pub observation_time: DateTime<Utc>,
}
