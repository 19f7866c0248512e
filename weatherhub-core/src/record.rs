use std::cell::{Cell, RefCell};

use chrono::{DateTime, Utc};

use crate::signal::Signal;

/// Identifies one field of a [`WeatherRecord`] in change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherField {
    CityName,
    Temperature,
    Humidity,
    WindSpeed,
    Condition,
    LastUpdated,
}

/// The current-weather record: a mutable structured value whose writes are
/// change-detected and announced to subscribers.
///
/// Every setter short-circuits when the new value equals the current one
/// (floats are compared with a relative tolerance, so representation noise
/// never notifies). A write that does change a value emits exactly one
/// `field_changed` for that field followed by one `record_changed`.
///
/// Fields use interior mutability so setters take `&self`; observers may
/// read the record from inside a notification callback.
#[derive(Debug)]
pub struct WeatherRecord {
    city_name: RefCell<String>,
    temperature: Cell<f64>,
    humidity: Cell<i32>,
    wind_speed: Cell<f64>,
    condition: RefCell<String>,
    last_updated: Cell<DateTime<Utc>>,

    field_changed: Signal<WeatherField>,
    record_changed: Signal<()>,
}

impl Default for WeatherRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Relative float comparison with a 1.0 floor, so values near zero still
/// compare sanely.
fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
}

impl WeatherRecord {
    /// A record with empty/zero fields and a fresh timestamp.
    pub fn new() -> Self {
        Self {
            city_name: RefCell::new(String::new()),
            temperature: Cell::new(0.0),
            humidity: Cell::new(0),
            wind_speed: Cell::new(0.0),
            condition: RefCell::new(String::new()),
            last_updated: Cell::new(Utc::now()),
            field_changed: Signal::new(),
            record_changed: Signal::new(),
        }
    }

    // Getters

    pub fn city_name(&self) -> String {
        self.city_name.borrow().clone()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.get()
    }

    pub fn humidity(&self) -> i32 {
        self.humidity.get()
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed.get()
    }

    pub fn condition(&self) -> String {
        self.condition.borrow().clone()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated.get()
    }

    // Setters

    pub fn set_city_name(&self, city_name: &str) {
        if *self.city_name.borrow() == city_name {
            return;
        }
        *self.city_name.borrow_mut() = city_name.to_owned();
        self.notify(WeatherField::CityName);
    }

    pub fn set_temperature(&self, temperature: f64) {
        if fuzzy_eq(self.temperature.get(), temperature) {
            return;
        }
        self.temperature.set(temperature);
        self.notify(WeatherField::Temperature);
    }

    pub fn set_humidity(&self, humidity: i32) {
        if self.humidity.get() == humidity {
            return;
        }
        self.humidity.set(humidity);
        self.notify(WeatherField::Humidity);
    }

    pub fn set_wind_speed(&self, wind_speed: f64) {
        if fuzzy_eq(self.wind_speed.get(), wind_speed) {
            return;
        }
        self.wind_speed.set(wind_speed);
        self.notify(WeatherField::WindSpeed);
    }

    pub fn set_condition(&self, condition: &str) {
        if *self.condition.borrow() == condition {
            return;
        }
        *self.condition.borrow_mut() = condition.to_owned();
        self.notify(WeatherField::Condition);
    }

    pub fn set_last_updated(&self, last_updated: DateTime<Utc>) {
        if self.last_updated.get() == last_updated {
            return;
        }
        self.last_updated.set(last_updated);
        self.notify(WeatherField::LastUpdated);
    }

    /// Reinstates every field's default and stamps the record with "now".
    ///
    /// Routed through the ordinary setters, so observers see the same
    /// per-field notification sequence as organic updates; nothing is
    /// coalesced into a single event.
    pub fn reset(&self) {
        self.set_city_name("");
        self.set_temperature(0.0);
        self.set_humidity(0);
        self.set_wind_speed(0.0);
        self.set_condition("");
        self.set_last_updated(Utc::now());
    }

    /// Emitted with the field identifier after each changed write.
    pub fn field_changed(&self) -> &Signal<WeatherField> {
        &self.field_changed
    }

    /// Emitted once after each changed write, following `field_changed`.
    pub fn record_changed(&self) -> &Signal<()> {
        &self.record_changed
    }

    /// Deterministic rendering of all fields; diagnostics only.
    pub fn describe(&self) -> String {
        format!(
            "city: {}\ntemperature: {:.1} C\nhumidity: {}%\nwind speed: {:.1} km/h\ncondition: {}\nupdated: {}",
            self.city_name.borrow(),
            self.temperature.get(),
            self.humidity.get(),
            self.wind_speed.get(),
            self.condition.borrow(),
            self.last_updated().format("%Y-%m-%d %H:%M:%S"),
        )
    }

    fn notify(&self, field: WeatherField) {
        self.field_changed.emit(&field);
        self.record_changed.emit(&());
    }
}
