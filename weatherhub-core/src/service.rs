use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cities::CityList;
use crate::error::CoreError;
use crate::model::WeatherObservation;
use crate::provider::WeatherProvider;
use crate::record::WeatherRecord;
use crate::scheduler::RefreshScheduler;
use crate::signal::Signal;

/// The sync coordinator: receives refresh requests (manual, list-index or
/// timer-driven), delegates to the data-source collaborator, and applies
/// the outcome to the observable weather record.
///
/// The handle is a cheap `Rc` clone. The record and city list are owned
/// exclusively by the coordinator and exposed read-only; views mutate
/// nothing directly, they only issue requests and subscribe to signals.
///
/// A request accepted while another is in flight supersedes it: each
/// request takes a fresh token, and a completion whose token is no longer
/// current is dropped, so a stale slower response can never clobber a
/// newer one ("last request wins", no cancellation of the superseded
/// fetch).
#[derive(Debug, Clone)]
pub struct WeatherService {
    inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Rc<dyn WeatherProvider>,
    record: WeatherRecord,
    cities: CityList,
    scheduler: RefCell<RefreshScheduler>,

    is_loading: Cell<bool>,
    last_error: RefCell<String>,
    request_seq: Cell<u64>,

    weather_updated: Signal<WeatherObservation>,
    weather_fetch_failed: Signal<String>,
    loading_changed: Signal<bool>,
    error_changed: Signal<String>,
}

impl WeatherService {
    /// Coordinator over the default seed city list; immediately issues one
    /// best-effort refresh for the first city.
    pub async fn new(provider: Rc<dyn WeatherProvider>) -> Self {
        Self::with_cities(provider, CityList::with_default_cities()).await
    }

    /// Coordinator over a caller-supplied city list. When the list is
    /// non-empty, one refresh for entry 0 is issued before this returns; a
    /// failure there only lands in `last_error`, it is not fatal.
    pub async fn with_cities(provider: Rc<dyn WeatherProvider>, cities: CityList) -> Self {
        let service = Self {
            inner: Rc::new(Inner {
                provider,
                record: WeatherRecord::new(),
                cities,
                scheduler: RefCell::new(RefreshScheduler::new()),
                is_loading: Cell::new(false),
                last_error: RefCell::new(String::new()),
                request_seq: Cell::new(0),
                weather_updated: Signal::new(),
                weather_fetch_failed: Signal::new(),
                loading_changed: Signal::new(),
                error_changed: Signal::new(),
            }),
        };

        if service.inner.cities.count() > 0 {
            let _ = service.request_refresh_by_index(0).await;
        }

        service
    }

    // Read-only projections

    pub fn record(&self) -> &WeatherRecord {
        &self.inner.record
    }

    pub fn cities(&self) -> &CityList {
        &self.inner.cities
    }

    /// True from the moment a refresh is accepted until its result (or its
    /// supersession's result) is applied.
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading.get()
    }

    /// The most recent fetch failure, or empty. Ordinary observable state,
    /// never an exception.
    pub fn last_error(&self) -> String {
        self.inner.last_error.borrow().clone()
    }

    pub fn is_auto_updating(&self) -> bool {
        self.inner.scheduler.borrow().is_armed()
    }

    // Signals for the view collaborator

    /// Aggregate success event, fired once per applied refresh with the
    /// observation that landed. Distinct from the record's own
    /// `record_changed`, which fires per changed field.
    pub fn weather_updated(&self) -> &Signal<WeatherObservation> {
        &self.inner.weather_updated
    }

    pub fn weather_fetch_failed(&self) -> &Signal<String> {
        &self.inner.weather_fetch_failed
    }

    pub fn loading_changed(&self) -> &Signal<bool> {
        &self.inner.loading_changed
    }

    pub fn error_changed(&self) -> &Signal<String> {
        &self.inner.error_changed
    }

    // Requests

    /// Refreshes `city` through the data source and applies the outcome.
    ///
    /// An empty target is rejected before any state change. A fetch
    /// failure is not an `Err`: it is recorded in `last_error` and
    /// announced via `weather_fetch_failed`.
    pub async fn request_refresh(&self, city: &str) -> Result<(), CoreError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(CoreError::InvalidTarget {
                reason: "city name must not be empty".to_string(),
            });
        }

        let token = self.inner.request_seq.get().wrapping_add(1);
        self.inner.request_seq.set(token);
        self.set_loading(true);
        debug!(city, token, "refresh started");

        let outcome = self.inner.provider.fetch(city).await;

        if self.inner.request_seq.get() != token {
            debug!(city, token, "refresh superseded; dropping result");
            return Ok(());
        }

        match outcome {
            Ok(observation) => self.apply_observation(observation),
            Err(error) => self.apply_failure(error.to_string()),
        }
        Ok(())
    }

    /// Resolves a city-list index to its name, then refreshes it.
    pub async fn request_refresh_by_index(&self, index: usize) -> Result<(), CoreError> {
        let city = self.inner.cities.name_at(index);
        if city.is_empty() {
            return Err(CoreError::InvalidTarget { reason: format!("no city at index {index}") });
        }
        self.request_refresh(&city).await
    }

    // Auto-update

    /// Arms the repeating refresh of the record's current city every
    /// `minutes`; `minutes <= 0` disarms instead. Re-arming replaces the
    /// previous timer. A tick that finds no current city is skipped, which
    /// is the expected state during startup.
    pub fn set_auto_update_interval(&self, minutes: i64) {
        if minutes <= 0 {
            self.stop_auto_update();
            return;
        }

        let period = Duration::from_secs(minutes as u64 * 60);
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.borrow_mut().arm(period, move || Self::on_auto_update(weak.clone()));
        info!(minutes, "auto-update armed");
    }

    /// Idempotent; affects only future ticks, never an in-flight refresh.
    pub fn stop_auto_update(&self) {
        self.inner.scheduler.borrow_mut().disarm();
    }

    async fn on_auto_update(inner: Weak<Inner>) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let service = WeatherService { inner };

        let city = service.inner.record.city_name();
        if city.is_empty() {
            debug!("auto-update tick with no current city; skipping");
            return;
        }
        let _ = service.request_refresh(&city).await;
    }

    // Result application

    fn apply_observation(&self, observation: WeatherObservation) {
        let record = &self.inner.record;
        record.set_city_name(&observation.city);
        record.set_temperature(observation.temperature_c);
        record.set_humidity(observation.humidity_pct);
        record.set_wind_speed(observation.wind_speed_kmh);
        record.set_condition(&observation.condition);
        record.set_last_updated(observation.observation_time);

        self.set_last_error(String::new());
        self.set_loading(false);
        debug!(city = %observation.city, "refresh applied");
        self.inner.weather_updated.emit(&observation);
    }

    fn apply_failure(&self, reason: String) {
        warn!(%reason, "refresh failed");
        self.set_loading(false);
        self.set_last_error(reason.clone());
        self.inner.weather_fetch_failed.emit(&reason);
    }

    fn set_loading(&self, loading: bool) {
        if self.inner.is_loading.get() == loading {
            return;
        }
        self.inner.is_loading.set(loading);
        self.inner.loading_changed.emit(&loading);
    }

    fn set_last_error(&self, error: String) {
        if *self.inner.last_error.borrow() == error {
            return;
        }
        *self.inner.last_error.borrow_mut() = error.clone();
        self.inner.error_changed.emit(&error);
    }
}
