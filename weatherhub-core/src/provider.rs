use std::fmt::Debug;

use async_trait::async_trait;

use crate::model::WeatherObservation;

pub mod simulated;

pub use simulated::SimulatedProvider;

/// The refresh collaborator: asked to refresh a named city, it must
/// eventually resolve exactly once with an observation or an error.
///
/// The trait is `?Send` because the core runs single-threaded on a
/// current-thread runtime; implementations are free to keep `Rc`/`RefCell`
/// state.
#[async_trait(?Send)]
pub trait WeatherProvider: Debug {
    async fn fetch(&self, city: &str) -> anyhow::Result<WeatherObservation>;
}
