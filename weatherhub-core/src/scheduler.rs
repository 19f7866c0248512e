use std::future::Future;
use std::time::Duration;

use tokio::task::{JoinHandle, spawn_local};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Owns at most one repeating tick task at a time.
///
/// The scheduler never interprets the callback; it only invokes it once per
/// elapsed period. Each invocation runs on its own detached task, so
/// disarming cancels future ticks only — work an earlier tick has already
/// started runs to completion. Validation of the period (for example
/// mapping a "disable" request to [`RefreshScheduler::disarm`]) is the
/// caller's job.
///
/// Tick tasks are spawned with [`tokio::task::spawn_local`], so arming
/// requires a current-thread runtime inside a `LocalSet`.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    tick_task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a repeating timer, replacing (not stacking) any previous one.
    /// The first tick fires one full `period` after arming.
    pub fn arm<F, Fut>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.disarm();
        debug!(?period, "scheduler armed");

        let task = spawn_local(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Detached: aborting the loop must not drop an invocation
                // that is already in flight.
                spawn_local(on_tick());
            }
        });
        self.tick_task = Some(task);
    }

    /// Cancels future ticks; idempotent. A callback invocation that has
    /// already begun is not interrupted; only the loop around it is torn
    /// down.
    pub fn disarm(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
            debug!("scheduler disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.tick_task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tokio::task::LocalSet;

    /// Lets the tick loop and its detached invocations make progress
    /// without advancing the clock.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() -> std::future::Ready<()>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let tick = move || {
            sink.set(sink.get() + 1);
            std::future::ready(())
        };
        (count, tick)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_fire_once_per_period() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let mut scheduler = RefreshScheduler::new();
                let (count, tick) = counter();
                scheduler.arm(Duration::from_secs(60), tick);

                settle().await;
                assert_eq!(count.get(), 0, "no tick before the first period elapses");

                time::advance(Duration::from_secs(60)).await;
                settle().await;
                assert_eq!(count.get(), 1);

                time::advance(Duration::from_secs(60)).await;
                settle().await;
                time::advance(Duration::from_secs(60)).await;
                settle().await;
                assert_eq!(count.get(), 3);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_previous_timer() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let mut scheduler = RefreshScheduler::new();
                let (first, tick) = counter();
                scheduler.arm(Duration::from_secs(10), tick);
                settle().await;

                time::advance(Duration::from_secs(10)).await;
                settle().await;
                assert_eq!(first.get(), 1);

                let (second, tick) = counter();
                scheduler.arm(Duration::from_secs(30), tick);
                settle().await;

                // Old cadence is gone: 10s elapse without a tick from either.
                time::advance(Duration::from_secs(10)).await;
                settle().await;
                assert_eq!(first.get(), 1);
                assert_eq!(second.get(), 0);

                time::advance(Duration::from_secs(20)).await;
                settle().await;
                assert_eq!(second.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_is_idempotent_and_stops_ticks() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let mut scheduler = RefreshScheduler::new();
                scheduler.disarm();
                assert!(!scheduler.is_armed());

                let (count, tick) = counter();
                scheduler.arm(Duration::from_secs(5), tick);
                assert!(scheduler.is_armed());

                scheduler.disarm();
                scheduler.disarm();
                assert!(!scheduler.is_armed());

                time::advance(Duration::from_secs(60)).await;
                settle().await;
                assert_eq!(count.get(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_does_not_interrupt_an_in_flight_tick() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let (tx, rx) = tokio::sync::oneshot::channel::<()>();
                let gate = Rc::new(RefCell::new(Some(rx)));
                let done = Rc::new(Cell::new(false));

                let mut scheduler = RefreshScheduler::new();
                let gate_source = Rc::clone(&gate);
                let finished = Rc::clone(&done);
                scheduler.arm(Duration::from_secs(5), move || {
                    let gate = Rc::clone(&gate_source);
                    let finished = Rc::clone(&finished);
                    async move {
                        if let Some(rx) = gate.borrow_mut().take() {
                            let _ = rx.await;
                            finished.set(true);
                        }
                    }
                });
                settle().await;

                time::advance(Duration::from_secs(5)).await;
                settle().await;
                assert!(!done.get(), "first tick is waiting on the gate");

                scheduler.disarm();
                settle().await;

                // The invocation the tick already started must survive.
                tx.send(()).expect("in-flight tick was dropped by disarm");
                settle().await;
                assert!(done.get());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_tick_task() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let (count, tick) = counter();
                {
                    let mut scheduler = RefreshScheduler::new();
                    scheduler.arm(Duration::from_secs(5), tick);
                }

                time::advance(Duration::from_secs(60)).await;
                settle().await;
                assert_eq!(count.get(), 0);
            })
            .await;
    }
}
