use std::cell::RefCell;

type Subscriber<T> = Box<dyn FnMut(&T)>;

/// A single notification channel: an explicit subscriber list with
/// synchronous, in-order delivery on the emitting call stack.
///
/// The subscriber list is checked out for the duration of an `emit`:
/// subscribing from inside a delivery callback is allowed and takes
/// effect from the next emit, while a reentrant emit on the same signal
/// finds the list empty and delivers to no one.
pub struct Signal<T> {
    subscribers: RefCell<Vec<Subscriber<T>>>,
}

// not using #[derive(Default)], as it would (needlessly) impose `Default` on `T`
impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self { subscribers: RefCell::new(Vec::new()) }
    }

    /// Registers a callback for the lifetime of the signal.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }

    /// Delivers `value` to every subscriber, in subscription order,
    /// before returning.
    pub fn emit(&self, value: &T) {
        let mut delivering = self.subscribers.take();
        for subscriber in delivering.iter_mut() {
            subscriber(value);
        }
        // Anything subscribed during delivery landed in the list we left
        // behind; keep it after the subscribers just notified.
        let added = self.subscribers.take();
        delivering.extend(added);
        self.subscribers.replace(delivering);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("subscribers", &self.subscriber_count()).finish()
    }
}
