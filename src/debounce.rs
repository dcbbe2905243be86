//! Quiet-period debouncing for filter input.
//!
//! Every change restarts the timer; the value is published only after the
//! input has been still for the whole quiet period. Consumers watching the
//! settled side therefore see at most one change per period.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Debouncer<T> {
    input: watch::Sender<T>,
    settled: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Must be called inside a tokio runtime
    pub fn new(initial: T, quiet: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (settled_tx, settled) = watch::channel(initial);
        let task = tokio::spawn(settle(input_rx, settled_tx, quiet));

        Self { input, settled, task }
    }

    /// Replace the raw value and restart the quiet period
    pub fn set(&self, value: T) {
        self.input.send_replace(value);
    }

    /// Edit the raw value in place and restart the quiet period
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.input.send_modify(f);
    }

    /// Latest raw value, settled or not
    pub fn current(&self) -> T {
        self.input.borrow().clone()
    }

    /// Latest settled value
    pub fn settled(&self) -> T {
        self.settled.borrow().clone()
    }

    /// Receiver that fires once per settled change
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.settled.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn settle<T>(mut input: watch::Receiver<T>, settled: watch::Sender<T>, quiet: Duration)
where
    T: Clone + PartialEq,
{
    loop {
        if input.changed().await.is_err() {
            return;
        }

        // Keep waiting until a full quiet period passes without a change.
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(quiet) => break,
            }
        }

        let value = input.borrow_and_update().clone();
        settled.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}
