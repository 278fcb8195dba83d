//! Input debouncing.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use ensign_core::constants::DEFAULT_DEBOUNCE_MS;

/// Forwards raw input only after it has been stable for a quiet period.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    quiet: Duration,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self { quiet }
    }

    /// Quiet period.
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Spawns a task turning `input` into a receiver of settled values.
    ///
    /// The settled receiver starts with the current input. When the input
    /// sender is dropped, the pending value is flushed and the task ends.
    pub fn spawn(&self, mut input: watch::Receiver<String>) -> (watch::Receiver<String>, JoinHandle<()>) {
        let initial = input.borrow_and_update().clone();
        let (tx, settled) = watch::channel(initial);
        let quiet = self.quiet;

        let handle = tokio::spawn(async move {
            while input.changed().await.is_ok() {
                let mut closed = false;
                loop {
                    match tokio::time::timeout(quiet, input.changed()).await {
                        Ok(Ok(())) => continue,
                        Ok(Err(_)) => {
                            closed = true;
                            break;
                        }
                        Err(_) => break,
                    }
                }

                let value = input.borrow_and_update().clone();
                trace!(value = %value, "Input settled");
                tx.send_if_modified(|current| {
                    if *current == value {
                        return false;
                    }
                    *current = value;
                    true
                });

                if closed || tx.is_closed() {
                    break;
                }
            }
        });

        (settled, handle)
    }
}
