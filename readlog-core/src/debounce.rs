//! Cancellable timers for debounced side effects
//!
//! A [`Debouncer`] holds at most one pending task. Arming it again cancels the
//! previous task and restarts the window, so only the last value in a burst
//! is acted on. Dropping the owner cancels whatever is still pending.
//!
//! Both types spawn onto the current Tokio runtime and must be armed from
//! within one.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet period before persisting or refreshing the preview
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A single-slot timer: arm, re-arm, cancel
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `task` once the delay elapses without another call to `arm`
    pub fn arm<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Cancel the pending task. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A value that settles after a quiet period
///
/// Subscribers see the latest value only once updates pause for the delay.
#[derive(Debug)]
pub struct Debounced<T> {
    timer: Debouncer,
    tx: watch::Sender<T>,
}

impl<T> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            timer: Debouncer::new(delay),
            tx,
        }
    }

    /// Schedule `value` to become the settled value
    pub fn set(&mut self, value: T) {
        let tx = self.tx.clone();
        self.timer.arm(async move {
            tx.send_replace(value);
        });
    }

    /// Settle `value` immediately, dropping any scheduled update
    pub fn set_now(&mut self, value: T) {
        self.timer.cancel();
        self.tx.send_replace(value);
    }

    /// The last settled value
    pub fn settled(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn cancel(&mut self) -> bool {
        self.timer.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        let counter = fired.clone();
        debouncer.arm(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_keeps_only_last_value() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        for value in ["D", "Du", "Dun", "Dune"] {
            let written = written.clone();
            debouncer.arm(async move {
                written.lock().unwrap().push(value);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*written.lock().unwrap(), vec!["Dune"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_stop_pending_work() {
        let fired = Arc::new(AtomicUsize::new(0));

        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let counter = fired.clone();
        debouncer.arm(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let counter = fired.clone();
        debouncer.arm(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_value_settles() {
        let mut title = Debounced::new(String::new(), Duration::from_millis(500));
        let mut rx = title.subscribe();

        title.set("Du".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        title.set("Dune".to_string());
        assert_eq!(title.settled(), "");

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "Dune");
        assert_eq!(title.settled(), "Dune");

        title.set("Dune Messiah".to_string());
        title.set_now("Children of Dune".to_string());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(title.settled(), "Children of Dune");
    }
}
