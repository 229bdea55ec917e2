//! Stream operators shared by the page and card pipelines.
//!
//! Sources are unbounded tokio channels fed by the view. A debounced
//! source emits the latest value once it has been quiet for the given
//! duration. A value still waiting out its quiet period is dropped when
//! the source closes. Switch-latest is a generation counter: each new
//! trigger issues a [`Ticket`], and only the holder of the newest ticket
//! may publish its result.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Waits for the next settled value of `rx`.
///
/// Returns `None` once the source is closed.
pub async fn next_debounced<T>(rx: &mut UnboundedReceiver<T>, quiet: Duration) -> Option<T> {
    let mut latest = rx.recv().await?;
    loop {
        match timeout(quiet, rx.recv()).await {
            Ok(Some(value)) => latest = value,
            Ok(None) => return None,
            Err(_) => return Some(latest),
        }
    }
}

/// Forwards the debounced values of `rx`, mapped through `map`, into `out`.
pub fn spawn_debounced<T, U, F>(
    mut rx: UnboundedReceiver<T>,
    quiet: Duration,
    out: UnboundedSender<U>,
    map: F,
) -> JoinHandle<()>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(value) = next_debounced(&mut rx, quiet).await {
            if out.send(map(value)).is_err() {
                break;
            }
        }
    })
}

#[derive(Debug, Clone, Default)]
pub struct LatestGuard {
    current: Arc<AtomicU64>,
}

impl LatestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&self) -> Ticket {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            id,
            current: Arc::clone(&self.current),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    current: Arc<AtomicU64>,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }
}

/// Runs at most one derived operation at a time, aborting the previous
/// one whenever a new trigger arrives.
#[derive(Debug, Default)]
pub struct SwitchLatest {
    guard: LatestGuard,
    in_flight: Option<JoinHandle<()>>,
}

impl SwitchLatest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard of this switch; issuing from a clone invalidates the running
    /// operation without starting a new one.
    pub fn guard(&self) -> LatestGuard {
        self.guard.clone()
    }

    pub fn switch<F, Fut>(&mut self, make: F)
    where
        F: FnOnce(Ticket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.guard.issue();
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.in_flight = Some(tokio::spawn(make(ticket)));
    }
}

impl Drop for SwitchLatest {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::{sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_debounce_emits_latest_after_quiet_period() {
        let (tx, mut rx) = unbounded_channel();
        let start = Instant::now();

        tokio::spawn(async move {
            tx.send("M").unwrap();
            sleep(Duration::from_millis(200)).await;
            tx.send("Ma").unwrap();
            sleep(Duration::from_millis(200)).await;
            tx.send("Mar").unwrap();
            sleep(Duration::from_secs(5)).await;
        });

        let value = next_debounced(&mut rx, Duration::from_millis(500)).await;
        assert_eq!(value, Some("Mar"));
        assert!(start.elapsed() >= Duration::from_millis(900));
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_drops_pending_value_on_close() {
        let (tx, mut rx) = unbounded_channel();
        tx.send(1).unwrap();
        drop(tx);

        assert_eq!(next_debounced(&mut rx, Duration::from_millis(500)).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_debounced_maps_each_settled_value() {
        let (in_tx, in_rx) = unbounded_channel::<&str>();
        let (out_tx, mut out_rx) = unbounded_channel();
        spawn_debounced(in_rx, Duration::from_millis(100), out_tx, |s| s.len());

        in_tx.send("a").unwrap();
        in_tx.send("ab").unwrap();
        assert_eq!(out_rx.recv().await, Some(2));

        sleep(Duration::from_millis(300)).await;
        in_tx.send("abcd").unwrap();
        assert_eq!(out_rx.recv().await, Some(4));

        drop(in_tx);
        assert_eq!(out_rx.recv().await, None);
    }

    #[test]
    fn test_only_newest_ticket_is_current() {
        let guard = LatestGuard::new();
        let first = guard.issue();
        assert!(first.is_current());

        let second = guard.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_latest_aborts_superseded_operation() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut switch = SwitchLatest::new();

        for (label, delay) in [("slow", 1000), ("fast", 100)] {
            let published = Arc::clone(&published);
            switch.switch(move |ticket| async move {
                sleep(Duration::from_millis(delay)).await;
                if ticket.is_current() {
                    published.lock().unwrap().push(label);
                }
            });
        }

        sleep(Duration::from_secs(2)).await;
        assert_eq!(*published.lock().unwrap(), vec!["fast"]);
    }
}
