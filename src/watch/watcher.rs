//! Watcher thread: notify + debounce, one trigger per quiet period.

use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::{Result, VaultError};

/// Folds a burst of raw events into a single firing once the window has been quiet.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
        }
    }

    pub fn record(&mut self, at: Instant) {
        self.last_event = Some(at);
    }

    /// True exactly once per burst, when `now` is at least one window past its last event.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(t) if now.duration_since(t) >= self.window => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Watch `inbox` (non-recursively) and send `()` over `tx` after each debounced burst of
/// changes. Returns when the receiving side is gone or the notify backend disconnects.
pub fn run_watcher_thread(inbox: &Path, debounce_ms: u64, tx: UnboundedSender<()>) -> Result<()> {
    let window = Duration::from_millis(debounce_ms);
    let (event_tx, event_rx) = mpsc::channel::<()>();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(ev) if matches!(ev.kind, EventKind::Access(_)) => {}
            Ok(_) => {
                let _ = event_tx.send(());
            }
            Err(e) => log::warn!("watch: notify error: {}", e),
        }
    })
    .map_err(|e| VaultError::Watch(e.to_string()))?;

    watcher
        .watch(inbox, RecursiveMode::NonRecursive)
        .map_err(|e| VaultError::Watch(format!("cannot watch {}: {}", inbox.display(), e)))?;

    let mut debouncer = Debouncer::new(window);

    loop {
        match event_rx.recv_timeout(window) {
            Ok(()) => debouncer.record(Instant::now()),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if tx.is_closed() {
                    return Ok(());
                }
                if debouncer.fire(Instant::now()) && tx.send(()).is_err() {
                    return Ok(());
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}
