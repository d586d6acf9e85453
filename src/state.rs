//! Published slideshow state.
//!
//! The refresh task owns the only [`StatePublisher`]; HTTP handlers hold
//! [`SlideshowHandle`] clones. Each publish swaps a whole
//! `Arc<SlideshowState>`, so a reader holds either the old or the new state
//! and never a mix of both.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageEntry {
    pub relative_path: String,
    pub base_name: String,
    /// Midnight of the filename date; `None` when the name has no valid date.
    pub parsed_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlideshowState {
    pub entries: Vec<ImageEntry>,
    pub generated_at: DateTime<Utc>,
}

impl SlideshowState {
    pub fn new(entries: Vec<ImageEntry>) -> Self {
        Self {
            entries,
            generated_at: Utc::now(),
        }
    }

    /// Placeholder served until the first refresh cycle publishes.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn relative_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.relative_path.as_str())
    }
}

/// Create the state cell, seeded with `initial`.
pub fn channel(initial: SlideshowState) -> (StatePublisher, SlideshowHandle) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (StatePublisher { tx }, SlideshowHandle { rx })
}

/// Single writer side of the state cell.
#[derive(Debug)]
pub struct StatePublisher {
    tx: watch::Sender<Arc<SlideshowState>>,
}

impl StatePublisher {
    /// Atomically replace the current state. Succeeds even with no readers.
    pub fn publish(&self, state: SlideshowState) {
        self.tx.send_replace(Arc::new(state));
    }

    pub fn subscribe(&self) -> SlideshowHandle {
        SlideshowHandle {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the state cell; cheap to clone.
#[derive(Debug, Clone)]
pub struct SlideshowHandle {
    rx: watch::Receiver<Arc<SlideshowState>>,
}

impl SlideshowHandle {
    /// Whatever is published right now. Never waits for a refresh.
    pub fn current(&self) -> Arc<SlideshowState> {
        Arc::clone(&self.rx.borrow())
    }

    /// Wait until a state newer than the last one seen by this handle is
    /// published. Returns `false` once the publisher is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
