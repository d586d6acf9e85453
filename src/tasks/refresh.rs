use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::Error;
use crate::pipeline::{Pipeline, ScanReport};
use crate::state::StatePublisher;

/// Rebuild the slideshow immediately, then every `period`, until `cancel`
/// fires.
///
/// A failed cycle is logged and the last published state stays current;
/// the loop itself never gives up.
#[instrument(
    skip(pipeline, publisher, cancel),
    fields(root = %pipeline.root().display(), zone = %pipeline.zone())
)]
pub async fn run(
    pipeline: Pipeline,
    publisher: StatePublisher,
    period: Duration,
    cancel: CancellationToken,
) {
    let pipeline = Arc::new(Mutex::new(pipeline));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting refresh task");
                break;
            }
            _ = ticker.tick() => {
                match refresh_cycle(Arc::clone(&pipeline)).await {
                    Ok(report) => publish(&publisher, report),
                    Err(err) => error!(error = %err, "refresh failed; keeping previous slideshow"),
                }
            }
        }
    }
}

/// Scan on a blocking worker so request handlers never wait on the filesystem.
async fn refresh_cycle(pipeline: Arc<Mutex<Pipeline>>) -> Result<ScanReport, Error> {
    tokio::task::spawn_blocking(move || {
        // A panicked cycle leaves nothing half-written in the pipeline.
        let mut pipeline = pipeline.lock().unwrap_or_else(PoisonError::into_inner);
        pipeline.run_once()
    })
    .await?
}

fn publish(publisher: &StatePublisher, report: ScanReport) {
    for skipped in &report.unparsed {
        warn!(
            path = %skipped.relative_path,
            error = %skipped.error,
            "could not parse date from filename; skipping"
        );
    }
    for entry in &report.state.entries {
        debug!(path = %entry.relative_path, "visible");
    }
    info!(
        visible = report.state.entries.len(),
        hidden = report.hidden,
        unparsed = report.unparsed.len(),
        "image list updated"
    );
    publisher.publish(report.state);
}
