//! One poll cycle and the aging sweep

use super::TrackerInner;
use crate::provider::ExternalJobStatus;
use chrono::Utc;
use flowgate_core::{Error, ProviderError};
use flowgate_utils::retry_async;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;

struct PollTarget {
    job_id: String,
    external_id: String,
    generation: u64,
}

/// Poll every live job concurrently, then sweep aged records
pub(super) async fn run_cycle(inner: &TrackerInner) {
    let cycle = inner.cycles.fetch_add(1, Ordering::Relaxed) + 1;

    let targets: Vec<PollTarget> = inner
        .jobs
        .read()
        .values()
        .filter(|slot| !slot.job.state.is_terminal())
        .map(|slot| PollTarget {
            job_id: slot.job.job_id.clone(),
            external_id: slot.job.external_id.clone(),
            generation: slot.generation,
        })
        .collect();

    let span = flowgate_utils::tracing::poll_cycle_span(cycle, targets.len());
    async {
        let polls = targets.iter().map(|target| async move {
            let outcome = retry_async(&inner.config.retry, || poll_once(inner, target)).await;
            commit(inner, target, outcome);
        });
        futures::future::join_all(polls).await;

        remove_aged(inner, inner.config.retention);
    }
    .instrument(span)
    .await;
}

/// One provider call, bounded by the configured request timeout
async fn poll_once(
    inner: &TrackerInner,
    target: &PollTarget,
) -> Result<ExternalJobStatus, ProviderError> {
    let timeout = inner.config.request_timeout;
    match tokio::time::timeout(timeout, inner.provider.job_status(&target.external_id)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProviderError::Network(format!(
            "status request for {} timed out after {}ms",
            target.external_id,
            timeout.as_millis()
        ))),
    }
}

/// Apply a poll outcome unless the record moved on while it was in flight
fn commit(
    inner: &TrackerInner,
    target: &PollTarget,
    outcome: Result<ExternalJobStatus, ProviderError>,
) {
    let mut jobs = inner.jobs.write();
    let Some(slot) = jobs.get_mut(&target.job_id) else {
        return;
    };
    if slot.generation != target.generation || slot.job.state.is_terminal() {
        tracing::debug!(job_id = %target.job_id, "discarding stale poll result");
        return;
    }

    let job = &mut slot.job;
    let now = Utc::now();
    match outcome {
        Ok(status) => {
            let before = job.state;
            job.apply_status(&status, now);
            if job.state.is_terminal() && job.state != before {
                tracing::info!(
                    job_id = %job.job_id,
                    state = %job.state,
                    external_state = %status.state,
                    "job finished"
                );
            }
        }
        Err(err) => {
            let max = inner.config.max_failed_polls;
            tracing::warn!(
                job_id = %job.job_id,
                failed_polls = job.consecutive_failed_polls + 1,
                max_failed_polls = max,
                "poll failed: {err}"
            );

            if job.record_failed_poll(max, now) {
                let exhausted = Error::TrackingExhausted {
                    job_id: job.job_id.clone(),
                    attempts: job.consecutive_failed_polls,
                };
                tracing::error!(job_id = %job.job_id, "{exhausted}");
                job.fail(format!("{exhausted}: {err}"), now);
            }
        }
    }
    slot.mark_if_ended();
}

/// Remove terminal records that ended at least `max_age` ago
///
/// Age is measured on the tokio clock from when the record became terminal.
pub(super) fn remove_aged(inner: &TrackerInner, max_age: Duration) -> usize {
    let now = Instant::now();

    let mut jobs = inner.jobs.write();
    let before = jobs.len();
    jobs.retain(|_, slot| {
        let aged = slot
            .ended
            .is_some_and(|ended| now.saturating_duration_since(ended) >= max_age);
        !(slot.job.state.is_terminal() && aged)
    });
    let removed = before - jobs.len();
    drop(jobs);

    if removed > 0 {
        tracing::info!(removed = removed, "removed aged job records");
    }
    removed
}
