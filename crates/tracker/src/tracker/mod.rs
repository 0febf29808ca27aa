//! Job tracker and its background poll loop
//!
//! All records live in one map behind a short-held lock. The poll loop takes
//! a snapshot of live jobs, polls them concurrently without holding the lock,
//! and commits each result only if the record has not been restarted, stopped
//! or otherwise finished in the meantime.

mod poll;

use crate::config::TrackerConfig;
use crate::job::{TrackedJob, TrackerStatistics};
use crate::provider::StatusProvider;
use chrono::Utc;
use flowgate_core::{Error, Result};
use flowgate_utils::{FirstTick, PeriodicTask};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;

/// Tracks jobs on an external service by polling a [`StatusProvider`]
///
/// Cloning is cheap and shares the same records and poll loop.
#[derive(Clone)]
pub struct JobTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    config: TrackerConfig,
    provider: Arc<dyn StatusProvider>,
    jobs: RwLock<HashMap<String, JobSlot>>,
    /// Source of record generations; bumped on every start and stop
    generations: AtomicU64,
    cycles: AtomicU64,
    poller: Mutex<Option<PeriodicTask>>,
}

struct JobSlot {
    job: TrackedJob,
    /// Poll results carrying an older generation are discarded
    generation: u64,
    /// When the record became terminal, for aging
    ended: Option<Instant>,
}

impl JobSlot {
    fn new(job: TrackedJob, generation: u64) -> Self {
        Self {
            job,
            generation,
            ended: None,
        }
    }

    fn mark_if_ended(&mut self) {
        if self.ended.is_none() && self.job.state.is_terminal() {
            self.ended = Some(Instant::now());
        }
    }
}

impl TrackerInner {
    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl JobTracker {
    pub fn new(config: TrackerConfig, provider: Arc<dyn StatusProvider>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(TrackerInner {
                config,
                provider,
                jobs: RwLock::new(HashMap::new()),
                generations: AtomicU64::new(0),
                cycles: AtomicU64::new(0),
                poller: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    /// Begin tracking `job_id`, running on the service as `external_id`
    ///
    /// Tracking a live job again with the same external id is a no-op, with a
    /// different one it is a [`Error::TrackingConflict`]. A terminal record is
    /// replaced by a fresh one. Starts the poll loop if it is not running,
    /// which requires a tokio runtime.
    pub fn start_tracking(&self, job_id: &str, external_id: &str) -> Result<()> {
        self.ensure_poller()?;

        let mut jobs = self.inner.jobs.write();
        if let Some(slot) = jobs.get(job_id) {
            if !slot.job.state.is_terminal() {
                if slot.job.external_id == external_id {
                    return Ok(());
                }
                return Err(Error::tracking_conflict(
                    job_id,
                    slot.job.external_id.clone(),
                    external_id,
                ));
            }
        }

        let slot = JobSlot::new(
            TrackedJob::new(job_id, external_id, Utc::now()),
            self.inner.next_generation(),
        );
        jobs.insert(job_id.to_string(), slot);
        drop(jobs);

        tracing::info!(job_id = %job_id, external_id = %external_id, "started tracking job");
        Ok(())
    }

    /// Force a job to `Completed` and stop polling it
    ///
    /// A poll already in flight for the job is discarded when it returns.
    /// Returns `false` for an unknown job. A job that already reached a
    /// terminal state keeps it.
    pub fn stop_tracking(&self, job_id: &str) -> bool {
        let mut jobs = self.inner.jobs.write();
        let Some(slot) = jobs.get_mut(job_id) else {
            return false;
        };

        if !slot.job.state.is_terminal() {
            slot.job.complete(Utc::now());
            slot.mark_if_ended();
            slot.generation = self.inner.next_generation();
            tracing::info!(job_id = %job_id, "stopped tracking job");
        }
        true
    }

    /// Last committed snapshot of a job
    pub fn get_status(&self, job_id: &str) -> Option<TrackedJob> {
        self.inner.jobs.read().get(job_id).map(|slot| slot.job.clone())
    }

    /// Jobs not yet in a terminal state, ordered by job id
    pub fn list_active(&self) -> Vec<TrackedJob> {
        let mut active: Vec<TrackedJob> = self
            .inner
            .jobs
            .read()
            .values()
            .filter(|slot| !slot.job.state.is_terminal())
            .map(|slot| slot.job.clone())
            .collect();
        active.sort_by(|a, b| a.job_id.cmp(&b.job_id));
        active
    }

    pub fn statistics(&self) -> TrackerStatistics {
        let jobs = self.inner.jobs.read();
        TrackerStatistics::from_jobs(jobs.values().map(|slot| &slot.job))
    }

    /// Drop terminal jobs that ended at least `max_age` ago; returns the count
    pub fn cleanup_older_than(&self, max_age: Duration) -> usize {
        poll::remove_aged(&self.inner, max_age)
    }

    /// Run one poll cycle now, outside the regular schedule
    pub async fn poll_now(&self) {
        poll::run_cycle(&self.inner).await;
    }

    /// Whether the background poll loop is scheduled
    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .as_ref()
            .is_some_and(PeriodicTask::is_running)
    }

    /// Stop the poll loop; an in-flight cycle is abandoned
    ///
    /// A later [`JobTracker::start_tracking`] starts a new loop.
    pub fn shutdown(&self) {
        if let Some(task) = self.inner.poller.lock().take() {
            task.cancel();
            tracing::info!("job tracker poll loop stopped");
        }
    }

    fn ensure_poller(&self) -> Result<()> {
        let mut slot = self.inner.poller.lock();
        if slot.as_ref().is_some_and(PeriodicTask::is_running) {
            return Ok(());
        }

        let weak: Weak<TrackerInner> = Arc::downgrade(&self.inner);
        let task = PeriodicTask::spawn(
            "job-poll",
            self.inner.config.poll_interval,
            FirstTick::Immediate,
            move || {
                let weak = weak.clone();
                async move {
                    match weak.upgrade() {
                        Some(inner) => {
                            poll::run_cycle(&inner).await;
                            ControlFlow::Continue(())
                        }
                        None => ControlFlow::Break(()),
                    }
                }
            },
        )?;

        *slot = Some(task);
        tracing::debug!(
            interval_secs = self.inner.config.poll_interval.as_secs(),
            "job tracker poll loop started"
        );
        Ok(())
    }
}

impl std::fmt::Debug for JobTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTracker")
            .field("jobs", &self.inner.jobs.read().len())
            .field("polling", &self.is_polling())
            .finish()
    }
}
