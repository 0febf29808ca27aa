//! Tracked job record and state machine

use crate::provider::{ExternalJobStatus, ExternalStep};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Provider states after which neither a step nor a job changes again
const TERMINAL_EXTERNAL_STATES: &[&str] = &["ok", "error", "deleted"];

const WORKFLOW_FAILED_MESSAGE: &str = "Workflow execution failed";

/// Whether a raw provider state is terminal
pub fn is_terminal_external_state(state: &str) -> bool {
    TERMINAL_EXTERNAL_STATES.contains(&state)
}

/// Local state of a tracked job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Tracking requested but nothing is known yet
    Unknown,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Map a raw provider state onto the local state machine
    pub fn from_external(state: &str) -> Self {
        match state {
            "ok" => JobState::Completed,
            "error" | "deleted" => JobState::Failed,
            _ => JobState::Running,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobState::Unknown => "unknown",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One step of a job, rebuilt from every successful poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub step_id: String,
    pub label: String,
    pub state: String,
    pub external_job_id: Option<String>,
    pub error: Option<String>,
}

impl StepInfo {
    fn from_external(step: &ExternalStep) -> Self {
        let label = step
            .label
            .clone()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| step.id.clone());
        let error = (step.state == "error").then(|| format!("Step '{label}' failed"));

        Self {
            step_id: step.id.clone(),
            label,
            state: step.state.clone(),
            external_job_id: step.external_job_id.clone(),
            error,
        }
    }
}

/// Local record of one job running on the external service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedJob {
    pub job_id: String,
    pub external_id: String,
    pub state: JobState,
    pub steps: BTreeMap<String, StepInfo>,
    /// Share of steps in a terminal sub-state, 0 to 100
    pub progress_percent: f64,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub consecutive_failed_polls: u32,
}

impl TrackedJob {
    pub(crate) fn new(job_id: &str, external_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            job_id: job_id.to_string(),
            external_id: external_id.to_string(),
            state: JobState::Running,
            steps: BTreeMap::new(),
            progress_percent: 0.0,
            errors: Vec::new(),
            started_at: now,
            last_updated_at: now,
            ended_at: None,
            consecutive_failed_polls: 0,
        }
    }

    fn push_error_once(&mut self, message: String) {
        if !self.errors.contains(&message) {
            self.errors.push(message);
        }
    }

    /// Fold a successful poll into the record
    pub(crate) fn apply_status(&mut self, status: &ExternalJobStatus, now: DateTime<Utc>) {
        self.steps = status
            .steps
            .iter()
            .map(|step| (step.id.clone(), StepInfo::from_external(step)))
            .collect();

        let finished = self
            .steps
            .values()
            .filter(|step| is_terminal_external_state(&step.state))
            .count();
        self.progress_percent = if self.steps.is_empty() {
            0.0
        } else {
            100.0 * finished as f64 / self.steps.len() as f64
        };

        let step_errors: Vec<String> = self
            .steps
            .values()
            .filter_map(|step| step.error.clone())
            .collect();
        for message in step_errors {
            self.push_error_once(message);
        }

        self.consecutive_failed_polls = 0;
        self.state = JobState::from_external(&status.state);
        self.last_updated_at = now;

        if is_terminal_external_state(&status.state) {
            self.ended_at = Some(now);
            if status.state == "error" {
                self.push_error_once(WORKFLOW_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Count a failed poll cycle; returns whether the job is now exhausted
    pub(crate) fn record_failed_poll(&mut self, max_failed_polls: u32, now: DateTime<Utc>) -> bool {
        self.consecutive_failed_polls += 1;
        self.last_updated_at = now;
        self.consecutive_failed_polls >= max_failed_polls
    }

    /// Force the job to `Failed` with an explanatory message
    pub(crate) fn fail(&mut self, message: String, now: DateTime<Utc>) {
        self.state = JobState::Failed;
        self.ended_at = Some(now);
        self.last_updated_at = now;
        self.push_error_once(message);
    }

    /// Local override to `Completed`, independent of the provider
    pub(crate) fn complete(&mut self, now: DateTime<Utc>) {
        self.state = JobState::Completed;
        self.ended_at = Some(now);
        self.last_updated_at = now;
    }
}

/// Aggregate counts over all tracked jobs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerStatistics {
    pub total: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    /// `(completed - failed) / max(completed, 1) * 100`
    pub success_rate: f64,
}

impl TrackerStatistics {
    pub(crate) fn from_jobs<'a>(jobs: impl Iterator<Item = &'a TrackedJob>) -> Self {
        let (mut total, mut running, mut completed, mut failed) = (0, 0, 0, 0);
        for job in jobs {
            total += 1;
            match job.state {
                JobState::Unknown | JobState::Running => running += 1,
                JobState::Completed => completed += 1,
                JobState::Failed => failed += 1,
            }
        }

        let success_rate = (completed as f64 - failed as f64) / completed.max(1) as f64 * 100.0;
        Self {
            total,
            running,
            completed,
            failed,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, label: Option<&str>, state: &str) -> ExternalStep {
        ExternalStep {
            id: id.to_string(),
            label: label.map(str::to_string),
            state: state.to_string(),
            external_job_id: None,
        }
    }

    fn status(state: &str, steps: Vec<ExternalStep>) -> ExternalJobStatus {
        ExternalJobStatus {
            state: state.to_string(),
            steps,
        }
    }

    #[test]
    fn test_state_mapping() {
        assert_eq!(JobState::from_external("ok"), JobState::Completed);
        assert_eq!(JobState::from_external("error"), JobState::Failed);
        assert_eq!(JobState::from_external("deleted"), JobState::Failed);
        assert_eq!(JobState::from_external("scheduled"), JobState::Running);
        assert!(!JobState::Unknown.is_terminal());
    }

    #[test]
    fn test_progress_counts_terminal_steps() {
        let mut job = TrackedJob::new("job", "ext", Utc::now());
        job.apply_status(
            &status(
                "running",
                vec![
                    step("1", Some("align"), "ok"),
                    step("2", None, "running"),
                    step("3", Some("sort"), "deleted"),
                    step("4", Some("call"), "queued"),
                ],
            ),
            Utc::now(),
        );

        assert_eq!(job.state, JobState::Running);
        assert!((job.progress_percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(job.steps["2"].label, "2");
        assert!(job.ended_at.is_none());
    }

    #[test]
    fn test_no_steps_means_zero_progress() {
        let mut job = TrackedJob::new("job", "ext", Utc::now());
        job.apply_status(&status("new", vec![]), Utc::now());
        assert_eq!(job.progress_percent, 0.0);
    }

    #[test]
    fn test_step_errors_recorded_once_per_label() {
        let mut job = TrackedJob::new("job", "ext", Utc::now());
        let failing = status("running", vec![step("1", Some("trim"), "error")]);
        job.apply_status(&failing, Utc::now());
        job.apply_status(&failing, Utc::now());

        assert_eq!(job.errors, vec!["Step 'trim' failed".to_string()]);
        assert_eq!(job.steps["1"].error.as_deref(), Some("Step 'trim' failed"));
    }

    #[test]
    fn test_error_state_ends_job_with_workflow_message() {
        let mut job = TrackedJob::new("job", "ext", Utc::now());
        job.consecutive_failed_polls = 2;
        job.apply_status(&status("error", vec![step("1", Some("qc"), "error")]), Utc::now());

        assert_eq!(job.state, JobState::Failed);
        assert!(job.ended_at.is_some());
        assert_eq!(job.consecutive_failed_polls, 0);
        assert_eq!(
            job.errors,
            vec!["Step 'qc' failed".to_string(), WORKFLOW_FAILED_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_statistics_success_rate() {
        let now = Utc::now();
        let mut jobs = vec![
            TrackedJob::new("a", "x", now),
            TrackedJob::new("b", "y", now),
            TrackedJob::new("c", "z", now),
            TrackedJob::new("d", "w", now),
        ];
        jobs[0].complete(now);
        jobs[1].complete(now);
        jobs[2].complete(now);
        jobs[3].fail("boom".to_string(), now);

        let stats = TrackerStatistics::from_jobs(jobs.iter());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.failed, 1);
        assert!((stats.success_rate - 200.0 / 3.0).abs() < 1e-9);

        let empty = TrackerStatistics::from_jobs(std::iter::empty());
        assert_eq!(empty.success_rate, 0.0);
    }
}
