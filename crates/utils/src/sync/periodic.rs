//! Cancellable periodic background task

use super::deadline_after;
use flowgate_core::{Error, Result};
use futures::FutureExt;
use std::future::Future;
use std::ops::ControlFlow;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// When the first tick of a [`PeriodicTask`] fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTick {
    /// Run the body as soon as the task is spawned
    Immediate,
    /// Wait one full period before the first run
    AfterPeriod,
}

/// A background loop that runs a body on a fixed interval until cancelled.
///
/// The body returns [`ControlFlow::Break`] to end the loop on its own, which
/// is how owners holding only a `Weak` reference stop once they are dropped.
/// Cancelling does not wait for an in-flight body: it is dropped at its next
/// await point. A panicking body is logged and the schedule continues.
pub struct PeriodicTask {
    name: &'static str,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn the task on the current tokio runtime
    pub fn spawn<F, Fut>(
        name: &'static str,
        period: Duration,
        first_tick: FirstTick,
        mut body: F,
    ) -> Result<Self>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        if period.is_zero() {
            return Err(Error::configuration(format!(
                "{name}: period must be greater than zero"
            )));
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            Error::runtime(format!("{name}: no tokio runtime available: {e}"))
        })?;

        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = runtime.spawn(async move {
            let start = match first_tick {
                FirstTick::Immediate => Instant::now(),
                FirstTick::AfterPeriod => deadline_after(Instant::now(), period),
            };
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::debug!(
                task = name,
                period_ms = period.as_millis() as u64,
                "periodic task started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let run = AssertUnwindSafe(body()).catch_unwind();
                let flow = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    outcome = run => outcome,
                };

                match flow {
                    Ok(ControlFlow::Continue(())) => {}
                    Ok(ControlFlow::Break(())) => break,
                    Err(_) => {
                        tracing::error!(
                            task = name,
                            "periodic task body panicked, continuing schedule"
                        );
                    }
                }
            }

            tracing::debug!(task = name, "periodic task stopped");
        });

        Ok(Self {
            name,
            cancel,
            handle,
        })
    }

    /// Name given at spawn time
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Request the loop to stop; an in-flight body is abandoned
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the loop is still scheduled
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for PeriodicTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicTask")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}
