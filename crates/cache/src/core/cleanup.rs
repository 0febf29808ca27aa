//! Background expiry sweep

use super::types::{CacheInner, TtlCache};
use crate::entry::CacheValue;
use flowgate_core::Result;
use flowgate_utils::{FirstTick, PeriodicTask};
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};

impl<V: CacheValue> TtlCache<V> {
    /// Start the periodic sweep that removes expired entries
    ///
    /// Calling this again while the sweep is running is a no-op. The task
    /// holds only a weak reference and stops once every handle is dropped.
    pub fn start_sweeper(&self) -> Result<()> {
        let mut slot = self.inner.sweeper.lock();
        if slot.as_ref().is_some_and(PeriodicTask::is_running) {
            return Ok(());
        }

        let weak: Weak<CacheInner<V>> = Arc::downgrade(&self.inner);
        let task = PeriodicTask::spawn(
            "cache-sweep",
            self.inner.config.sweep_interval,
            FirstTick::AfterPeriod,
            move || {
                let flow = match weak.upgrade() {
                    Some(inner) => {
                        Self::purge_expired_inner(&inner);
                        ControlFlow::Continue(())
                    }
                    None => ControlFlow::Break(()),
                };
                async move { flow }
            },
        )?;

        *slot = Some(task);
        tracing::info!(
            interval_secs = self.inner.config.sweep_interval.as_secs(),
            "cache sweep started"
        );
        Ok(())
    }

    /// Stop the background sweep
    pub fn shutdown(&self) {
        if let Some(task) = self.inner.sweeper.lock().take() {
            task.cancel();
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(PeriodicTask::is_running)
    }
}
