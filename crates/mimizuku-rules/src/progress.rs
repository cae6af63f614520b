//! Progress reporting for long-running rule evaluation

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Observer notified while rules are evaluated
pub trait ProgressMonitor: Send + Sync {
    fn begin_task(&self, _label: &str, _total_work: Option<usize>) {}

    fn sub_task(&self, _label: &str) {}

    fn worked(&self, _amount: usize) {}

    fn done(&self) {}

    /// Evaluators stop with `RuleError::Canceled` once this returns true
    fn is_canceled(&self) -> bool {
        false
    }
}

/// Monitor that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressMonitor;

impl ProgressMonitor for NullProgressMonitor {}

/// Monitor that forwards notifications to `tracing` at trace level
#[derive(Debug, Default)]
pub struct TracingProgressMonitor {
    canceled: AtomicBool,
}

impl TracingProgressMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }
}

impl ProgressMonitor for TracingProgressMonitor {
    fn begin_task(&self, label: &str, total_work: Option<usize>) {
        trace!(total_work, "begin: {}", label);
    }

    fn sub_task(&self, label: &str) {
        trace!("{}", label);
    }

    fn worked(&self, amount: usize) {
        trace!(amount, "worked");
    }

    fn done(&self) {
        trace!("done");
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}
