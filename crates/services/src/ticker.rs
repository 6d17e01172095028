use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use mutranier_core::{TickWork, Ticker};

/// Runs tick work on a tokio runtime; cancelling aborts the task.
#[derive(Debug)]
pub struct TokioTicker {
    handle: Handle,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle, task: None }
    }

    /// Ticker bound to the runtime of the calling task, if there is one.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Ticker for TokioTicker {
    fn schedule_repeating(&mut self, period: Duration, mut work: TickWork) {
        self.cancel();
        self.task = Some(self.handle.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                work();
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
