use opscribe_core::{OperationHandle, PollConfig, SpeechError, SpeechService};
use std::time::Duration;
use tokio::time::Instant;

/// Timing knobs for the poll loop.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Wait before every status query, including the first.
    pub interval: Duration,
    /// Interval multiplier applied after each query; 1.0 keeps a fixed cadence.
    pub backoff_factor: f64,
    /// Ceiling for the interval once backoff grows it.
    pub max_interval: Duration,
    /// Bound on total wall-clock wait. `None` polls until the operation
    /// finishes, however long that takes.
    pub max_wait: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(15),
            max_wait: Some(Duration::from_secs(300)),
        }
    }
}

impl From<&PollConfig> for PollSettings {
    fn from(config: &PollConfig) -> Self {
        Self {
            interval: config.interval(),
            backoff_factor: config.backoff_factor,
            max_interval: config.max_interval(),
            max_wait: config.max_wait(),
        }
    }
}

/// Outcome of one poll iteration.
#[derive(Debug)]
pub enum PollProgress {
    /// Operation still running. The handle may carry an error message; that
    /// alone does not end the loop.
    InProgress(OperationHandle),
    /// Terminal snapshot. The poller issues no further queries.
    Completed(OperationHandle),
}

/// Drives a long-running operation to completion by repeated status queries.
///
/// Each iteration sleeps the current interval, then fetches a fresh handle.
/// An error message reported by the service is surfaced but does not stop
/// polling — only `done` does. That rule matches the service's operation
/// protocol, where an error can be recorded on a still-open operation; do
/// not "fix" this into stop-on-first-error.
///
/// A transport failure ends the loop immediately, and exceeding `max_wait`
/// yields [SpeechError::TimeoutExceeded]. Once any terminal outcome has been
/// returned, [OperationPoller::poll] returns `None` without touching the
/// service again.
pub struct OperationPoller<S> {
    service: S,
    name: String,
    settings: PollSettings,
    interval: Duration,
    started: Option<Instant>,
    finished: bool,
}

impl<S: SpeechService> OperationPoller<S> {
    pub fn new(service: S, handle: &OperationHandle, settings: PollSettings) -> Self {
        let interval = settings.interval;
        Self {
            service,
            name: handle.name.clone(),
            settings,
            interval,
            started: None,
            finished: false,
        }
    }

    /// Run one iteration: sleep, query, classify. Returns `None` once the
    /// operation is terminal or a fatal error was already reported.
    pub async fn poll(&mut self) -> Option<Result<PollProgress, SpeechError>> {
        if self.finished {
            return None;
        }

        let started = *self.started.get_or_insert_with(Instant::now);
        if let Some(max_wait) = self.settings.max_wait {
            let waited = started.elapsed();
            if waited >= max_wait {
                self.finished = true;
                return Some(Err(SpeechError::TimeoutExceeded {
                    name: self.name.clone(),
                    waited_ms: waited.as_millis() as u64,
                }));
            }
        }

        tokio::time::sleep(self.interval).await;
        self.grow_interval();

        match self.service.get_operation(&self.name).await {
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
            Ok(handle) => {
                if let Some(message) = handle.error_message() {
                    tracing::warn!(operation = %self.name, "service reported error: {message}");
                }
                if handle.done {
                    self.finished = true;
                    Some(Ok(PollProgress::Completed(handle)))
                } else {
                    Some(Ok(PollProgress::InProgress(handle)))
                }
            }
        }
    }

    fn grow_interval(&mut self) {
        if self.settings.backoff_factor > 1.0 {
            let next = self.interval.mul_f64(self.settings.backoff_factor);
            self.interval = next.min(self.settings.max_interval);
        }
    }
}
