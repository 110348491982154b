use std::fmt;

/// Outcome of a per-wallet pipeline step, as reported to the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Started,
    Processing,
    Success,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Started => "STARTED",
            StepStatus::Processing => "PROCESSING",
            StepStatus::Success => "SUCCESS",
            StepStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Structured observability sink, passed explicitly to each component
/// instead of living behind a process-wide singleton.
pub trait EventSink: Send + Sync {
    /// Emitted after every failed request attempt (attempt index / ceiling).
    fn attempt_failed(&self, operation: &str, attempt: u32, max_attempts: u32, error: &str);

    /// Per-wallet step progress.
    fn progress(&self, address: &str, step: &str, status: StepStatus);
}
