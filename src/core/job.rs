use crate::core::error::JobError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// One opaque remote long-running operation.
///
/// The dispatcher calls `start` and then `wait` exactly once each, from the
/// worker thread that picked the job up. `start` returns once the remote
/// side has accepted the work; `wait` blocks until the remote side reaches a
/// terminal state. Any deadline on `wait` belongs to the implementation, not
/// to the dispatcher.
pub trait Job: Send {
    fn name(&self) -> &str;

    fn start(&mut self) -> Result<(), JobError>;

    fn wait(&mut self) -> Result<(), JobError>;
}
