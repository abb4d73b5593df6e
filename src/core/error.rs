use std::time::Duration;

use thiserror::Error;

/// Failure of a single remote job. Captured at the worker boundary and
/// carried in the job's report; never escapes a dispatch cycle as an `Err`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JobError {
    #[error("remote submission rejected: {0}")]
    Submission(String),
    #[error("remote execution failed: {0}")]
    Execution(String),
    #[error("remote wait exceeded deadline of {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
    #[error("job batch is empty")]
    EmptyBatch,
}
