use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

pub mod error;
pub mod event;
pub mod formatter;
pub mod job;
pub mod plan;
pub mod report;
pub mod runner;

use error::DispatchError;
use event::DispatchEvent;
use job::Job;
use report::JobReport;

/// Run one dispatch cycle to completion on the calling thread, discarding
/// the event stream. Returns one report per submitted job, in completion
/// order.
pub fn dispatch(jobs: Vec<Box<dyn Job>>, workers: usize) -> Result<Vec<JobReport>, DispatchError> {
    let (event_tx, _event_rx) = mpsc::channel();
    runner::run_with_events(jobs, workers, event_tx)
}

/// Run a dispatch cycle on a background thread and stream its
/// `DispatchEvent`s to the caller. The join handle yields the cycle's own
/// result once the event stream has been drained; a join error means the
/// dispatch thread died and must not be read as an empty, successful batch.
pub fn dispatch_with_events(
    jobs: Vec<Box<dyn Job>>,
    workers: usize,
) -> Result<
    (
        Receiver<DispatchEvent>,
        JoinHandle<Result<Vec<JobReport>, DispatchError>>,
    ),
    DispatchError,
> {
    if workers == 0 {
        return Err(DispatchError::InvalidWorkerCount);
    }
    if jobs.is_empty() {
        return Err(DispatchError::EmptyBatch);
    }

    let (event_tx, event_rx) = mpsc::channel();
    let handle = thread::spawn(move || runner::run_with_events(jobs, workers, event_tx));

    Ok((event_rx, handle))
}
