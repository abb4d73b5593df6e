use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::core::error::{DispatchError, JobError};
use crate::core::event::DispatchEvent;
use crate::core::job::Job;
use crate::core::report::JobReport;

type JobQueue = Arc<Mutex<Receiver<(usize, Box<dyn Job>)>>>;

/// Run one dispatch cycle: at most `workers` jobs are between `start()` and
/// the return of `wait()` at any instant, a freed slot always picks up the
/// lowest-index unstarted job, and the returned reports are in completion
/// order. Every worker thread is joined before this returns.
pub fn run_with_events(
    jobs: Vec<Box<dyn Job>>,
    workers: usize,
    event_tx: Sender<DispatchEvent>,
) -> Result<Vec<JobReport>, DispatchError> {
    if workers == 0 {
        return Err(DispatchError::InvalidWorkerCount);
    }
    if jobs.is_empty() {
        return Err(DispatchError::EmptyBatch);
    }

    let total = jobs.len();

    // Seed the whole batch up front; the channel preserves submission order
    // and the sender is dropped so idle workers see disconnection, not an
    // empty queue they should keep waiting on.
    let (queue_tx, queue_rx) = mpsc::channel::<(usize, Box<dyn Job>)>();
    for entry in jobs.into_iter().enumerate() {
        let _ = queue_tx.send(entry);
    }
    drop(queue_tx);

    let queue: JobQueue = Arc::new(Mutex::new(queue_rx));
    let (report_tx, report_rx) = mpsc::channel::<JobReport>();

    let mut handles = Vec::new();
    for _ in 0..workers.min(total) {
        let queue = Arc::clone(&queue);
        let report_tx = report_tx.clone();
        let event_tx = event_tx.clone();
        handles.push(thread::spawn(move || {
            run_worker(queue, report_tx, event_tx);
        }));
    }

    // The collecting loop below must only see the workers' clones.
    drop(report_tx);
    drop(event_tx);

    let mut reports = Vec::with_capacity(total);
    for report in report_rx {
        reports.push(report);
    }

    for handle in handles {
        let _ = handle.join();
    }

    Ok(reports)
}

fn run_worker(queue: JobQueue, report_tx: Sender<JobReport>, event_tx: Sender<DispatchEvent>) {
    loop {
        // All senders are gone once the batch is seeded, so recv() never
        // blocks while the lock is held: it yields the next job or
        // disconnection.
        let next = match queue.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };

        let (index, mut job) = match next {
            Ok(entry) => entry,
            Err(_) => break,
        };

        let name = job.name().to_string();
        let _ = event_tx.send(DispatchEvent::Started {
            index,
            name: name.clone(),
        });
        debug!(job = %name, index, "picked up by worker");

        let started = Instant::now();
        // A panicking job must still yield a report; caught here so the
        // worker slot survives for the rest of the queue.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            job.start().and_then(|_| job.wait())
        }))
        .unwrap_or_else(|_| Err(JobError::Execution("job panicked".to_string())));
        let elapsed = started.elapsed();

        match &result {
            Ok(()) => {
                let _ = event_tx.send(DispatchEvent::Succeeded {
                    index,
                    name: name.clone(),
                    elapsed,
                });
            }
            Err(error) => {
                let _ = event_tx.send(DispatchEvent::Failed {
                    index,
                    name: name.clone(),
                    elapsed,
                    error: error.clone(),
                });
            }
        }

        let _ = report_tx.send(JobReport {
            index,
            name,
            elapsed,
            error: result.err(),
        });
    }
}
