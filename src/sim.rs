use std::thread;
use std::time::Duration;

use crate::core::error::JobError;
use crate::core::job::Job;
use crate::core::plan::{FailureMode, PlanEntry};

/// Simulated remote job: `start` returns immediately, `wait` sleeps for the
/// configured duration. A failure mode injects the matching error, which is
/// how the CLI exercises the dispatcher without a remote platform.
#[derive(Debug, Clone)]
pub struct SimJob {
    name: String,
    duration: Duration,
    failure: Option<FailureMode>,
}

impl SimJob {
    pub fn new(name: String, duration: Duration, failure: Option<FailureMode>) -> Self {
        SimJob {
            name,
            duration,
            failure,
        }
    }

    pub fn from_entry(entry: PlanEntry) -> Self {
        SimJob {
            name: entry.name,
            duration: entry.duration,
            failure: entry.failure,
        }
    }
}

impl Job for SimJob {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> Result<(), JobError> {
        if self.failure == Some(FailureMode::Submit) {
            return Err(JobError::Submission(format!(
                "{} rejected by remote",
                self.name
            )));
        }
        Ok(())
    }

    fn wait(&mut self) -> Result<(), JobError> {
        match self.failure {
            // A remote failure surfaces as soon as the poll sees it, not
            // after the full simulated duration.
            Some(FailureMode::Run) => Err(JobError::Execution(format!(
                "{} failed remotely",
                self.name
            ))),
            Some(FailureMode::Timeout) => {
                thread::sleep(self.duration);
                Err(JobError::Timeout(self.duration))
            }
            _ => {
                thread::sleep(self.duration);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_job_succeeds_after_sleeping() {
        let mut job = SimJob::new("job-1".to_string(), Duration::from_millis(5), None);
        assert!(job.start().is_ok());
        assert!(job.wait().is_ok());
    }

    #[test]
    fn submit_failure_happens_in_start() {
        let mut job = SimJob::new(
            "job-1".to_string(),
            Duration::from_millis(5),
            Some(FailureMode::Submit),
        );
        assert!(matches!(job.start(), Err(JobError::Submission(_))));
    }

    #[test]
    fn run_failure_is_immediate() {
        let mut job = SimJob::new(
            "job-1".to_string(),
            Duration::from_secs(30),
            Some(FailureMode::Run),
        );
        assert!(job.start().is_ok());
        assert!(matches!(job.wait(), Err(JobError::Execution(_))));
    }

    #[test]
    fn timeout_failure_carries_the_deadline() {
        let mut job = SimJob::new(
            "job-1".to_string(),
            Duration::from_millis(5),
            Some(FailureMode::Timeout),
        );
        assert!(job.start().is_ok());
        assert_eq!(
            job.wait(),
            Err(JobError::Timeout(Duration::from_millis(5)))
        );
    }
}
