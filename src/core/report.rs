use std::time::Duration;

use crate::core::error::JobError;
use crate::core::job::JobStatus;

/// Outcome of one job: elapsed wall-clock time from just before `start()`
/// to just after `wait()` returned, plus the captured error if it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub index: usize,
    pub name: String,
    pub elapsed: Duration,
    pub error: Option<JobError>,
}

impl JobReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn status(&self) -> JobStatus {
        if self.succeeded() {
            JobStatus::Succeeded
        } else {
            JobStatus::Failed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

pub fn summarize(reports: &[JobReport]) -> DispatchSummary {
    let failed = reports.iter().filter(|report| !report.succeeded()).count();
    DispatchSummary {
        succeeded: reports.len() - failed,
        failed,
    }
}
