use std::time::Duration;

use crate::core::error::JobError;

/// State transition of one job inside a dispatch cycle, emitted as it
/// happens. `index` is the job's position in the submitted batch, which is
/// how results stay attached to the right job whatever the completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    Started {
        index: usize,
        name: String,
    },
    Succeeded {
        index: usize,
        name: String,
        elapsed: Duration,
    },
    Failed {
        index: usize,
        name: String,
        elapsed: Duration,
        error: JobError,
    },
}

impl DispatchEvent {
    pub fn index(&self) -> usize {
        match self {
            DispatchEvent::Started { index, .. }
            | DispatchEvent::Succeeded { index, .. }
            | DispatchEvent::Failed { index, .. } => *index,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DispatchEvent::Started { name, .. }
            | DispatchEvent::Succeeded { name, .. }
            | DispatchEvent::Failed { name, .. } => name,
        }
    }
}
