use std::time::Duration;

use crate::core::event::DispatchEvent;
use crate::core::report::DispatchSummary;

/// One streaming line per finished job; `Started` transitions produce no
/// console line of their own.
pub fn format_event_line(event: &DispatchEvent) -> Option<String> {
    match event {
        DispatchEvent::Started { .. } => None,
        DispatchEvent::Succeeded { name, elapsed, .. } => {
            Some(format!("ok     : {name} finished in {}", format_duration(*elapsed)))
        }
        DispatchEvent::Failed {
            name,
            elapsed,
            error,
            ..
        } => Some(format!(
            "failed : {name} after {}: {error}",
            format_duration(*elapsed)
        )),
    }
}

pub fn format_summary_line(summary: &DispatchSummary, wall_time: Duration) -> String {
    format!(
        "Final  : {} succeeded, {} failed, wall time {}",
        summary.succeeded,
        summary.failed,
        format_duration(wall_time)
    )
}

pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        return format!("{}ms", duration.as_millis());
    }
    if duration < Duration::from_secs(60) {
        return format!("{:.2}s", duration.as_secs_f64());
    }
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
