use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// The remote side rejects the job at submission.
    Submit,
    /// The remote operation fails after it was accepted.
    Run,
    /// The wait deadline elapses before the remote side finishes.
    Timeout,
}

/// One line of a plan file: `NAME DURATION [fail=submit|run|timeout]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub name: String,
    pub duration: Duration,
    pub failure: Option<FailureMode>,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file: {0}")]
    Io(#[from] io::Error),
    #[error("plan line {line}: {message}")]
    Parse { line: usize, message: String },
}

static RE_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*\.?[0-9]+)(ms|s|m)$").unwrap());

pub fn parse_plan_file(path: &Path) -> Result<Vec<PlanEntry>, PlanError> {
    let file = File::open(path)?;
    parse_plan(BufReader::new(file))
}

/// Plan grammar: `#` starts a comment line, blank lines separate entries,
/// a trailing `\` continues the entry on the next line.
pub fn parse_plan<R: BufRead>(reader: R) -> Result<Vec<PlanEntry>, PlanError> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut entry_line = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() && current.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') {
            continue;
        }

        if current.is_empty() {
            entry_line = number + 1;
        }

        if let Some(stripped) = trimmed.strip_suffix('\\') {
            current.push_str(stripped.trim());
            current.push(' ');
        } else {
            current.push_str(trimmed);
            if !current.is_empty() {
                entries.push(parse_entry(&current, entry_line)?);
                current.clear();
            }
        }
    }

    if !current.is_empty() {
        entries.push(parse_entry(&current, entry_line)?);
    }

    Ok(entries)
}

fn parse_entry(text: &str, line: usize) -> Result<PlanEntry, PlanError> {
    let mut tokens = text.split_whitespace();

    let name = tokens.next().ok_or_else(|| PlanError::Parse {
        line,
        message: "missing job name".to_string(),
    })?;

    let duration_token = tokens.next().ok_or_else(|| PlanError::Parse {
        line,
        message: "missing duration".to_string(),
    })?;
    let duration = parse_duration(duration_token).ok_or_else(|| PlanError::Parse {
        line,
        message: format!("invalid duration \"{duration_token}\""),
    })?;

    let mut failure = None;
    for token in tokens {
        let Some(value) = token.strip_prefix("fail=") else {
            return Err(PlanError::Parse {
                line,
                message: format!("unexpected token \"{token}\""),
            });
        };
        failure = Some(match value {
            "submit" => FailureMode::Submit,
            "run" => FailureMode::Run,
            "timeout" => FailureMode::Timeout,
            other => {
                return Err(PlanError::Parse {
                    line,
                    message: format!("unknown failure mode \"{other}\""),
                })
            }
        });
    }

    Ok(PlanEntry {
        name: name.to_string(),
        duration,
        failure,
    })
}

pub fn parse_duration(token: &str) -> Option<Duration> {
    let caps = RE_DURATION.captures(token.trim())?;
    let value = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let factor = match caps.get(2)?.as_str() {
        "ms" => 0.001,
        "s" => 1.0,
        "m" => 60.0,
        _ => return None,
    };
    // The regex accepts any number of digits, so the product can overflow
    // Duration's range.
    Duration::try_from_secs_f64(value * factor).ok()
}
