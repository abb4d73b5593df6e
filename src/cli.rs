use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core;
use crate::core::error::DispatchError;
use crate::core::formatter::{format_event_line, format_summary_line};
use crate::core::job::Job;
use crate::core::plan::{self, FailureMode, PlanError};
use crate::core::report::{summarize, DispatchSummary};
use crate::sim::SimJob;

#[derive(Debug, Parser)]
#[command(
    name = "jobfan",
    version,
    about = "Bounded parallel fan-out runner for long-running jobs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Simulate a batch of uniform jobs
    Run(RunArgs),
    /// Run the jobs described by a plan file
    Plan(PlanArgs),
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Number of jobs to simulate
    #[arg(short = 'j', long = "jobs", default_value_t = 5)]
    pub jobs: usize,
    /// Worker pool size
    #[arg(short = 'w', long = "workers", default_value_t = 4)]
    pub workers: usize,
    /// Simulated remote duration per job, in milliseconds
    #[arg(short = 'd', long = "duration-ms", default_value_t = 1000)]
    pub duration_ms: u64,
    /// 1-based index of a job that should fail (repeatable)
    #[arg(long = "fail", value_name = "INDEX")]
    pub fail: Vec<usize>,
    /// How the failing jobs fail
    #[arg(long = "fail-mode", value_enum, default_value_t = FailModeArg::Run)]
    pub fail_mode: FailModeArg,
}

#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Path to a plan file, one job per line: NAME DURATION [fail=MODE]
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Worker pool size
    #[arg(short = 'w', long = "workers", default_value_t = 4)]
    pub workers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailModeArg {
    Submit,
    Run,
    Timeout,
}

impl From<FailModeArg> for FailureMode {
    fn from(mode: FailModeArg) -> Self {
        match mode {
            FailModeArg::Submit => FailureMode::Submit,
            FailModeArg::Run => FailureMode::Run,
            FailModeArg::Timeout => FailureMode::Timeout,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("dispatch cycle aborted before all jobs were collected")]
    Aborted,
}

pub fn execute(command: Commands) -> Result<DispatchSummary, CliError> {
    match command {
        Commands::Run(args) => {
            let workers = args.workers;
            run_batch(build_uniform_batch(&args), workers)
        }
        Commands::Plan(args) => {
            let entries = plan::parse_plan_file(&args.file)?;
            let jobs = entries
                .into_iter()
                .map(|entry| Box::new(SimJob::from_entry(entry)) as Box<dyn Job>)
                .collect();
            run_batch(jobs, args.workers)
        }
    }
}

fn build_uniform_batch(args: &RunArgs) -> Vec<Box<dyn Job>> {
    let duration = Duration::from_millis(args.duration_ms);
    (1..=args.jobs)
        .map(|position| {
            let failure = args
                .fail
                .contains(&position)
                .then(|| FailureMode::from(args.fail_mode));
            Box::new(SimJob::new(format!("job-{position}"), duration, failure)) as Box<dyn Job>
        })
        .collect()
}

fn run_batch(jobs: Vec<Box<dyn Job>>, workers: usize) -> Result<DispatchSummary, CliError> {
    info!(jobs = jobs.len(), workers, "dispatching batch");

    let started = Instant::now();
    let (event_rx, handle) = core::dispatch_with_events(jobs, workers)?;

    for event in event_rx {
        match format_event_line(&event) {
            Some(line) => println!("{line}"),
            None => debug!(job = %event.name(), index = event.index(), "job started"),
        }
    }

    // A dead dispatch thread must surface as a failure, not as an empty
    // batch that summarizes to success.
    let reports = handle.join().map_err(|_| CliError::Aborted)??;
    let summary = summarize(&reports);
    println!("{}", format_summary_line(&summary, started.elapsed()));

    if !summary.all_succeeded() {
        warn!(
            failed = summary.failed,
            total = summary.total(),
            "batch finished with failures"
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn run_args_parse_with_defaults() {
        let cli = Cli::try_parse_from(["jobfan", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.jobs, 5);
        assert_eq!(args.workers, 4);
        assert_eq!(args.duration_ms, 1000);
        assert!(args.fail.is_empty());
        assert_eq!(args.fail_mode, FailModeArg::Run);
    }

    #[test]
    fn fail_flag_repeats() {
        let cli = Cli::try_parse_from([
            "jobfan",
            "run",
            "--jobs",
            "8",
            "--fail",
            "3",
            "--fail",
            "5",
            "--fail-mode",
            "timeout",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.fail, vec![3, 5]);
        assert_eq!(args.fail_mode, FailModeArg::Timeout);
    }

    #[test]
    fn uniform_batch_marks_only_listed_jobs() {
        let args = RunArgs {
            jobs: 3,
            workers: 2,
            duration_ms: 1,
            fail: vec![2],
            fail_mode: FailModeArg::Run,
        };
        let mut jobs = build_uniform_batch(&args);
        assert_eq!(jobs.len(), 3);
        assert!(jobs[0].start().is_ok());
        assert_eq!(jobs[1].name(), "job-2");
        assert!(jobs[1].start().is_ok());
        assert!(jobs[1].wait().is_err());
    }

    #[test]
    fn execute_reports_failures_in_summary() {
        let args = RunArgs {
            jobs: 5,
            workers: 5,
            duration_ms: 1,
            fail: vec![3],
            fail_mode: FailModeArg::Run,
        };
        let summary = execute(Commands::Run(args)).unwrap();
        assert_eq!(summary.succeeded, 4);
        assert_eq!(summary.failed, 1);
    }

    struct ExplodingJob;

    impl Job for ExplodingJob {
        fn name(&self) -> &str {
            "job-1"
        }

        fn start(&mut self) -> Result<(), crate::core::error::JobError> {
            Ok(())
        }

        fn wait(&mut self) -> Result<(), crate::core::error::JobError> {
            panic!("remote poll blew up");
        }
    }

    #[test]
    fn panicked_job_counts_as_failure_not_success() {
        let jobs: Vec<Box<dyn Job>> = vec![Box::new(ExplodingJob)];
        let summary = run_batch(jobs, 1).unwrap();
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let args = RunArgs {
            jobs: 2,
            workers: 0,
            duration_ms: 1,
            fail: Vec::new(),
            fail_mode: FailModeArg::Run,
        };
        let err = execute(Commands::Run(args)).unwrap_err();
        assert!(matches!(
            err,
            CliError::Dispatch(DispatchError::InvalidWorkerCount)
        ));
    }
}
