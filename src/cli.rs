use clap::Parser;
use std::path::PathBuf;

use housekeeper::{FailurePolicy, Mode, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "housekeeper")]
#[command(about = "HouseKeeper keeps your house clean", long_about = None)]
pub struct Cli {
    /// Only run these jobs (default: all configured jobs)
    #[arg(value_name = "JOB")]
    pub jobs: Vec<String>,

    /// Report what would be removed without removing anything (default)
    #[arg(short = 'n', long)]
    pub noop: bool,

    /// Actually remove files
    #[arg(short = 'r', long)]
    pub run: bool,

    /// Suppress report output
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Job file or directory of job files [default: /etc/housekeeper]
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Continue with the remaining jobs when one fails
    #[arg(long)]
    pub keep_going: bool,
}

impl Cli {
    /// `--noop` wins over `--run`.
    pub fn mode(&self) -> Mode {
        if self.run && !self.noop {
            Mode::Execute
        } else {
            Mode::DryRun
        }
    }

    pub fn run_options(&self) -> RunOptions {
        let policy = if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };
        RunOptions {
            mode: self.mode(),
            failure_policy: policy,
        }
    }
}
