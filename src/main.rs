mod cli;
mod config;
mod execution;
mod interpreter;
mod printer;
mod scratch;

use std::process::ExitCode;

use anyhow::Result;
use config::{Config, RunConfig};
use execution::python::PythonLauncher;
use printer::Printer;
use scratch::ScratchDir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    // Validate everything up front: a bad --color or $NOCOLOR fails before any child runs.
    let cfg = Config::load();
    let run = RunConfig::from_cli(&args, &cfg)?;
    let out = Printer::new(run.verbosity, run.color);

    let scratch = ScratchDir::create()?;
    out.debug(&format!("Using temporary directory {}", scratch.path().display()));

    let mut launcher = PythonLauncher;
    let outcome = tokio::select! {
        records = execution::run_all(&run, scratch.path(), &mut launcher, &out) => Some(records),
        _ = interrupted() => None,
    };

    match outcome {
        Some(records) => {
            out.summary(&records);
            release(scratch, run.keep_temp, &out);
            Ok(ExitCode::from(execution::exit_status(&records)))
        }
        None => {
            release(scratch, run.keep_temp, &out);
            out.error("interrupted ...");
            Ok(ExitCode::from(1))
        }
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed the run is simply not interruptible.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn release(scratch: ScratchDir, keep: bool, out: &Printer) {
    if keep {
        let path = scratch.keep();
        out.log(&format!("Temporary directory left behind:\n{}", path.display()));
    }
}
