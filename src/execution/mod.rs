//! Execution engine: per-version records and the sequential test loop.

use std::ffi::OsString;
use std::path::Path;

use anyhow::Result;

use crate::config::RunConfig;
use crate::interpreter::Interpreter;
use crate::printer::Printer;

pub mod python;

/// Arguments placed before the entry point: bytes warnings, default warning filter.
pub const INTERPRETER_FLAGS: &[&str] = &["-b", "-Wd"];

/// Status recorded for an explicitly requested interpreter that is not installed.
const MISSING_STATUS: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub version: String,
    pub status: i32,
}

impl ExecutionRecord {
    pub fn passed(&self) -> bool {
        self.status == 0
    }
}

/// One child process to start: interpreter, pass-through arguments and scratch directory.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub interpreter: &'a Interpreter,
    pub extra_args: &'a [String],
    pub tmpdir: &'a Path,
}

impl Invocation<'_> {
    /// Arguments following the executable.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = INTERPRETER_FLAGS.iter().map(OsString::from).collect();
        args.push(self.interpreter.entry_point.clone().into_os_string());
        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }

    /// Environment entries set on the child in addition to the inherited ones.
    pub fn env(&self) -> Vec<(&'static str, &Path)> {
        vec![("TMPDIR", self.tmpdir)]
    }

    pub fn display(&self) -> String {
        let mut line = self.interpreter.executable.display().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Starts a child for an invocation and waits for its exit status.
#[allow(async_fn_in_trait)]
pub trait Launcher {
    async fn launch(&mut self, invocation: &Invocation<'_>) -> Result<i32>;
}

/// Attempt every configured version in order. Children run strictly one after another.
pub async fn run_all<L: Launcher>(
    run: &RunConfig,
    tmpdir: &Path,
    launcher: &mut L,
    out: &Printer,
) -> Vec<ExecutionRecord> {
    let mut records = Vec::new();
    for interpreter in run.interpreters() {
        if interpreter.is_available() {
            out.good(&format!("Testing with Python {}...", interpreter.version));
            let invocation = Invocation {
                interpreter: &interpreter,
                extra_args: &run.extra_args,
                tmpdir,
            };
            out.debug(&invocation.display());
            let status = match launcher.launch(&invocation).await {
                Ok(status) => status,
                Err(e) => {
                    out.error(&format!("Failed to run Python {}: {:#}", interpreter.version, e));
                    1
                }
            };
            records.push(ExecutionRecord { version: interpreter.version, status });
        } else if !run.ignore_missing {
            out.error(&format!("Could not find requested Python {}", interpreter.version));
            records.push(ExecutionRecord { version: interpreter.version, status: MISSING_STATUS });
        } else {
            out.warning(&format!("Skip Python {}...", interpreter.version));
        }
        out.log("");
    }
    records
}

/// Sum of all recorded statuses, clamped to the largest exit code a process can report.
pub fn exit_status(records: &[ExecutionRecord]) -> u8 {
    let total: i64 = records.iter().map(|r| i64::from(r.status)).sum();
    total.clamp(0, i64::from(u8::MAX)) as u8
}
