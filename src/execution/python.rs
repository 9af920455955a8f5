//! Spawns the Python interpreter on the portage test entry point.

use std::process::ExitStatus;

use anyhow::{Context, Result};
use tokio::process::Command;

use super::{Invocation, Launcher};

/// Runs each invocation as a real child process inheriting stdio.
#[derive(Debug, Default)]
pub struct PythonLauncher;

impl Launcher for PythonLauncher {
    async fn launch(&mut self, invocation: &Invocation<'_>) -> Result<i32> {
        let mut cmd = Command::new(&invocation.interpreter.executable);
        cmd.args(invocation.args());
        for (key, value) in invocation.env() {
            cmd.env(key, value);
        }
        let status = cmd
            .status()
            .await
            .with_context(|| format!("failed to spawn {}", invocation.interpreter.executable.display()))?;
        Ok(status_code(status))
    }
}

/// Exit code of a finished child; death by signal `S` maps to `128 + S`.
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
