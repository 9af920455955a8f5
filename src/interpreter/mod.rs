//! Interpreter version lists and filesystem layout.

use std::path::{Path, PathBuf};

/// Versions the test suite must pass on.
pub const SUPPORTED_VERSIONS: &[&str] = &["2.7", "3.5", "3.6", "3.7"];
/// Versions that are tried when present; failures there are tolerated.
pub const NICE_VERSIONS: &[&str] = &["pypy", "pypy3", "3.8"];

/// Alternate implementations whose executable is named after the token itself.
const ALTERNATE_IMPLEMENTATIONS: &[&str] = &["pypy", "pypy3"];

const SUPPORTED_KEYWORD: &str = "supported";
const ENTRY_POINT: &[&str] = &["site-packages", "portage", "tests", "runTests.py"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSelection {
    pub versions: Vec<String>,
    pub ignore_missing: bool,
}

impl VersionSelection {
    /// Expand `--python-versions` values. An empty list selects every known
    /// version and tolerates missing interpreters.
    pub fn from_args(values: &[String]) -> Self {
        if values.is_empty() {
            let versions = SUPPORTED_VERSIONS
                .iter()
                .chain(NICE_VERSIONS)
                .map(|v| v.to_string())
                .collect();
            return Self { versions, ignore_missing: true };
        }

        let mut versions = Vec::new();
        for value in values {
            if value == SUPPORTED_KEYWORD {
                versions.extend(SUPPORTED_VERSIONS.iter().map(|v| v.to_string()));
            } else {
                versions.extend(value.split_whitespace().map(str::to_string));
            }
        }
        Self { versions, ignore_missing: false }
    }
}

/// A version token with its executable and test entry point resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub version: String,
    pub executable: PathBuf,
    pub entry_point: PathBuf,
}

impl Interpreter {
    pub fn resolve(root: &Path, version: &str) -> Self {
        let program = program_name(version);
        let executable = root.join("usr").join("bin").join(&program);
        let mut entry_point = root.join("usr").join("lib64").join(&program);
        entry_point.extend(ENTRY_POINT);
        Self { version: version.to_string(), executable, entry_point }
    }

    pub fn is_available(&self) -> bool {
        is_executable(&self.executable)
    }
}

pub fn program_name(version: &str) -> String {
    if ALTERNATE_IMPLEMENTATIONS.contains(&version) {
        version.to_string()
    } else {
        format!("python{}", version)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
