//! Console output: verbosity-gated status lines and the summary table.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::execution::ExecutionRecord;

const VERSION_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Good,
    Bad,
    Warn,
}

/// Applies colors only when they are enabled for this run.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub enabled: bool,
}

impl Palette {
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match tone {
            Tone::Good => format!("{}", text.green().bold()),
            Tone::Bad => format!("{}", text.red().bold()),
            Tone::Warn => format!("{}", text.yellow().bold()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub verbosity: i32,
    pub palette: Palette,
}

impl Printer {
    pub fn new(verbosity: i32, color: bool) -> Self {
        Self { verbosity, palette: Palette { enabled: color } }
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity > 1 {
            emit(&mut io::stdout(), message);
        }
    }

    pub fn log(&self, message: &str) {
        if self.verbosity > 0 {
            emit(&mut io::stdout(), message);
        }
    }

    pub fn good(&self, message: &str) {
        self.log(&self.palette.paint(message, Tone::Good));
    }

    pub fn warning(&self, message: &str) {
        if self.verbosity > -1 {
            emit(&mut io::stdout(), &self.palette.paint(message, Tone::Warn));
        }
    }

    pub fn error(&self, message: &str) {
        if self.verbosity > -1 {
            emit(&mut io::stderr(), &self.palette.paint(message, Tone::Bad));
        }
    }

    /// Shown down to `-q`; only `--verbosity -1` and below hide it.
    pub fn summary(&self, records: &[ExecutionRecord]) {
        if records.is_empty() || self.verbosity <= -1 {
            return;
        }
        emit(&mut io::stdout(), &format!("\nSummary:\n\n{}", render_summary(records, self.palette)));
    }
}

/// Write a message, appending a newline if it is missing.
fn emit(out: &mut dyn Write, message: &str) {
    if message.ends_with('\n') {
        let _ = write!(out, "{}", message);
    } else {
        let _ = writeln!(out, "{}", message);
    }
    let _ = out.flush();
}

/// Fixed-width table, one row per record.
pub fn render_summary(records: &[ExecutionRecord], palette: Palette) -> String {
    let header = format!("| {:<width$} | {}", "Version", "Status", width = VERSION_WIDTH);
    let mut table = format!("{}\n|{}\n", header, "-".repeat(header.len() - 1));
    for record in records {
        let (tone, label) = if record.passed() { (Tone::Good, "PASS") } else { (Tone::Bad, "FAIL") };
        let version = format!("{:<width$}", record.version, width = VERSION_WIDTH);
        table.push_str(&format!(
            "| {} | {}\n",
            palette.paint(&version, tone),
            palette.paint(label, tone)
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str, status: i32) -> ExecutionRecord {
        ExecutionRecord { version: version.into(), status }
    }

    #[test]
    fn test_render_summary_plain() {
        let records = vec![record("3.7", 0), record("pypy3", 1), record("3.8", 3)];
        let table = render_summary(&records, Palette { enabled: false });
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| Version    | Status");
        assert_eq!(lines[1], format!("|{}", "-".repeat(20)));
        assert_eq!(lines[2], "| 3.7        | PASS");
        assert_eq!(lines[3], "| pypy3      | FAIL");
        assert_eq!(lines[4], "| 3.8        | FAIL");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_render_summary_colored() {
        let table = render_summary(&[record("2.7", 0), record("3.5", 1)], Palette { enabled: true });
        assert!(table.contains('\u{1b}'));
        assert!(table.contains("PASS"));
        assert!(table.contains("FAIL"));
    }

    #[test]
    fn test_palette_disabled_is_identity() {
        let palette = Palette { enabled: false };
        assert_eq!(palette.paint("Skip Python 3.8...", Tone::Warn), "Skip Python 3.8...");
    }

    #[test]
    fn test_emit_appends_newline_once() {
        let mut buf: Vec<u8> = Vec::new();
        emit(&mut buf, "line");
        emit(&mut buf, "other\n");
        assert_eq!(String::from_utf8(buf).unwrap(), "line\nother\n");
    }
}
