use std::io::Write;

use colored::{ColoredString, Colorize};
use rotalog_core::Level;

fn colored_level(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERROR".red(),
        Level::Warning => "WARNING".yellow(),
        Level::Info => "INFO".green(),
        Level::Debug => "DEBUG".blue(),
        Level::All => "ALL".purple(),
    }
}

/// Mirrors accepted records to stdout with a coloured level tag.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogStdout;

impl LogStdout {
    pub fn line(&self, level: Level, record: &str) -> String {
        format!("[{}] {record}", colored_level(level))
    }

    pub fn regular(&self, level: Level, record: &str) {
        let mut stdout = std::io::stdout().lock();
        // stdout being gone must not take the host down
        let _ = stdout.write_all(self.line(level, record).as_bytes());
        let _ = stdout.flush();
    }
}

#[test]
fn test_log_stdout() {
    let stdout = LogStdout;
    let line = stdout.line(Level::Warning, "2024-01-01T00:00:00.000 - disk almost full\n");
    assert!(line.contains("WARNING"));
    assert!(line.ends_with("] 2024-01-01T00:00:00.000 - disk almost full\n"));
    stdout.regular(Level::Info, "2024-01-01T00:00:00.000 - Hello, world!\n");
}
