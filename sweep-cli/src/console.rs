//! Coloured terminal implementation of [`Logger`].

use colored::Colorize;
use sweep_prune::Logger;

/// Writes levelled, coloured lines. Warnings and errors go to stderr.
///
/// With `stdout_reserved` set (JSON output mode) every line goes to stderr so
/// stdout carries only the machine-readable report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger {
    pub stdout_reserved: bool,
}

impl ConsoleLogger {
    pub fn new(stdout_reserved: bool) -> Self {
        Self { stdout_reserved }
    }

    fn out(&self, line: String) {
        if self.stdout_reserved {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

impl Logger for ConsoleLogger {
    fn info(&self, message: &str) {
        self.out(format!("{} {message}", "ℹ".blue()));
    }

    fn success(&self, message: &str) {
        self.out(format!("{} {}", "✓".green(), message.green()));
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}
