use colored::Colorize;

/// Kind of status line, for `--quiet` filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Progress and success lines.
    Status,
    /// Warnings about a degraded but non-fatal path.
    Degraded,
    /// Fatal problems.
    Failure,
}

/// Console status lines. `--quiet` hides status lines only; warnings and
/// failures always print.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    pub quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn shows(&self, line: Line) -> bool {
        line != Line::Status || !self.quiet
    }

    pub fn success(&self, message: impl AsRef<str>) {
        if self.shows(Line::Status) {
            println!("  {} {}", "✓".green(), message.as_ref());
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if self.shows(Line::Status) {
            println!("{} {}", "info:".blue().bold(), message.as_ref());
        }
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        if self.shows(Line::Degraded) {
            eprintln!("{} {}", "warning:".yellow().bold(), message.as_ref());
        }
    }

    pub fn failure(&self, message: impl AsRef<str>) {
        if self.shows(Line::Failure) {
            eprintln!("  {} {}", "✗".red(), message.as_ref());
        }
    }

    pub fn finished(&self, verb: &str, message: impl AsRef<str>) {
        if self.shows(Line::Status) {
            println!("   {} {}", verb.green().bold(), message.as_ref());
        }
    }
}
