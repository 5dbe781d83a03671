//! Output formatting for the Sitestack CLI.
//!
//! Provides colored console output in the usual plan vocabulary: creates
//! green, updates yellow, deletes red.

use colored::Colorize;

use sitestack::state::ChangeKind;

/// Console output formatter.
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// JSON output mode suppresses decorations entirely
    json_mode: bool,
    /// Verbosity level
    verbosity: u8,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(use_color: bool, json_mode: bool, verbosity: u8) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();

        Self {
            use_color,
            json_mode,
            verbosity,
        }
    }

    /// Whether JSON mode is active.
    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Print a banner/header.
    pub fn banner(&self, title: &str) {
        if self.json_mode {
            return;
        }
        let line = "=".repeat(title.len() + 4);
        if self.use_color {
            println!("\n{}", line.bright_blue());
            println!("{}", format!("  {}  ", title).bright_blue().bold());
            println!("{}\n", line.bright_blue());
        } else {
            println!("\n{}", line);
            println!("  {}  ", title);
            println!("{}\n", line);
        }
    }

    /// Print a section header.
    pub fn section(&self, title: &str) {
        if self.json_mode {
            return;
        }
        if self.use_color {
            println!("\n{}", title.cyan().bold());
            println!("{}", "-".repeat(title.len()).cyan());
        } else {
            println!("\n{}", title);
            println!("{}", "-".repeat(title.len()));
        }
    }

    /// Print an informational line.
    pub fn info(&self, message: &str) {
        if self.json_mode {
            return;
        }
        println!("{}", message);
    }

    /// Print a warning line.
    pub fn warning(&self, message: &str) {
        if self.json_mode {
            return;
        }
        if self.use_color {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Print an error line.
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "error:".red().bold(), message);
        } else {
            eprintln!("error: {}", message);
        }
    }

    /// Print a debug line (verbosity >= 2).
    pub fn debug(&self, message: &str) {
        if self.json_mode || self.verbosity < 2 {
            return;
        }
        if self.use_color {
            println!("{} {}", "debug:".dimmed(), message.dimmed());
        } else {
            println!("debug: {}", message);
        }
    }

    /// Print one planned change.
    pub fn change(&self, change: ChangeKind, kind: &str, id: &str, detail: Option<&str>) {
        if self.json_mode {
            return;
        }
        let (marker, label) = match change {
            ChangeKind::Create => ("+", "create"),
            ChangeKind::Update => ("~", "update"),
            ChangeKind::Delete => ("-", "delete"),
            ChangeKind::NoOp => (" ", "no-op"),
        };
        let line = format!("{} {:<22} {} [{}]", marker, label, id, kind);
        if self.use_color {
            let colored = match change {
                ChangeKind::Create => line.green().to_string(),
                ChangeKind::Update => line.yellow().to_string(),
                ChangeKind::Delete => line.red().bold().to_string(),
                ChangeKind::NoOp => line.dimmed().to_string(),
            };
            println!("{}", colored);
        } else {
            println!("{}", line);
        }
        if let Some(detail) = detail {
            if self.verbosity >= 1 {
                for detail_line in detail.lines() {
                    println!("    {}", detail_line);
                }
            }
        }
    }

    /// Print a named value, e.g. an output.
    pub fn value(&self, name: &str, value: &str, description: &str) {
        if self.json_mode {
            return;
        }
        if self.use_color {
            println!("{:<28} {}  {}", name.bold(), value, description.dimmed());
        } else {
            println!("{:<28} {}  ({})", name, value, description);
        }
    }
}
