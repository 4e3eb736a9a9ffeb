use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;
use setgen_build::{FileStatus, GenerationReport};
use std::io::Write;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// JSON output must stay parseable, so status lines are suppressed.
    pub fn is_json(&self) -> bool {
        self.options.output_format == OutputFormat::Json
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", self.decorate(ICONS.success, message, THEME.success));
        }
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.decorate(ICONS.error, message, THEME.error));
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", self.decorate(ICONS.warning, message, THEME.warning));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", self.decorate(ICONS.info, message, THEME.info));
        }
    }

    pub fn bullet(&self, text: &str) {
        if !self.options.quiet && !self.is_json() {
            let output = if self.options.no_color {
                format!("  {} {text}", ICONS.bullet)
            } else {
                format!("  {} {text}", ICONS.bullet.color(THEME.muted))
            };
            println!("{output}");
        }
    }

    /// Display progress indicator
    pub fn progress(&self, message: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }

        let output = if self.options.no_color {
            format!("{} {message}...", ICONS.loading)
        } else {
            format!(
                "{} {}...",
                ICONS.loading.color(THEME.highlight).bold(),
                message.color(THEME.highlight)
            )
        };

        print!("\r{output}");
        std::io::stdout().flush().ok();
    }

    /// Clear the current line after a progress indicator
    pub fn clear_line(&self) {
        if self.options.quiet || self.is_json() {
            return;
        }

        print!("\r{}\r", " ".repeat(80));
        std::io::stdout().flush().ok();
    }

    fn decorate(&self, icon: &str, message: &str, color: colored::Color) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }
}

/// Themed table with a bold header row.
pub fn themed_table(options: &GlobalOptions, headers: &[&str]) -> Table {
    let mut table = Table::new();

    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
    table
}

impl TableDisplay for GenerationReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["Source", "Status", "Output", "Details"]);

        for file in &self.files {
            let (status, color, output, details) = match &file.status {
                FileStatus::Generated {
                    output,
                    setters,
                    changed,
                } => (
                    "generated",
                    TableColor::Green,
                    output.display().to_string(),
                    format!("{setters} setters{}", if *changed { "" } else { ", unchanged" }),
                ),
                FileStatus::UpToDate { output } => {
                    ("up to date", TableColor::Green, output.display().to_string(), String::new())
                }
                FileStatus::Stale { output, missing } => (
                    "stale",
                    TableColor::Yellow,
                    output.display().to_string(),
                    if *missing { "missing".to_string() } else { "differs".to_string() },
                ),
                FileStatus::NothingToGenerate => ("skipped", TableColor::DarkGrey, String::new(), String::new()),
                FileStatus::Failed { kind, message } => (*kind, TableColor::Red, String::new(), message.clone()),
            };

            let status_cell = if options.no_color {
                Cell::new(status)
            } else {
                Cell::new(status).fg(color)
            };
            table.add_row(vec![
                Cell::new(file.source.display()),
                status_cell,
                Cell::new(output),
                Cell::new(details),
            ]);
        }

        if self.files.is_empty() {
            table.add_row(vec![Cell::new("No source files found")]);
        }

        table
    }

    fn to_compact(&self) -> String {
        format!(
            "files={} generated={} up_to_date={} stale={} failed={} setters={}",
            self.files.len(),
            self.generated(),
            self.up_to_date(),
            self.stale(),
            self.failed(),
            self.setters()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setgen_build::{FileOutcome, GenerateMode};
    use std::path::PathBuf;

    fn report() -> GenerationReport {
        let mut report = GenerationReport::new(GenerateMode::Write);
        report.files.push(FileOutcome {
            source: PathBuf::from("models/user.go"),
            status: FileStatus::Generated {
                output: PathBuf::from("models/user_setters.go"),
                setters: 2,
                changed: true,
            },
        });
        report.files.push(FileOutcome {
            source: PathBuf::from("models/broken.go"),
            status: FileStatus::Failed {
                kind: "parse",
                message: "expected type".to_string(),
            },
        });
        report
    }

    #[test]
    fn test_report_table() {
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        let rendered = report().to_table(&options).to_string();
        assert!(rendered.contains("models/user_setters.go"));
        assert!(rendered.contains("2 setters"));
        assert!(rendered.contains("expected type"));
    }

    #[test]
    fn test_report_compact() {
        assert_eq!(
            report().to_compact(),
            "files=2 generated=1 up_to_date=0 stale=0 failed=1 setters=2"
        );
    }

    #[test]
    fn test_output_manager_json() {
        let options = GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        assert!(manager.is_json());
        assert!(manager.display(&report()).is_ok());
    }

    #[test]
    fn test_output_manager_quiet() {
        let options = GlobalOptions {
            quiet: true,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        assert!(manager.display(&report()).is_ok());
    }
}
