// Presentation layer. `Presenter` either renders gist listings to the
// terminal or accumulates them as structured values for library callers; the
// two modes always carry identical field content. `Reporter` is the small
// logging adapter behind the `--no-logging` flag.

use std::time::Duration;

use crossterm::style::Stylize;
use crossterm::terminal;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::model::Gist;

/// Per-file fields shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub size: u64,
    pub language: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Listing entry for one gist, identical in console and collect mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GistSummary {
    pub id: String,
    pub public: bool,
    pub description: Option<String>,
    pub files: Vec<FileSummary>,
}

impl GistSummary {
    pub fn from_gist(gist: &Gist) -> Self {
        let files = gist
            .files
            .iter()
            .map(|(name, file)| FileSummary {
                name: name.clone(),
                size: file.size,
                language: file.language.clone(),
                created_at: gist.created_at.clone(),
                updated_at: gist.updated_at.clone(),
            })
            .collect();
        GistSummary {
            id: gist.id.clone(),
            public: gist.public,
            description: gist.description.clone(),
            files,
        }
    }
}

/// Output target chosen at construction time: styled terminal output, or an
/// in-memory sequence handed back once the listing is complete.
pub enum Presenter {
    Console,
    Collect(Vec<GistSummary>),
}

impl Presenter {
    pub fn console() -> Self {
        Presenter::Console
    }

    pub fn collect() -> Self {
        Presenter::Collect(Vec::new())
    }

    /// Emit one gist. `index` is the ordinal position in the listing.
    pub fn emit(&mut self, index: usize, summary: GistSummary) {
        match self {
            Presenter::Console => print_summary(index, &summary),
            Presenter::Collect(entries) => entries.push(summary),
        }
    }

    /// Hand back the accumulated entries; empty in console mode.
    pub fn into_collected(self) -> Vec<GistSummary> {
        match self {
            Presenter::Console => Vec::new(),
            Presenter::Collect(entries) => entries,
        }
    }
}

fn terminal_width() -> usize {
    terminal::size().map(|(cols, _)| cols as usize).unwrap_or(80)
}

fn rule(label: &str) {
    let width = terminal_width();
    if label.is_empty() {
        println!("{}", "─".repeat(width));
        return;
    }
    let used = label.len() + 4;
    let tail = width.saturating_sub(used);
    println!("{} {} {}", "──", label.to_string().cyan().bold(), "─".repeat(tail));
}

fn print_summary(index: usize, summary: &GistSummary) {
    rule(&format!("Gist#{index}"));
    println!("{}", format!("GistId: {}", summary.id).yellow());
    let publicity = if summary.public { "Public" } else { "Private" };
    println!("{}", format!("Publicity: {publicity}").blue());
    let description = summary.description.as_deref().unwrap_or("None");
    println!("{}", format!("Description: {description}").grey());
    println!("{}", "Files".magenta().bold());
    for file in &summary.files {
        println!("├── {}", file.name.as_str().green());
        println!("│     Filesize: {} bytes", file.size);
        println!("│     Language: {}", file.language.as_deref().unwrap_or("None"));
        println!("│     Created at: {}", file.created_at);
        println!("│     Updated at: {}", file.updated_at);
    }
    rule("");
}

/// Event logger for the interactive CLI. All output is suppressed when the
/// caller asked for quiet operation or runs the crate as a library.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    enabled: bool,
}

impl Reporter {
    pub fn new(enabled: bool) -> Self {
        Reporter { enabled }
    }

    pub fn silenced(self) -> Self {
        Reporter { enabled: false }
    }

    pub fn info(&self, message: &str) {
        if self.enabled {
            println!("{} {message}", "info:".green().bold());
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled {
            eprintln!("{} {message}", "error:".red().bold());
        }
    }

    /// Spinner shown while a blocking transfer runs. `None` when quiet.
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }
}
