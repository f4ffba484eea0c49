//! Display manager for REPL terminal UI
//!
//! Renders responses, traces and errors, and shows a spinner while a
//! query is in flight.

use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

use crate::types::{ResponseRecord, RetrievedChunk, ToolUsed};

/// Characters of chunk content shown per retrieved chunk
pub const CHUNK_PREVIEW_CHARS: usize = 200;

/// Message shown when the trace is requested before any query completed
pub const NO_PRIOR_QUERY_MESSAGE: &str = "Invalid request. There was no query made previously.";

/// Display manager for REPL UI
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    show_progress: bool,
    update_interval: Duration,
}

impl DisplayManager {
    /// Create new display manager
    pub fn new() -> Self {
        DisplayManager {
            current_bar: None,
            show_progress: true,
            update_interval: Duration::from_millis(100),
        }
    }

    /// Disable the spinner (quiet mode)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, generator: &str, threshold: f32) {
        let width = 64;
        let top = format!("{}", "=".repeat(width).cyan());
        let title = format!("  RagBuddy {} - Ask Your Documents", version);
        let info = format!(
            "  Generator: {} | Threshold: {:.2} | Mode: REPL",
            generator, threshold
        );

        println!("\n{}", top);
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", top);
        println!(
            "Type a question (or {} for the last trace, {} for commands, {} to quit)\n",
            "logs".green(),
            "/help".green(),
            "exit".green()
        );
    }

    /// Start the spinner shown while a query runs
    pub fn start_query(&mut self, query: &str) {
        self.finish_current();
        if !self.show_progress {
            return;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Answering: {}", query));
        pb.enable_steady_tick(self.update_interval);
        self.current_bar = Some(pb);
    }

    /// Finish current spinner
    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a completed response
    pub fn show_response(&self, record: &ResponseRecord) {
        println!();
        println!("{} {}", "Query:".bold(), record.query);

        let tool = match record.tool_used {
            ToolUsed::Rag => record.tool_used.as_str().green().bold(),
            ToolUsed::None => record.tool_used.as_str().yellow().bold(),
        };
        println!("{} {}", "Tool used:".bold(), tool);

        if record.tool_used == ToolUsed::Rag {
            println!("{}", "Retrieved chunks:".bold());
            for (i, chunk) in record.retrieved_chunks.iter().enumerate() {
                println!("  {}", format_chunk_line(i + 1, chunk));
            }
        }

        println!("\n{}", "Result:".bold().cyan());
        println!("{}\n", record.result);
    }

    /// Print the steps of the last query
    pub fn show_trace(&self, entries: &[String]) {
        println!("\n{}", "Last query trace:".bold().cyan());
        println!("{}", "-".repeat(60).cyan());
        for entry in entries {
            println!("  {} {}", "•".cyan(), entry);
        }
        println!();
    }

    pub fn show_no_prior_query(&self) {
        self.show_warning(NO_PRIOR_QUERY_MESSAGE);
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per retrieved chunk: index, source, score and a content preview
pub fn format_chunk_line(position: usize, chunk: &RetrievedChunk) -> String {
    format!(
        "{}. [{}] (score: {:.2}) {}",
        position,
        chunk.source,
        chunk.relevance_score,
        preview(&chunk.content, CHUNK_PREVIEW_CHARS)
    )
}

/// First `max_chars` characters of `text` on one line, with an ellipsis if cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut)
}
