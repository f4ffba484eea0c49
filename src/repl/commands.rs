//! Command handler for REPL built-in commands
//!
//! Everything that is not a recognised command is treated as a query.
//! Keywords work bare (`logs`, `exit`) and with a leading slash.

use anyhow::Result;
use colored::*;

use crate::rag::RagPipeline;
use crate::repl::display::DisplayManager;
use crate::types::LastTrace;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Logs,
    Clear,
    Exit,
    Query(String),
    Unknown { input: String },
}

/// True when the input is handled by the REPL instead of the pipeline
pub fn is_command(input: &str) -> bool {
    !matches!(parse_command(input), Command::Query(_))
}

/// Parse one line of input
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    if let Some(rest) = trimmed.strip_prefix('/') {
        let name = rest.split_whitespace().next().unwrap_or("").to_lowercase();
        return match name.as_str() {
            "help" | "h" => Command::Help,
            "logs" | "log" | "trace" => Command::Logs,
            "clear" | "cls" => Command::Clear,
            "exit" | "quit" | "q" | "bye" => Command::Exit,
            _ => Command::Unknown {
                input: trimmed.to_string(),
            },
        };
    }

    match trimmed.to_lowercase().as_str() {
        "logs" | "log" => Command::Logs,
        "exit" | "quit" | "bye" => Command::Exit,
        _ => Command::Query(trimmed.to_string()),
    }
}

/// Executes the commands that do not need the generator
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler
    }

    pub fn parse(&self, input: &str) -> Command {
        parse_command(input)
    }

    /// Execute a non-query command
    ///
    /// Returns true if REPL should continue, false if should exit
    pub fn execute(
        &self,
        command: Command,
        pipeline: &RagPipeline,
        display: &DisplayManager,
    ) -> Result<bool> {
        match command {
            Command::Help => {
                self.show_help();
                Ok(true)
            }
            Command::Logs => {
                match pipeline.get_last_trace() {
                    LastTrace::NoPriorQuery => display.show_no_prior_query(),
                    LastTrace::Trace(entries) => display.show_trace(&entries),
                }
                Ok(true)
            }
            Command::Clear => {
                display.clear_screen()?;
                Ok(true)
            }
            Command::Exit => {
                println!("{}", "Goodbye!".green());
                Ok(false)
            }
            Command::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
                Ok(true)
            }
            Command::Query(_) => Ok(true),
        }
    }

    /// Display help information
    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("logs, log, /logs", "Show the trace of the last query"),
            ("/help, /h", "Show this help message"),
            ("/clear, /cls", "Clear screen"),
            ("exit, quit, bye", "Exit REPL"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Type a question to query your documents");
        println!("  - Use {} for command history", "UP/DOWN arrows".cyan());
        println!("  - Press {} or type {} to exit", "Ctrl-D".cyan(), "exit".cyan());
        println!();
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
