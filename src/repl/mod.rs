//! REPL (Read-Eval-Print Loop) for querying documents interactively
//!
//! Plain text goes to the pipeline; a few keywords inspect the last
//! query or leave the session. A failed query is reported and the loop
//! carries on.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::rag::RagPipeline;
use crate::repl::commands::{Command, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    display_manager: DisplayManager,
    pipeline: RagPipeline,
}

impl ReplSession {
    /// Create new REPL session
    pub fn new(pipeline: RagPipeline) -> Result<Self> {
        Ok(Self::from_parts(InputHandler::new()?, pipeline))
    }

    /// Create REPL session with persistent history
    pub fn with_history(pipeline: RagPipeline, history_path: PathBuf) -> Result<Self> {
        Ok(Self::from_parts(
            InputHandler::with_history(history_path)?,
            pipeline,
        ))
    }

    fn from_parts(input_handler: InputHandler, pipeline: RagPipeline) -> Self {
        ReplSession {
            input_handler,
            command_handler: CommandHandler::new(),
            display_manager: DisplayManager::new(),
            pipeline,
        }
    }

    /// Replace the display manager (e.g. to disable the spinner)
    pub fn with_display(mut self, display_manager: DisplayManager) -> Self {
        self.display_manager = display_manager;
        self
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str) {
        self.display_manager.show_banner(
            version,
            self.pipeline.generator_name(),
            self.pipeline.threshold(),
        );
    }

    /// Run until the user exits or closes input
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.input_handler.read_line()? {
                InputEvent::Line(input) => {
                    if !self.handle_input(&input).await? {
                        break;
                    }
                }
                InputEvent::Interrupted => {
                    println!("\nType exit to quit gracefully");
                }
                InputEvent::Eof => break,
            }
        }

        self.save()
    }

    /// Handle one line of user input
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        match self.command_handler.parse(input) {
            Command::Query(query) => {
                self.run_query(&query).await;
                Ok(true)
            }
            command => {
                debug!(?command, "repl command");
                self.command_handler
                    .execute(command, &self.pipeline, &self.display_manager)
            }
        }
    }

    /// Answer a query and print the outcome
    async fn run_query(&mut self, query: &str) {
        self.display_manager.start_query(query);
        let outcome = self.pipeline.process_query(query).await;
        self.display_manager.finish_current();

        match outcome {
            Ok(record) => self.display_manager.show_response(&record),
            Err(e) => self.display_manager.show_error(&e.to_string()),
        }
    }

    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }

    /// Get display manager
    pub fn display(&self) -> &DisplayManager {
        &self.display_manager
    }

    /// Save session state
    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }
}
