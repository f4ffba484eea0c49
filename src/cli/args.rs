//! Command-line argument parsing for RagBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// RagBuddy - answer questions over your documents
#[derive(Parser, Debug)]
#[command(name = "ragbuddy")]
#[command(version)]
#[command(about = "Answer questions over a document corpus with optional retrieval-augmented generation", long_about = None)]
pub struct Args {
    /// Question to answer (omit and use `start` for interactive mode)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Documents directory (overrides config)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Relevance threshold a chunk must exceed (overrides config)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Number of chunks to retrieve (overrides config)
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all logs except errors)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive REPL mode
    Start,

    /// Display effective configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check that exactly one of query or subcommand is given
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_none() && self.query.is_none() {
            return Err("Query required. Use 'ragbuddy <QUERY>' or 'ragbuddy start'.".to_string());
        }

        if self.command.is_some() && self.query.is_some() {
            return Err("Cannot specify query with subcommand.".to_string());
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(docs) = &self.docs {
            config.documents.dir = docs.to_string_lossy().into_owned();
        }
        if let Some(threshold) = self.threshold {
            config.retrieval.threshold = threshold;
        }
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show the spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
