//! RagBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use ragbuddy::{
    bootstrap::Bootstrap,
    cli::{Args, Commands, Verbosity},
    config::Config,
    logging,
    rag::RagPipeline,
    repl::{display::DisplayManager, input::default_history_path, ReplSession},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        eprintln!("\nUsage:");
        eprintln!("  ragbuddy <QUERY>         Answer one question and exit");
        eprintln!("  ragbuddy start           Interactive REPL mode");
        eprintln!("  ragbuddy config          Show configuration");
        eprintln!("\nExample:");
        eprintln!("  ragbuddy \"What products does the company offer?\"");
        std::process::exit(2);
    }

    logging::init(args.verbosity());

    let config = load_config(&args)?;

    match &args.command {
        Some(Commands::Config) => show_config(&args, &config)?,
        Some(Commands::Start) => run_repl(&args, config).await?,
        None => {
            if let Some(query) = &args.query {
                run_query(&args, config, query).await?;
            }
        }
    }

    Ok(())
}

/// Load the config file, then apply command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Build the pipeline, reporting a fatal configuration problem and exiting
async fn build_pipeline(args: &Args, config: Config) -> RagPipeline {
    let spinner = start_spinner(args.verbosity(), "Indexing documents...");
    let built = Bootstrap::new(config).build().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match built {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

async fn run_query(args: &Args, config: Config, query: &str) -> Result<()> {
    let pipeline = build_pipeline(args, config).await;
    let mut display = DisplayManager::new();
    if !args.verbosity().show_progress() {
        display = display.without_progress();
    }

    display.start_query(query);
    let outcome = pipeline.process_query(query).await;
    display.finish_current();

    match outcome {
        Ok(record) => {
            display.show_response(&record);
            Ok(())
        }
        Err(e) => {
            display.show_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run_repl(args: &Args, config: Config) -> Result<()> {
    let pipeline = build_pipeline(args, config).await;

    let mut display = DisplayManager::new();
    if !args.verbosity().show_progress() {
        display = display.without_progress();
    }

    let mut session =
        ReplSession::with_history(pipeline, default_history_path())?.with_display(display);
    session.show_welcome(env!("CARGO_PKG_VERSION"));
    session.run().await
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    let source = args
        .config
        .clone()
        .or_else(Config::default_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<defaults>".to_string());

    println!("{}", "RagBuddy Configuration".bold().cyan());
    println!("{}", "=".repeat(60).cyan());
    println!("Source:    {}", source);
    println!("Verbosity: {}", args.verbosity().as_str());
    println!();
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}

fn start_spinner(verbosity: Verbosity, message: &str) -> Option<ProgressBar> {
    if !verbosity.show_progress() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
