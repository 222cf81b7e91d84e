mod cli;
mod commands;
mod config;
mod shelf;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use chef_core::{ConversationTurn, Session};
use chef_ingest::{ExtractionError, IngestReport, IngestStatus, Ingestor};
use chef_llm::{ChatDriver, GeminiProvider, PromptTemplate, TurnError};

use crate::cli::CliArgs;
use crate::commands::Command;
use crate::config::{CliConfig, Settings};
use crate::shelf::Shelf;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    chef_core::config::load_dotenv();
    let args = CliArgs::parse();
    let terminal = Terminal::new();

    // Load config: flags > environment > config file
    let env_config = chef_core::Config::from_env();
    env_config.log_summary();
    let file_config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    let settings = file_config.resolve(&args, &env_config);

    let mut driver = ChatDriver::new(
        PromptTemplate::new(settings.max_corpus_chars),
        settings.temperature,
        settings.max_tokens,
    );
    if let Some(key) = settings.api_key.clone() {
        install_key(&terminal, &mut driver, &settings, key)?;
    }
    let mut shelf = Shelf::new(Ingestor::new(settings.max_corpus_chars));
    let mut session = Session::new();
    info!(session = %session.id, model = %settings.model, "Session started");

    terminal.print_banner(&settings.model, driver.has_credential())?;
    memorize(&terminal, &mut shelf, &mut session, &settings.cookbooks)?;

    // REPL loop
    loop {
        let input = match terminal.read_input()? {
            Some(text) => text,
            None => {
                terminal.print_info("Goodbye.")?;
                break;
            }
        };

        match commands::parse(&input) {
            Command::Empty => continue,
            Command::Quit => {
                terminal.print_info("Goodbye.")?;
                break;
            }
            Command::Help => terminal.print_help()?,
            Command::History => terminal.print_history(session.log())?,
            Command::New => {
                terminal.print_success("Started a new conversation.")?;
                if !shelf.paths().is_empty() {
                    terminal.print_info("Crunching the cookbooks again...")?;
                }
                match shelf.start_over(&mut session) {
                    Some(report) => report_ingest(&terminal, &report)?,
                    None => terminal.print_info("Upload your cookbooks with /upload <file.pdf>.")?,
                }
            }
            Command::Upload(paths) => {
                if paths.is_empty() {
                    terminal.print_warning("Usage: /upload <file.pdf>...")?;
                } else {
                    memorize(&terminal, &mut shelf, &mut session, &paths)?;
                }
            }
            Command::Key => match terminal.read_secret("Gemini API key: ") {
                Ok(Some(key)) => install_key(&terminal, &mut driver, &settings, key)?,
                Ok(None) => terminal.print_info("Cancelled.")?,
                Err(e) => terminal.print_error(&format!("Could not read the key: {:#}", e))?,
            },
            Command::Unknown(cmd) => {
                terminal.print_warning(&format!("Unknown command '/{}'. Type /help.", cmd))?;
            }
            Command::Chat(text) => chat_turn(&terminal, &driver, &mut session, &text).await?,
        }
    }

    Ok(())
}

/// Build a Gemini provider from `key` and hand it to the driver.
fn install_key(
    terminal: &Terminal,
    driver: &mut ChatDriver,
    settings: &Settings,
    key: String,
) -> Result<()> {
    match GeminiProvider::new(key, settings.model.clone(), settings.base_url.clone()) {
        Ok(provider) => {
            driver.set_provider(Box::new(provider));
            terminal.print_success("API key set.")
        }
        Err(e) => terminal.print_error(&e.to_string()),
    }
}

/// Ingest cookbooks into the session and report the outcome per document.
fn memorize(
    terminal: &Terminal,
    shelf: &mut Shelf,
    session: &mut Session,
    paths: &[PathBuf],
) -> Result<()> {
    if !session.corpus().is_empty() {
        return terminal.print_warning("Cookbooks are already memorized for this conversation.");
    }

    terminal.print_info("Crunching the cookbooks...")?;
    let report = shelf.memorize(session, paths);
    report_ingest(terminal, &report)
}

fn report_ingest(terminal: &Terminal, report: &IngestReport) -> Result<()> {
    for failure in &report.failures {
        match &failure.error {
            ExtractionError::NotFound(path) => {
                terminal.print_warning(&format!("{} not found.", path.display()))?
            }
            e => terminal.print_error(&format!("Error reading {}: {}", failure.name, e))?,
        }
    }

    match report.status {
        IngestStatus::Populated { chars, truncated } => {
            let note = if truncated {
                format!(" (first {} characters kept)", chars)
            } else {
                String::new()
            };
            terminal.print_success(&format!("Cookbooks memorized!{} You can now chat.", note))
        }
        IngestStatus::NoText => terminal.print_warning(
            "No cookbook text yet. Upload PDF cookbooks with /upload <file.pdf>.",
        ),
        IngestStatus::AlreadyPopulated => Ok(()),
    }
}

/// One chat turn: run it through the driver and render the result.
async fn chat_turn(
    terminal: &Terminal,
    driver: &ChatDriver,
    session: &mut Session,
    text: &str,
) -> Result<()> {
    let spinner = terminal.start_spinner("Thinking...")?;
    let result = driver.submit(session, text).await;
    spinner.stop();

    match result {
        Ok(reply) => terminal.print_turn(&ConversationTurn::assistant(reply)),
        Err(TurnError::MissingCredential) => {
            terminal.print_error("Please enter your API key first! Use /key or --api-key.")
        }
        Err(TurnError::MissingCorpus) => terminal
            .print_error("Please upload your PDF cookbooks first! Use /upload <file.pdf>."),
        Err(e) => {
            error!(error = %e, "Chat turn failed");
            terminal.print_error(&format!("An error occurred: {}", e))
        }
    }
}
