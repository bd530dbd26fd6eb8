//! Console front-end entry point.
//!
//! A read-evaluate-print loop over the search-resolve-fetch workflow: read a
//! title, resolve it (prompting for a choice when several candidates match),
//! fetch and print the article between separator banners, then ask whether to
//! continue. The literal sentinel `quit` (case-insensitive) exits with code 0
//! and a farewell from any prompt.
//!
//! # Examples
//!
//! Interactive session in English:
//! ```bash
//! console
//! ```
//!
//! Single query against the Norwegian edition:
//! ```bash
//! console --language no --query "Oslo"
//! ```

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wikipedia_search::client::wikipedia::WikipediaClient;
use wikipedia_search::models::Language;
use wikipedia_search::render;
use wikipedia_search::workflow::{self, FetchOutcome, LineChooser, Resolution};

/// Width of the separator banner bracketing each rendered article.
const BANNER_WIDTH: usize = 80;

/// Console client for searching and reading Wikipedia articles
#[derive(Parser, Debug)]
#[command(
    name = "console",
    version,
    about = "Search and read Wikipedia articles from the terminal",
    long_about = "Search Wikipedia by title or keyword, choose among multiple matches, \
                  and read the article in the terminal.

EXAMPLES:
  Interactive session:
    console

  Norwegian edition:
    console --language no

  Single query, then exit:
    console --query \"Marie Curie\""
)]
struct Args {
    /// Two-letter language code (en, no, sv, da, fi, is, ru)
    #[arg(long, value_name = "CODE", default_value = "en")]
    language: String,

    /// Search once for this query and exit instead of starting the REPL
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,

    /// Logging verbosity level
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

/// Setup logging with the specified level
fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();
}

/// What a completed search interaction leaves on screen.
enum SearchDisplay {
    /// Rendered article or status message.
    Text(String),

    /// The quit sentinel was entered somewhere along the way.
    Quit,
}

/// Run one full search interaction: resolve, optionally prompt, fetch.
///
/// Every workflow outcome is rendered to a displayable string here; errors
/// never escape as faults, only as the generic failure message.
async fn perform_search(
    client: &WikipediaClient,
    language: Language,
    query: &str,
) -> SearchDisplay {
    let mut chooser = LineChooser::new(io::stdin().lock(), io::stdout());

    let resolution =
        match workflow::resolve_query(client, language, query, &mut chooser).await {
            Ok(resolution) => resolution,
            Err(error) => return SearchDisplay::Text(render::render_failure(&error.to_string())),
        };

    let title = match resolution {
        Resolution::Quit => return SearchDisplay::Quit,
        Resolution::NoMatches => return SearchDisplay::Text(render::NO_RESULTS_MESSAGE.to_string()),
        Resolution::Cancelled => return SearchDisplay::Text(render::CANCELLED_MESSAGE.to_string()),
        Resolution::Resolved(title) => title,
    };
    debug!(%title, "resolved query, fetching article");

    match workflow::fetch_article(client, language, &title).await {
        Ok(FetchOutcome::Fetched(article)) => {
            SearchDisplay::Text(render::render_article(&article))
        }
        Ok(FetchOutcome::NotFound) => SearchDisplay::Text(render::NOT_FOUND_MESSAGE.to_string()),
        Ok(FetchOutcome::Ambiguous(options)) => {
            SearchDisplay::Text(render::render_disambiguation(&options))
        }
        Err(error) => SearchDisplay::Text(render::render_failure(&error.to_string())),
    }
}

/// Print a rendered result between separator banners.
fn print_bracketed(text: &str) {
    let banner = "=".repeat(BANNER_WIDTH);
    println!("\n{banner}\n");
    println!("{text}");
    println!("\n{banner}");
}

/// Ask whether to search again. Returns `false` when the session should end.
///
/// Only two outcomes are sanctioned: an empty line continues, the quit
/// sentinel exits. Anything else re-prompts.
fn prompt_continue(rl: &mut DefaultEditor) -> bool {
    loop {
        match rl.readline("\nPress Enter to search again, or type 'quit' to exit: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    return true;
                }
                if workflow::is_quit(line) {
                    return false;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return false,
            Err(_) => return false,
        }
    }
}

/// Run the interactive REPL until the user quits.
async fn run_repl(client: &WikipediaClient, language: Language) -> Result<()> {
    println!("\nWelcome to Wikipedia Search!");
    println!("Type 'quit' at any time to exit the program.");

    let mut rl = DefaultEditor::new().with_context(|| "Failed to create readline editor")?;

    loop {
        let line = match rl.readline("\nEnter a Wikipedia article title: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error).with_context(|| "Error reading input"),
        };

        let query = line.trim().to_string();
        if query.is_empty() {
            continue;
        }
        rl.add_history_entry(&query).ok();

        match perform_search(client, language, &query).await {
            SearchDisplay::Quit => break,
            SearchDisplay::Text(text) => print_bracketed(&text),
        }

        if !prompt_continue(&mut rl) {
            break;
        }
    }

    println!("{}", render::FAREWELL_MESSAGE);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level);

    let language = Language::from_code(&args.language).ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported language code '{}'. Supported codes: {}",
            args.language,
            Language::ALL
                .iter()
                .map(|lang| lang.code())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let client = WikipediaClient::new().with_context(|| "Failed to create Wikipedia client")?;

    match args.query {
        Some(query) => {
            match perform_search(&client, language, &query).await {
                SearchDisplay::Quit => println!("{}", render::FAREWELL_MESSAGE),
                SearchDisplay::Text(text) => print_bracketed(&text),
            }
            Ok(())
        }
        None => run_repl(&client, language).await,
    }
}
