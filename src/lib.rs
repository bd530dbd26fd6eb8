//! Wikipedia Search - search and read Wikipedia articles from the terminal.
//!
//! This library backs two front-ends (a console REPL and a full-screen
//! terminal UI) with a single search-resolve-fetch workflow against the
//! MediaWiki Action API.
//!
//! # Architecture
//!
//! The system is organized into several key modules:
//!
//! - **models**: Core data structures (Language, Article)
//! - **client**: Remote article-repository boundary (trait + Wikipedia impl)
//! - **workflow**: Query resolution, candidate selection, article fetching
//! - **render**: Fixed user-facing message and article-layout assembly
//! - **highlight**: Case-insensitive substring highlighting for the find bar
//!
//! # Workflow
//!
//! 1. The front-end submits trimmed free-text input (the quit sentinel is
//!    recognized before any remote call)
//! 2. The resolver searches for up to five candidate titles: zero candidates
//!    is a terminal "no results", one is auto-selected, several are handed to
//!    a front-end-provided chooser in relevance order
//! 3. The resolved title is fetched exact-title-only; not-found and
//!    still-ambiguous conditions come back as tagged variants
//! 4. The front-end renders the article (or a status message) and, in the
//!    terminal UI, recomputes find-bar highlights over the new text
//!
//! # Example
//!
//! ```ignore
//! use std::io;
//!
//! use wikipedia_search::client::wikipedia::WikipediaClient;
//! use wikipedia_search::models::Language;
//! use wikipedia_search::workflow::{self, FetchOutcome, LineChooser, Resolution};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WikipediaClient::new()?;
//!     let mut chooser = LineChooser::new(io::stdin().lock(), io::stdout());
//!
//!     match workflow::resolve_query(&client, Language::English, "oslo", &mut chooser).await? {
//!         Resolution::Resolved(title) => {
//!             if let FetchOutcome::Fetched(article) =
//!                 workflow::fetch_article(&client, Language::English, &title).await?
//!             {
//!                 println!("{}", wikipedia_search::render::render_article(&article));
//!             }
//!         }
//!         other => println!("{other:?}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod highlight;
pub mod models;
pub mod render;
pub mod workflow;
