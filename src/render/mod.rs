//! User-facing text assembly.
//!
//! Both front-ends render workflow outcomes through this module so the
//! messages and the article block layout stay identical between them. The
//! four-block article order (Title, URL, Summary, Content) is a user-facing
//! contract, never reordered regardless of which fields are empty.

use crate::models::Article;

/// Shown when a search returns zero candidates.
pub const NO_RESULTS_MESSAGE: &str = "No articles found. Please try another search term.";

/// Shown when the user dismisses the selection prompt. Deliberately distinct
/// from [`NO_RESULTS_MESSAGE`].
pub const CANCELLED_MESSAGE: &str = "Search cancelled. Please try another search.";

/// Shown when a resolved title turns out not to exist at fetch time.
pub const NOT_FOUND_MESSAGE: &str = "Article not found. Please try another search term.";

/// Printed on termination via the quit sentinel.
pub const FAREWELL_MESSAGE: &str = "Goodbye!";

/// Maximum number of alternative titles shown for an ambiguous fetch.
pub const MAX_AMBIGUOUS_OPTIONS: usize = 10;

/// Render a fetched article as the fixed four-block layout.
pub fn render_article(article: &Article) -> String {
    format!(
        "Title: {}\n\nURL: {}\n\nSummary:\n{}\n\nContent:\n{}",
        article.title, article.url, article.summary, article.content
    )
}

/// Render the alternatives of an ambiguous fetch as a bulleted list.
///
/// Only the first [`MAX_AMBIGUOUS_OPTIONS`] options are shown; the user is
/// asked to refine the query rather than being bounced back into another
/// selection prompt.
pub fn render_disambiguation(options: &[String]) -> String {
    let shown: Vec<String> = options
        .iter()
        .take(MAX_AMBIGUOUS_OPTIONS)
        .map(|option| format!("\u{2022} {option}"))
        .collect();

    format!(
        "Multiple matches found:\n\n{}\n\nPlease refine your search.",
        shown.join("\n")
    )
}

/// Render the catch-all failure message for unclassified remote errors.
pub fn render_failure(message: &str) -> String {
    format!("An error occurred: {message}")
}
