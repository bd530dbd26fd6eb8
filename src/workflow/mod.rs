//! The search-resolve-fetch workflow.
//!
//! Both front-ends delegate to this module: a query is resolved into a single
//! title (automatically when the search returns exactly one candidate,
//! interactively otherwise), and the resolved title is fetched as a full
//! article. Candidate selection is abstracted behind the synchronous
//! [`CandidateChooser`] capability so a modal dialog and a console prompt are
//! interchangeable without touching the resolver.
//!
//! The client's exception-style not-found and disambiguation errors are
//! re-expressed here as tagged outcome variants, forcing every call site to
//! handle every case.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::client::{ArticleClient, ClientError};
use crate::models::{Article, Language};

/// Maximum number of candidate titles requested from the remote search.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Reserved input that terminates the interactive session instead of being
/// treated as search text.
pub const QUIT_SENTINEL: &str = "quit";

/// Check whether trimmed input is the quit sentinel (case-insensitive).
pub fn is_quit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(QUIT_SENTINEL)
}

/// Errors that can occur during the workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The remote client failed in a way the workflow does not classify.
    #[error("{0}")]
    Client(#[from] ClientError),

    /// A chooser returned an index outside the candidate list.
    #[error("selection index {index} out of range for {count} candidates")]
    InvalidSelection { index: usize, count: usize },
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Outcome of a chooser invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 0-based index into the candidate list.
    Chosen(usize),

    /// The user dismissed the prompt (dialog cancel or empty console line).
    Cancelled,

    /// The user entered the quit sentinel at the selection prompt.
    Quit,
}

/// Synchronous selection capability invoked when a search returns more than
/// one candidate.
///
/// One implementation blocks on a modal popup, another reads console lines;
/// the resolver does not care which. Implementations receive the candidate
/// list in the service's relevance order and must not reorder it.
pub trait CandidateChooser {
    fn choose(&mut self, candidates: &[String]) -> Selection;
}

/// Outcome of resolving a free-text query into a single title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A single title was resolved, automatically or by explicit selection.
    Resolved(String),

    /// The search returned no candidates.
    NoMatches,

    /// The user dismissed the selection prompt.
    Cancelled,

    /// The user asked to quit; no further action for this interaction.
    Quit,
}

/// Resolve free-text input into a single article title.
///
/// The input is trimmed; the quit sentinel is recognized before any remote
/// call. The search is bounded to [`MAX_SEARCH_RESULTS`] candidates. A single
/// candidate is selected automatically with no user interaction; multiple
/// candidates are handed to `chooser` in the original order.
///
/// # Errors
/// Returns `WorkflowError` if the remote search fails or the chooser returns
/// an out-of-range index.
pub async fn resolve_query<C, Ch>(
    client: &C,
    language: Language,
    query: &str,
    chooser: &mut Ch,
) -> WorkflowResult<Resolution>
where
    C: ArticleClient,
    Ch: CandidateChooser,
{
    let query = query.trim();
    if is_quit(query) {
        return Ok(Resolution::Quit);
    }

    let mut candidates = client
        .search(language, query, MAX_SEARCH_RESULTS)
        .await?;
    debug!(count = candidates.len(), %query, "search returned candidates");

    match candidates.len() {
        0 => Ok(Resolution::NoMatches),
        1 => Ok(Resolution::Resolved(candidates.remove(0))),
        count => match chooser.choose(&candidates) {
            Selection::Chosen(index) => {
                let title = candidates
                    .into_iter()
                    .nth(index)
                    .ok_or(WorkflowError::InvalidSelection { index, count })?;
                Ok(Resolution::Resolved(title))
            }
            Selection::Cancelled => Ok(Resolution::Cancelled),
            Selection::Quit => Ok(Resolution::Quit),
        },
    }
}

/// Outcome of fetching a resolved title.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The article was fetched successfully.
    Fetched(Article),

    /// The remote service reports the title does not exist.
    NotFound,

    /// The title itself maps to multiple underlying pages. Carries the
    /// alternative titles reported by the service.
    Ambiguous(Vec<String>),
}

/// Fetch the article for a resolved title.
///
/// The fetch is exact-title only: the resolver already disambiguated, so the
/// service's fuzzy auto-suggestion is disabled to avoid silently substituting
/// a different page for the user's explicit choice.
///
/// # Errors
/// Not-found and disambiguation conditions become [`FetchOutcome`] variants;
/// any other client failure is returned as `WorkflowError` for the front-end
/// to render as a generic failure message.
pub async fn fetch_article<C>(
    client: &C,
    language: Language,
    title: &str,
) -> WorkflowResult<FetchOutcome>
where
    C: ArticleClient,
{
    match client.fetch_page(language, title, true).await {
        Ok(article) => Ok(FetchOutcome::Fetched(article)),
        Err(ClientError::NotFound(_)) => Ok(FetchOutcome::NotFound),
        Err(ClientError::Disambiguation(options)) => Ok(FetchOutcome::Ambiguous(options)),
        Err(other) => Err(other.into()),
    }
}

/// Console chooser reading whole lines from any buffered input.
///
/// Prints a 1-based numbered menu, then loops: non-numeric input and
/// out-of-range numbers re-prompt, an empty line cancels without
/// re-prompting, and the quit sentinel signals termination. Generic over the
/// input and output streams so tests can drive it with in-memory buffers.
pub struct LineChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self) -> Option<String> {
        write!(
            self.output,
            "\nEnter a number to choose an article (or press Enter to search again): "
        )
        .ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

impl<R: BufRead, W: Write> CandidateChooser for LineChooser<R, W> {
    fn choose(&mut self, candidates: &[String]) -> Selection {
        let _ = writeln!(self.output, "\nFound multiple matches. Please choose one:");
        for (i, candidate) in candidates.iter().enumerate() {
            let _ = writeln!(self.output, "{}. {}", i + 1, candidate);
        }

        loop {
            let Some(line) = self.prompt() else {
                return Selection::Cancelled;
            };
            let line = line.trim();

            if is_quit(line) {
                return Selection::Quit;
            }
            if line.is_empty() {
                return Selection::Cancelled;
            }

            match line.parse::<i64>() {
                Ok(n) if n >= 1 && (n as usize) <= candidates.len() => {
                    return Selection::Chosen(n as usize - 1);
                }
                Ok(_) => {
                    let _ = writeln!(self.output, "Invalid choice. Please try again.");
                }
                Err(_) => {
                    let _ = writeln!(self.output, "Please enter a valid number.");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock client returning scripted search results and fetch outcomes.
    struct MockClient {
        search_results: Vec<String>,
        fetch_result: Option<Result<Article, ClientError>>,
        search_calls: AtomicUsize,
        fetch_calls: AtomicUsize,
    }

    impl MockClient {
        fn with_search(results: Vec<&str>) -> Self {
            Self {
                search_results: results.into_iter().map(String::from).collect(),
                fetch_result: None,
                search_calls: AtomicUsize::new(0),
                fetch_calls: AtomicUsize::new(0),
            }
        }

        fn with_fetch(result: Result<Article, ClientError>) -> Self {
            Self {
                search_results: Vec::new(),
                fetch_result: Some(result),
                search_calls: AtomicUsize::new(0),
                fetch_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ArticleClient for MockClient {
        async fn search(
            &self,
            _language: Language,
            _query: &str,
            limit: usize,
        ) -> Result<Vec<String>, ClientError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(limit, MAX_SEARCH_RESULTS);
            Ok(self.search_results.clone())
        }

        async fn fetch_page(
            &self,
            _language: Language,
            _title: &str,
            exact_title_only: bool,
        ) -> Result<Article, ClientError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            assert!(exact_title_only, "workflow fetches must be exact-title only");
            match self.fetch_result.as_ref().expect("fetch scripted") {
                Ok(article) => Ok(article.clone()),
                Err(ClientError::NotFound(title)) => Err(ClientError::NotFound(title.clone())),
                Err(ClientError::Disambiguation(options)) => {
                    Err(ClientError::Disambiguation(options.clone()))
                }
                Err(ClientError::Api(message)) => Err(ClientError::Api(message.clone())),
                Err(ClientError::Http(_)) => unreachable!("not scripted in tests"),
            }
        }
    }

    /// Chooser returning a fixed selection and recording what it was shown.
    struct ScriptedChooser {
        selection: Selection,
        seen: Vec<String>,
        invocations: usize,
    }

    impl ScriptedChooser {
        fn new(selection: Selection) -> Self {
            Self {
                selection,
                seen: Vec::new(),
                invocations: 0,
            }
        }
    }

    impl CandidateChooser for ScriptedChooser {
        fn choose(&mut self, candidates: &[String]) -> Selection {
            self.invocations += 1;
            self.seen = candidates.to_vec();
            self.selection
        }
    }

    fn test_article() -> Article {
        Article {
            title: "Oslo".to_string(),
            url: "https://en.wikipedia.org/wiki/Oslo".to_string(),
            summary: "Capital of Norway.".to_string(),
            content: "Oslo is the capital and most populous city of Norway.".to_string(),
        }
    }

    #[test]
    fn test_quit_sentinel_case_insensitive() {
        assert!(is_quit("quit"));
        assert!(is_quit("QUIT"));
        assert!(is_quit("Quit"));
        assert!(is_quit("  quit  "));
        assert!(!is_quit("quitting"));
        assert!(!is_quit("exit"));
    }

    #[tokio::test]
    async fn test_resolve_quit_makes_no_remote_call() {
        let client = MockClient::with_search(vec!["whatever"]);
        let mut chooser = ScriptedChooser::new(Selection::Cancelled);

        let resolution = resolve_query(&client, Language::English, " QuIt ", &mut chooser)
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Quit);
        assert_eq!(client.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(chooser.invocations, 0);
    }

    #[tokio::test]
    async fn test_resolve_no_matches() {
        let client = MockClient::with_search(vec![]);
        let mut chooser = ScriptedChooser::new(Selection::Chosen(0));

        let resolution = resolve_query(&client, Language::English, "zzzz", &mut chooser)
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::NoMatches);
        assert_eq!(chooser.invocations, 0);
    }

    #[tokio::test]
    async fn test_resolve_single_candidate_skips_chooser() {
        let client = MockClient::with_search(vec!["Oslo"]);
        let mut chooser = ScriptedChooser::new(Selection::Cancelled);

        let resolution = resolve_query(&client, Language::English, "oslo", &mut chooser)
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Resolved("Oslo".to_string()));
        assert_eq!(chooser.invocations, 0);
    }

    #[tokio::test]
    async fn test_resolve_multiple_candidates_in_order() {
        let client = MockClient::with_search(vec!["Mercury (planet)", "Mercury (element)", "Mercury Records"]);
        let mut chooser = ScriptedChooser::new(Selection::Chosen(1));

        let resolution = resolve_query(&client, Language::English, "mercury", &mut chooser)
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Resolved("Mercury (element)".to_string()));
        assert_eq!(chooser.invocations, 1);
        assert_eq!(
            chooser.seen,
            vec!["Mercury (planet)", "Mercury (element)", "Mercury Records"]
        );
    }

    #[tokio::test]
    async fn test_resolve_chooser_cancel_and_quit() {
        let client = MockClient::with_search(vec!["A", "B"]);

        let mut cancel = ScriptedChooser::new(Selection::Cancelled);
        let resolution = resolve_query(&client, Language::English, "x", &mut cancel)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Cancelled);

        let mut quit = ScriptedChooser::new(Selection::Quit);
        let resolution = resolve_query(&client, Language::English, "x", &mut quit)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Quit);
    }

    #[tokio::test]
    async fn test_resolve_rejects_out_of_range_selection() {
        let client = MockClient::with_search(vec!["A", "B"]);
        let mut chooser = ScriptedChooser::new(Selection::Chosen(5));

        let result = resolve_query(&client, Language::English, "x", &mut chooser).await;

        match result {
            Err(WorkflowError::InvalidSelection { index: 5, count: 2 }) => {}
            other => panic!("expected InvalidSelection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let client = MockClient::with_fetch(Ok(test_article()));

        let outcome = fetch_article(&client, Language::English, "Oslo")
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched(test_article()));
    }

    #[tokio::test]
    async fn test_fetch_not_found_becomes_variant() {
        let client = MockClient::with_fetch(Err(ClientError::NotFound("Xyzzy".to_string())));

        let outcome = fetch_article(&client, Language::English, "Xyzzy")
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_disambiguation_becomes_variant() {
        let options = vec!["Mercury (planet)".to_string(), "Mercury (element)".to_string()];
        let client = MockClient::with_fetch(Err(ClientError::Disambiguation(options.clone())));

        let outcome = fetch_article(&client, Language::English, "Mercury")
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Ambiguous(options));
    }

    #[tokio::test]
    async fn test_fetch_generic_failure_propagates() {
        let client = MockClient::with_fetch(Err(ClientError::Api("boom".to_string())));

        let result = fetch_article(&client, Language::English, "Oslo").await;

        assert!(matches!(result, Err(WorkflowError::Client(ClientError::Api(_)))));
    }

    fn run_line_chooser(input: &str, candidates: &[&str]) -> (Selection, String) {
        let candidates: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
        let mut output = Vec::new();
        let selection = {
            let mut chooser = LineChooser::new(Cursor::new(input.as_bytes().to_vec()), &mut output);
            chooser.choose(&candidates)
        };
        (selection, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_line_chooser_valid_selection() {
        let (selection, output) = run_line_chooser("2\n", &["A", "B", "C"]);
        assert_eq!(selection, Selection::Chosen(1));
        assert!(output.contains("1. A"));
        assert!(output.contains("2. B"));
        assert!(output.contains("3. C"));
    }

    #[test]
    fn test_line_chooser_rejects_zero_and_negative() {
        let (selection, output) = run_line_chooser("0\n-1\n1\n", &["A", "B"]);
        assert_eq!(selection, Selection::Chosen(0));
        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 2);
    }

    #[test]
    fn test_line_chooser_rejects_out_of_range() {
        let (selection, output) = run_line_chooser("7\n2\n", &["A", "B"]);
        assert_eq!(selection, Selection::Chosen(1));
        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_line_chooser_rejects_non_numeric() {
        let (selection, output) = run_line_chooser("abc\n1\n", &["A", "B"]);
        assert_eq!(selection, Selection::Chosen(0));
        assert!(output.contains("Please enter a valid number."));
    }

    #[test]
    fn test_line_chooser_empty_line_cancels_without_reprompt() {
        let (selection, output) = run_line_chooser("\n", &["A", "B"]);
        assert_eq!(selection, Selection::Cancelled);
        assert!(!output.contains("Invalid choice"));
        assert!(!output.contains("valid number"));
    }

    #[test]
    fn test_line_chooser_quit_sentinel() {
        for input in ["quit\n", "QUIT\n", "Quit\n"] {
            let (selection, _) = run_line_chooser(input, &["A", "B"]);
            assert_eq!(selection, Selection::Quit);
        }
    }

    #[test]
    fn test_line_chooser_eof_cancels() {
        let (selection, _) = run_line_chooser("", &["A", "B"]);
        assert_eq!(selection, Selection::Cancelled);
    }
}
