//! Wikipedia implementation of the `ArticleClient` trait.
//!
//! Talks to the MediaWiki Action API (`/w/api.php`, `formatversion=2`) of the
//! language edition passed into each call. One awaited request per operation;
//! no retries and no caching.
//!
//! A fetch is assembled from three API calls:
//! 1. `prop=info|pageprops` resolves the canonical title and URL, and detects
//!    missing and disambiguation pages,
//! 2. `prop=extracts&exintro` retrieves the plain-text summary,
//! 3. `prop=extracts` retrieves the full plain-text body.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ArticleClient, ClientError, ClientResult};
use crate::models::{Article, Language};

/// Client for the MediaWiki Action API.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
}

impl WikipediaClient {
    /// Create a new client with a descriptive user agent.
    ///
    /// # Errors
    /// Returns `ClientError::Http` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new() -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("wikipedia-search/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn get_query(&self, language: Language, params: &[(&str, &str)]) -> ClientResult<QueryResponse> {
        let url = api_endpoint(language);
        let mut query: Vec<(&str, &str)> = vec![("format", "json"), ("formatversion", "2")];
        query.extend_from_slice(params);

        debug!(endpoint = %url, "issuing API request");
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<QueryResponse>().await?)
    }

    /// Fetch the titles this disambiguation page links to, used to report
    /// the alternative options.
    async fn disambiguation_options(
        &self,
        language: Language,
        title: &str,
    ) -> ClientResult<Vec<String>> {
        let response = self
            .get_query(
                language,
                &[
                    ("action", "query"),
                    ("prop", "links"),
                    ("plnamespace", "0"),
                    ("pllimit", "max"),
                    ("titles", title),
                ],
            )
            .await?;

        let page = first_page(response)?;
        Ok(page
            .links
            .unwrap_or_default()
            .into_iter()
            .map(|link| link.title)
            .collect())
    }

    async fn page_info(&self, language: Language, title: &str) -> ClientResult<PageInfo> {
        let response = self
            .get_query(
                language,
                &[
                    ("action", "query"),
                    ("prop", "info|pageprops"),
                    ("inprop", "url"),
                    ("ppprop", "disambiguation"),
                    ("redirects", "1"),
                    ("titles", title),
                ],
            )
            .await?;
        first_page(response)
    }

    async fn extract(
        &self,
        language: Language,
        title: &str,
        intro_only: bool,
    ) -> ClientResult<String> {
        let mut params = vec![
            ("action", "query"),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("titles", title),
        ];
        if intro_only {
            params.push(("exintro", "1"));
        }

        let response = self.get_query(language, &params).await?;
        let page = first_page(response)?;
        Ok(page.extract.unwrap_or_default())
    }
}

#[async_trait]
impl ArticleClient for WikipediaClient {
    async fn search(
        &self,
        language: Language,
        query: &str,
        limit: usize,
    ) -> ClientResult<Vec<String>> {
        let limit = limit.to_string();
        let response = self
            .get_query(
                language,
                &[
                    ("action", "query"),
                    ("list", "search"),
                    ("srsearch", query),
                    ("srlimit", limit.as_str()),
                    ("srprop", ""),
                ],
            )
            .await?;

        Ok(search_titles(response))
    }

    async fn fetch_page(
        &self,
        language: Language,
        title: &str,
        exact_title_only: bool,
    ) -> ClientResult<Article> {
        // Fuzzy mode substitutes the top search hit for the requested title,
        // mirroring the service's own auto-suggestion. The resolver always
        // passes exact_title_only=true so its disambiguation is never
        // second-guessed.
        let title = if exact_title_only {
            title.to_string()
        } else {
            self.search(language, title, 1)
                .await?
                .into_iter()
                .next()
                .unwrap_or_else(|| title.to_string())
        };

        let info = self.page_info(language, &title).await?;
        if info.missing {
            return Err(ClientError::NotFound(title));
        }

        let canonical_title = info.title.clone().unwrap_or_else(|| title.clone());
        if info.is_disambiguation() {
            let options = self.disambiguation_options(language, &canonical_title).await?;
            return Err(ClientError::Disambiguation(options));
        }

        let url = info
            .fullurl
            .ok_or_else(|| ClientError::Api(format!("page '{canonical_title}' has no URL")))?;
        let summary = self.extract(language, &canonical_title, true).await?;
        let content = self.extract(language, &canonical_title, false).await?;

        Ok(Article {
            title: canonical_title,
            url,
            summary,
            content,
        })
    }
}

/// API endpoint for a language edition.
fn api_endpoint(language: Language) -> String {
    format!("https://{}.wikipedia.org/w/api.php", language.code())
}

/// Top-level Action API response envelope (`formatversion=2`).
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    search: Vec<SearchHit>,

    #[serde(default)]
    pages: Vec<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    missing: bool,

    #[serde(default)]
    fullurl: Option<String>,

    #[serde(default)]
    pageprops: Option<PageProps>,

    #[serde(default)]
    extract: Option<String>,

    #[serde(default)]
    links: Option<Vec<PageLink>>,
}

impl PageInfo {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .map(|props| props.disambiguation.is_some())
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct PageProps {
    /// Present (as an empty string) on disambiguation pages.
    #[serde(default)]
    disambiguation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

/// Extract candidate titles from a search response, preserving the service's
/// relevance order.
fn search_titles(response: QueryResponse) -> Vec<String> {
    response
        .query
        .map(|body| body.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default()
}

/// Extract the single page record a titles-based query responds with.
fn first_page(response: QueryResponse) -> ClientResult<PageInfo> {
    response
        .query
        .and_then(|body| body.pages.into_iter().next())
        .ok_or_else(|| ClientError::Api("response contains no page record".to_string()))
}
