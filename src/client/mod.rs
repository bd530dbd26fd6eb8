//! Remote article-repository boundary.
//!
//! This module defines the interface for talking to a remote encyclopedia
//! service and includes the Wikipedia implementation. The `ArticleClient`
//! trait abstracts the remote side so the workflow layer (and its tests) can
//! run against a mock instead of a live API.
//!
//! Not-found and disambiguation conditions are modeled as error variants at
//! this boundary; the workflow layer re-expresses them as tagged outcome
//! variants so every call site handles every case explicitly.

pub mod wikipedia;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Article, Language};

/// Errors that can occur when talking to the remote article service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested title does not exist.
    #[error("article not found: {0}")]
    NotFound(String),

    /// The title maps to multiple underlying pages. Carries the alternative
    /// page titles reported by the service.
    #[error("title is ambiguous ({} options)", .0.len())]
    Disambiguation(Vec<String>),

    /// Network or transport failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service responded, but not in the shape we expect.
    #[error("unexpected API response: {0}")]
    Api(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Trait for remote article-repository clients.
///
/// Implementations issue one synchronous (awaited-to-completion) request per
/// call; there is no retry, caching, or request coalescing at this layer.
/// The active language is passed into every call, never stored.
#[async_trait]
pub trait ArticleClient: Send + Sync {
    /// Search for article titles matching free-text input.
    ///
    /// # Arguments
    /// * `language` - Language edition to search
    /// * `query` - Free-text search input
    /// * `limit` - Maximum number of candidate titles to return
    ///
    /// # Returns
    /// Candidate titles in the service's relevance order. An empty vector is
    /// a valid outcome, not an error.
    ///
    /// # Errors
    /// Returns `ClientError` on transport or protocol failures.
    async fn search(
        &self,
        language: Language,
        query: &str,
        limit: usize,
    ) -> ClientResult<Vec<String>>;

    /// Fetch a full article by title.
    ///
    /// # Arguments
    /// * `language` - Language edition to fetch from
    /// * `title` - The article title
    /// * `exact_title_only` - When true, the service's fuzzy auto-suggestion
    ///   is disabled and only the exact title is fetched
    ///
    /// # Errors
    /// * `ClientError::NotFound` if the title does not exist
    /// * `ClientError::Disambiguation` if the title maps to multiple pages
    /// * `ClientError::Http` / `ClientError::Api` on transport or protocol
    ///   failures
    async fn fetch_page(
        &self,
        language: Language,
        title: &str,
        exact_title_only: bool,
    ) -> ClientResult<Article>;
}
