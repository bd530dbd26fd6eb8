//! Core data models for the Wikipedia search workflow.
//!
//! This module contains the fundamental data structures shared by both
//! front-ends: the fixed set of supported article languages and the
//! fetched article record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A supported Wikipedia language edition.
///
/// The set is fixed; each variant maps to the two-letter subdomain code used
/// by the remote API (e.g. `en.wikipedia.org`). The active language is
/// explicit session state threaded into every remote call rather than a
/// process-wide global, so the workflow stays testable without a live UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Norwegian,
    Swedish,
    Danish,
    Finnish,
    Icelandic,
    Russian,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Norwegian,
        Language::Swedish,
        Language::Danish,
        Language::Finnish,
        Language::Icelandic,
        Language::Russian,
    ];

    /// The two-letter language code used in API endpoints.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Norwegian => "no",
            Language::Swedish => "sv",
            Language::Danish => "da",
            Language::Finnish => "fi",
            Language::Icelandic => "is",
            Language::Russian => "ru",
        }
    }

    /// Human-readable name for selector menus.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Norwegian => "Norwegian",
            Language::Swedish => "Swedish",
            Language::Danish => "Danish",
            Language::Finnish => "Finnish",
            Language::Icelandic => "Icelandic",
            Language::Russian => "Russian",
        }
    }

    /// Look up a language by its two-letter code (case-insensitive).
    ///
    /// # Returns
    /// `None` if the code is not one of the supported editions.
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully fetched article.
///
/// Immutable once fetched; owned by the front-end that requested it and
/// discarded wholesale on the next search. The four fields correspond to the
/// four labeled blocks of the rendered layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Canonical article title as reported by the remote service.
    pub title: String,

    /// Canonical URL of the article.
    pub url: String,

    /// Introductory summary (lead section, plain text).
    pub summary: String,

    /// Full plain-text body of the article.
    pub content: String,
}
