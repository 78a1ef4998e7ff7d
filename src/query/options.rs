//! Search options
//!
//! Every option struct deserializes with defaults for missing fields, so a
//! configuration file only needs to mention what it changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Options for a single search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Text expected right before the target
    pub prefix: String,
    /// Text expected right after the target
    pub postfix: String,
    /// Drop the outer whitespace of prefix, target and postfix
    pub trim: bool,
    /// Used by every strategy that does not set its own value
    pub case_sensitive: bool,
    pub direct: DirectSearchOptions,
    /// Fuzzy strategies run only when set
    pub fuzzy: Option<FuzzySearchOptions>,
    /// Host strategy runs only when set and a host surface is attached
    pub eager: Option<EagerSearchOptions>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            postfix: String::new(),
            trim: true,
            case_sensitive: false,
            direct: DirectSearchOptions::default(),
            fuzzy: None,
            eager: None,
        }
    }
}

impl SearchOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = postfix.into();
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: FuzzySearchOptions) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub fn with_eager(mut self, eager: EagerSearchOptions) -> Self {
        self.eager = Some(eager);
        self
    }

    /// Prefix, target and postfix after trimming
    ///
    /// The prefix loses leading whitespace and the postfix trailing
    /// whitespace. The target loses leading whitespace only without a prefix
    /// and trailing whitespace only without a postfix.
    pub fn trimmed<'a>(&'a self, target: &'a str) -> (&'a str, &'a str, &'a str) {
        if !self.trim {
            return (&self.prefix, target, &self.postfix);
        }
        let prefix = self.prefix.trim_start();
        let postfix = self.postfix.trim_end();
        let mut target = target;
        if prefix.is_empty() {
            target = target.trim_start();
        }
        if postfix.is_empty() {
            target = target.trim_end();
        }
        (prefix, target, postfix)
    }
}

/// Exact substring search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectSearchOptions {
    pub case_sensitive: Option<bool>,
    /// Retry with `& " ' < >` encoded as entities when nothing is found
    pub encode_fallback: bool,
    /// Search-space byte offset to start from
    pub resume_from: Option<usize>,
}

/// Approximate search, tried after the exact search fails
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzySearchOptions {
    pub case_sensitive: Option<bool>,
    /// Force the token strategy even without prefix or postfix
    pub token_based: bool,
    pub token_threshold: f64,
    pub sentence_based: bool,
    pub sentence_threshold: f64,
    /// Relative length tolerance for scoring two adjacent sentences together
    pub max_sentence_length_diff: f64,
    /// Longest accepted match, as a multiple of the target length
    pub length_ratio: f64,
    /// Applied to each candidate sentence before scoring
    #[serde(skip)]
    pub rewriter: Option<Rewriter>,
}

impl Default for FuzzySearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: None,
            token_based: false,
            token_threshold: 0.68,
            sentence_based: true,
            sentence_threshold: 0.85,
            max_sentence_length_diff: 0.1,
            length_ratio: 2.0,
            rewriter: None,
        }
    }
}

impl fmt::Debug for FuzzySearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzySearchOptions")
            .field("case_sensitive", &self.case_sensitive)
            .field("token_based", &self.token_based)
            .field("token_threshold", &self.token_threshold)
            .field("sentence_based", &self.sentence_based)
            .field("sentence_threshold", &self.sentence_threshold)
            .field("max_sentence_length_diff", &self.max_sentence_length_diff)
            .field("length_ratio", &self.length_ratio)
            .field("rewriter", &self.rewriter.is_some())
            .finish()
    }
}

impl FuzzySearchOptions {
    pub fn with_rewriter(mut self, rewriter: impl SentenceRewriter + 'static) -> Self {
        self.rewriter = Some(Rewriter(Arc::new(rewriter)));
        self
    }
}

/// Search through a host surface (a rendered page, an editor buffer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EagerSearchOptions {
    pub case_sensitive: Option<bool>,
    pub threshold: f64,
}

impl Default for EagerSearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: None,
            threshold: 0.74,
        }
    }
}

/// Rewrites a candidate sentence before it is scored.
///
/// The input carries the markup that was interleaved in the sentence; tags
/// left in the output are removed again before scoring.
pub trait SentenceRewriter: Send + Sync {
    fn rewrite(&self, sentence: &str) -> String;
}

impl<F> SentenceRewriter for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn rewrite(&self, sentence: &str) -> String {
        self(sentence)
    }
}

/// Shared handle to a [`SentenceRewriter`]
#[derive(Clone)]
pub struct Rewriter(pub Arc<dyn SentenceRewriter>);

impl Rewriter {
    pub fn rewrite(&self, sentence: &str) -> String {
        self.0.rewrite(sentence)
    }
}

impl fmt::Debug for Rewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rewriter")
    }
}
