//! # annotext - markup-aware phrase highlighting
//!
//! annotext locates phrases in text or HTML and wraps them in highlight
//! markup without breaking the document's own tags. Searches run on the
//! document with its tags stripped out; highlights are then mapped back onto
//! the live content, accounting for the document's tags and for every
//! highlight already inserted.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`annotator`] - The [`TextAnnotator`] facade: search, highlight, unhighlight
//! - [`query`] - Search strategies (direct, token fuzzy, sentence fuzzy, eager) and scoring
//! - [`segment`] - Sentence segmentation with abbreviation heuristics
//! - [`markup`] - Tag stripping and insertion offset adjustment
//! - [`highlight`] - Highlight registry and wrapper markup
//! - [`config`] - JSON configuration
//! - [`utils`] - Entity encoding and char/byte offset helpers
//!
//! ## Quick Start
//!
//! ```
//! use annotext::{FuzzySearchOptions, SearchOptions, TextAnnotator, WrapperOptions};
//!
//! let mut annotator = TextAnnotator::html("<p>I like food and sports.</p>");
//!
//! // exact search fails on the typo, sentence-based fuzzy search recovers it
//! let options = SearchOptions::default().with_fuzzy(FuzzySearchOptions::default());
//! let index = annotator.search("I like fool", &options).unwrap();
//! assert_eq!(annotator.highlight_text(index).unwrap(), "I like food");
//!
//! let content = annotator.highlight(index, &WrapperOptions::default()).unwrap();
//! assert!(content.starts_with(r#"<p><span id="highlight-0" class="highlight">I like food</span>"#));
//! ```
//!
//! ## Coordinates
//!
//! Every location is a byte offset on a char boundary. Similarity ratios and
//! length limits are measured in chars.

pub mod annotator;
pub mod config;
pub mod error;
pub mod highlight;
pub mod markup;
#[cfg(feature = "cli")]
pub mod output;
pub mod query;
pub mod segment;
pub mod utils;

pub use annotator::{Highlighted, HighlightedAll, TextAnnotator};
pub use config::{AnnotatorConfig, ConfigError};
pub use error::{AnnotateError, Result};
pub use highlight::{Highlight, WrapperOptions};
pub use query::{
    DirectSearchOptions, EagerSearchOptions, FuzzySearchOptions, HostSurface, SearchMatch,
    SearchOptions, SentenceRewriter, Strategy,
};
pub use segment::{Abbreviations, SegmenterOptions, Sentence, SentenceSegmenter};
