//! Utility functions shared by the segmenter, the search strategies and the
//! markup index.
//!
//! ## Modules
//!
//! - [`encoding`] - Character-entity encoding used by the direct-search fallback
//! - [`tokenizer`] - Whitespace word spans and char-boundary arithmetic
//!
//! ## Key Functions
//!
//! ```
//! use annotext::utils::{encode_entities, word_spans};
//!
//! assert_eq!(encode_entities("a < b"), "a &lt; b");
//!
//! let spans = word_spans("  hello world");
//! assert_eq!(spans, vec![2..7, 8..13]);
//! ```

pub mod encoding;
pub mod tokenizer;

pub use encoding::*;
pub use tokenizer::*;
