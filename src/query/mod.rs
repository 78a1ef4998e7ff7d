pub mod direct;
pub mod executor;
pub mod fuzzy;
pub mod options;
pub mod scorer;

pub use executor::{HostSurface, SearchEngine, SearchMatch, Strategy};
pub use options::{
    DirectSearchOptions, EagerSearchOptions, FuzzySearchOptions, Rewriter, SearchOptions,
    SentenceRewriter,
};
pub use scorer::{BestSubstring, BestSubstringParams, best_substring, lcs_length, similarity};
