//! Error taxonomy
//!
//! "Not found" is never an error: searches return `None`. Errors are reserved
//! for misuse that would otherwise corrupt offsets in the content.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnotateError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("highlight index {index} was never produced by a search ({len} highlights recorded)")]
    InvalidIndex { index: usize, len: usize },

    #[error("highlight {0} is already placed")]
    AlreadyPlaced(usize),

    #[error("highlight {0} is not placed")]
    NotPlaced(usize),

    #[error("computed insertion offset {offset} is not a valid position in the content")]
    InvalidOffset { offset: usize },

    #[error("wrapper markup of highlight {0} is missing from the content")]
    WrapperNotFound(usize),
}
