//! Annotator configuration
//!
//! A JSON file carrying everything about an annotation run that can be
//! serialized: content type, abbreviations, search options and the wrapper.
//! Sentence rewriters and host surfaces are attached in code.

use crate::highlight::WrapperOptions;
use crate::query::SearchOptions;
use crate::segment::Abbreviations;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Treat the content as markup
    pub is_html: bool,
    /// Replaces the built-in English abbreviation list
    pub abbreviations: Option<Abbreviations>,
    pub search: SearchOptions,
    pub wrapper: WrapperOptions,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            is_html: true,
            abbreviations: None,
            search: SearchOptions::default(),
            wrapper: WrapperOptions::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AnnotatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tag = &self.wrapper.tag_name;
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "wrapper tag name {tag:?} must be a non-empty element name"
            )));
        }

        if let Some(fuzzy) = &self.search.fuzzy {
            check_unit("fuzzy.token_threshold", fuzzy.token_threshold)?;
            check_unit("fuzzy.sentence_threshold", fuzzy.sentence_threshold)?;
            if fuzzy.max_sentence_length_diff < 0.0 {
                return Err(ConfigError::Validation(
                    "fuzzy.max_sentence_length_diff must not be negative".into(),
                ));
            }
            if fuzzy.length_ratio <= 0.0 {
                return Err(ConfigError::Validation(
                    "fuzzy.length_ratio must be positive".into(),
                ));
            }
        }

        if let Some(eager) = &self.search.eager {
            check_unit("eager.threshold", eager.threshold)?;
        }

        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} must be between 0 and 1, got {value}"
        )))
    }
}
