// src/types/mod.rs
use thiserror::Error;

mod domain_types;

pub use domain_types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid business ID: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid auth token: {reason}")]
    InvalidToken { reason: String },

    #[error("Unknown image profile '{0}' (expected 'card' or 'hero')")]
    UnknownProfile(String),
}
