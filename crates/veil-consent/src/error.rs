//! Consent error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsentError {
    #[error("Consent provider is not loaded")]
    NotLoaded,
}
