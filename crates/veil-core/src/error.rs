//! Gate error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Frame error: {0}")]
    Frame(#[from] veil_frames::FrameError),

    #[error("Consent error: {0}")]
    Consent(#[from] veil_consent::ConsentError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
