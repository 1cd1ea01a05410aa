//! Frame error types

use thiserror::Error;

use crate::frame::FrameId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Frame not found: {0}")]
    UnknownFrame(FrameId),
}
