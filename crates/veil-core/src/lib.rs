//! Veil Core
//!
//! Gates embedded third-party iframes behind the visitor's cookie consent.
//! Frames whose required categories are not granted get a locally rendered
//! placeholder in `srcdoc`; once consent changes the original embed is
//! restored.
//!
//! The page and the consent provider are injected capabilities, see
//! [`veil_frames::Host`] and [`veil_consent::ConsentProvider`].

mod config;
mod error;
mod gate;
mod message;

pub use config::{GateConfig, GateConfigOverrides, PolicyConfig, DECLARATION_ATTRIBUTE};
pub use error::GateError;
pub use gate::{ConsentGate, GateState, ScanReport};
pub use message::GateMessage;

// Re-export the collaborating crates
pub use veil_consent::{
    ConsentCategory, ConsentError, ConsentGap, ConsentProvider, ConsentState, GapOutcome,
    GapPolicy, MemoryProvider, RequiredConsent,
};
pub use veil_frames::{
    DeferredTask, Discovery, Document, FrameError, FrameId, FrameState, Host, HostEvent,
    HostEventKind, ManualScheduler, Scheduler, SourceAttributes, StaticDocument, StaticPage,
    PLACEHOLDER_ATTRIBUTE,
};
pub use veil_placeholder::{Template, Theme};

pub type Result<T> = std::result::Result<T, GateError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
