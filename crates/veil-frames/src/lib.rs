//! Veil Host Environment
//!
//! Everything the consent gate needs from the page it runs in, expressed as
//! capabilities: a document to query and mutate, a timer to defer work, and
//! the events the page dispatches.
//!
//! `StaticDocument`, `ManualScheduler` and `StaticPage` implement those
//! capabilities in memory.

mod discovery;
mod document;
mod error;
mod frame;
mod host;
mod page;
mod scheduler;

pub use discovery::{Discovery, MARKETING_EMBED_SELECTORS};
pub use document::{Mutation, StaticDocument};
pub use error::FrameError;
pub use frame::{FrameId, FrameState, SourceAttributes, PLACEHOLDER_ATTRIBUTE};
pub use host::{DeferredTask, Document, Host, HostEvent, HostEventKind, Scheduler};
pub use page::StaticPage;
pub use scheduler::ManualScheduler;

pub type Result<T> = std::result::Result<T, FrameError>;
