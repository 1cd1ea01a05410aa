//! Host capabilities
//!
//! The page is never reached through globals. The gate receives a [`Host`]
//! at construction and the page forwards its events to the gate.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::frame::FrameId;
use crate::Result;

pub trait Document {
    /// Elements matching a CSS selector, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<FrameId>>;

    fn attribute(&self, frame: FrameId, name: &str) -> Option<String>;

    fn set_attribute(&self, frame: FrameId, name: &str, value: &str) -> Result<()>;

    fn remove_attribute(&self, frame: FrameId, name: &str) -> Result<()>;

    /// Set the element's CSS `display` value
    fn set_display(&self, frame: FrameId, display: &str) -> Result<()>;
}

/// Work the gate hands back to itself after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Make a freshly gated frame visible
    Reveal(FrameId),
}

pub trait Scheduler {
    /// Fire-and-forget; the host returns `task` to the gate once `delay` elapsed
    fn defer(&self, delay: Duration, task: DeferredTask);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostEventKind {
    /// `CookiebotOnAccept`
    ConsentAccepted,
    /// `CookiebotOnDecline`
    ConsentDeclined,
    /// `popstate`
    PopState,
    /// `load`
    Load,
    /// `message` from a child frame
    Message,
}

impl HostEventKind {
    /// DOM event name the host listens for
    pub fn dom_name(&self) -> &'static str {
        match self {
            HostEventKind::ConsentAccepted => "CookiebotOnAccept",
            HostEventKind::ConsentDeclined => "CookiebotOnDecline",
            HostEventKind::PopState => "popstate",
            HostEventKind::Load => "load",
            HostEventKind::Message => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    ConsentAccepted,
    ConsentDeclined,
    PopState,
    Load,
    Message(String),
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::ConsentAccepted => HostEventKind::ConsentAccepted,
            HostEvent::ConsentDeclined => HostEventKind::ConsentDeclined,
            HostEvent::PopState => HostEventKind::PopState,
            HostEvent::Load => HostEventKind::Load,
            HostEvent::Message(_) => HostEventKind::Message,
        }
    }
}

/// The page the gate runs in
pub trait Host: Document + Scheduler {
    /// Register interest in an event; the host then forwards matching events
    fn listen(&self, kind: HostEventKind);
}
