//! In-memory page combining a document, a timer queue and listener registry

use parking_lot::RwLock;
use std::time::Duration;

use crate::document::StaticDocument;
use crate::frame::FrameId;
use crate::host::{DeferredTask, Document, Host, HostEventKind, Scheduler};
use crate::scheduler::ManualScheduler;
use crate::Result;

pub struct StaticPage {
    document: StaticDocument,
    scheduler: ManualScheduler,
    listeners: RwLock<Vec<HostEventKind>>,
}

impl StaticPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: StaticDocument::parse(markup),
            scheduler: ManualScheduler::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn document(&self) -> &StaticDocument {
        &self.document
    }

    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn is_listening(&self, kind: HostEventKind) -> bool {
        self.listeners.read().contains(&kind)
    }

    /// Registrations in the order they were made, duplicates included
    pub fn listeners(&self) -> Vec<HostEventKind> {
        self.listeners.read().clone()
    }
}

impl Document for StaticPage {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<FrameId>> {
        self.document.query_selector_all(selector)
    }

    fn attribute(&self, frame: FrameId, name: &str) -> Option<String> {
        self.document.attribute(frame, name)
    }

    fn set_attribute(&self, frame: FrameId, name: &str, value: &str) -> Result<()> {
        self.document.set_attribute(frame, name, value)
    }

    fn remove_attribute(&self, frame: FrameId, name: &str) -> Result<()> {
        self.document.remove_attribute(frame, name)
    }

    fn set_display(&self, frame: FrameId, display: &str) -> Result<()> {
        self.document.set_display(frame, display)
    }
}

impl Scheduler for StaticPage {
    fn defer(&self, delay: Duration, task: DeferredTask) {
        self.scheduler.defer(delay, task);
    }
}

impl Host for StaticPage {
    fn listen(&self, kind: HostEventKind) {
        tracing::debug!(event = kind.dom_name(), "Listener registered");
        self.listeners.write().push(kind);
    }
}
