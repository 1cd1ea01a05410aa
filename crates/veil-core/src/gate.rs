//! Consent gate lifecycle
//!
//! ```text
//! Uninitialized
//!   ↓ new(): merge config, first scan, register listeners
//! Initialized
//! ```
//!
//! Every consent change and history navigation re-runs the scan. The scan is
//! synchronous and idempotent: a gated frame keeps its placeholder until its
//! gap closes, then `srcdoc` is removed and the untouched `src` shows again.

use parking_lot::RwLock;
use std::time::Duration;

use veil_consent::{ConsentError, ConsentGap, ConsentProvider, ConsentState, GapOutcome, GapPolicy};
use veil_frames::{
    DeferredTask, Discovery, FrameId, FrameState, Host, HostEvent, HostEventKind,
    SourceAttributes, PLACEHOLDER_ATTRIBUTE,
};

use crate::config::GateConfig;
use crate::message::GateMessage;
use crate::Result;

const MISSING_PROVIDER_WARNING: &str =
    "Cookiebot is not loaded. Please add the Cookiebot script to the page.";

/// Events registered during construction
const LIFECYCLE_EVENTS: [HostEventKind; 4] = [
    HostEventKind::ConsentAccepted,
    HostEventKind::ConsentDeclined,
    HostEventKind::PopState,
    HostEventKind::Load,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Uninitialized,
    Initialized,
}

/// What one scan did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Provider absent or malformed, nothing was touched
    pub skipped: bool,
    pub gated: Vec<FrameId>,
    pub restored: Vec<FrameId>,
    pub exempt: usize,
    pub undeclared: usize,
    pub unchanged: usize,
    pub failed: usize,
}

enum FrameOutcome {
    Gated,
    Restored,
    Exempt,
    Undeclared,
    Unchanged,
}

#[derive(Debug)]
struct Lifecycle {
    state: GateState,
    listening: Vec<HostEventKind>,
}

pub struct ConsentGate<H: Host, P: ConsentProvider> {
    config: GateConfig,
    discovery: Discovery,
    gap_policy: GapPolicy,
    sources: SourceAttributes,
    host: H,
    provider: P,
    lifecycle: RwLock<Lifecycle>,
}

impl<H: Host, P: ConsentProvider> ConsentGate<H, P> {
    pub fn new(config: GateConfig, host: H, provider: P) -> Self {
        let gate = Self {
            discovery: config.policy.discovery(),
            gap_policy: config.policy.gap_policy(),
            sources: SourceAttributes::default(),
            config,
            host,
            provider,
            lifecycle: RwLock::new(Lifecycle {
                state: GateState::Uninitialized,
                listening: Vec::new(),
            }),
        };

        gate.scan();
        for kind in LIFECYCLE_EVENTS {
            gate.listen(kind);
        }
        gate.lifecycle.write().state = GateState::Initialized;

        tracing::info!(policy = ?gate.config.policy, "Consent gate initialized");

        gate
    }

    pub fn state(&self) -> GateState {
        self.lifecycle.read().state
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_listening(&self, kind: HostEventKind) -> bool {
        self.lifecycle.read().listening.contains(&kind)
    }

    fn listen(&self, kind: HostEventKind) {
        {
            let mut lifecycle = self.lifecycle.write();
            if lifecycle.listening.contains(&kind) {
                return;
            }
            lifecycle.listening.push(kind);
        }
        // host may dispatch into the gate while registering
        self.host.listen(kind);
    }

    /// Gate or restore every candidate frame
    pub fn scan(&self) -> ScanReport {
        let frames = self.discovery.discover(&self.host);
        self.update_frames(&frames)
    }

    /// Gate or restore `frames`, typically a collection captured by an
    /// earlier query
    ///
    /// Frames whose declaration has since been removed count as undeclared
    /// and keep whatever content they show.
    pub fn update_frames(&self, frames: &[FrameId]) -> ScanReport {
        let Some(consent) = self.provider.consent() else {
            tracing::debug!("Consent provider unavailable, leaving frames untouched");
            return ScanReport {
                skipped: true,
                ..Default::default()
            };
        };

        let mut report = ScanReport::default();
        for &frame in frames {
            match self.process_frame(frame, &consent) {
                Ok(FrameOutcome::Gated) => report.gated.push(frame),
                Ok(FrameOutcome::Restored) => report.restored.push(frame),
                Ok(FrameOutcome::Exempt) => report.exempt += 1,
                Ok(FrameOutcome::Undeclared) => report.undeclared += 1,
                Ok(FrameOutcome::Unchanged) => report.unchanged += 1,
                Err(e) => {
                    tracing::warn!(frame = %frame, error = %e, "Failed to update frame");
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            gated = report.gated.len(),
            restored = report.restored.len(),
            unchanged = report.unchanged,
            "Scan complete"
        );

        report
    }

    fn process_frame(&self, frame: FrameId, consent: &ConsentState) -> Result<FrameOutcome> {
        let declared = self
            .host
            .attribute(frame, self.config.policy.declaration_attribute());

        let gap = match self.gap_policy.evaluate(declared.as_deref(), consent) {
            GapOutcome::Exempt => return Ok(FrameOutcome::Exempt),
            GapOutcome::Undeclared => return Ok(FrameOutcome::Undeclared),
            GapOutcome::Gap(gap) => gap,
        };

        let target = if gap.is_empty() {
            FrameState::Open
        } else {
            FrameState::Gated
        };

        // a gated frame keeps its first placeholder
        match (FrameState::of(&self.host, frame), target) {
            (FrameState::Gated, FrameState::Open) => {
                self.restore(frame)?;
                Ok(FrameOutcome::Restored)
            }
            (FrameState::Open, FrameState::Gated) => {
                self.install(frame, &gap)?;
                Ok(FrameOutcome::Gated)
            }
            _ => Ok(FrameOutcome::Unchanged),
        }
    }

    fn install(&self, frame: FrameId, gap: &ConsentGap) -> Result<()> {
        let source = self.sources.resolve(&self.host, frame).unwrap_or_default();
        if source.is_empty() {
            tracing::warn!(frame = %frame, "Gated frame has no resource locator");
        }

        let placeholder = self.config.template().render(&source, gap.categories());
        self.host
            .set_attribute(frame, PLACEHOLDER_ATTRIBUTE, &placeholder)?;
        self.host.defer(
            Duration::from_millis(self.config.reveal_delay_ms),
            DeferredTask::Reveal(frame),
        );

        tracing::debug!(frame = %frame, source = %source, missing = ?gap.keys(), "Frame gated");

        Ok(())
    }

    fn restore(&self, frame: FrameId) -> Result<()> {
        self.host.remove_attribute(frame, PLACEHOLDER_ATTRIBUTE)?;
        tracing::debug!(frame = %frame, "Frame restored");
        Ok(())
    }

    /// Run a task the host deferred on the gate's behalf
    pub fn run_deferred(&self, task: DeferredTask) -> Result<()> {
        match task {
            DeferredTask::Reveal(frame) => {
                // restored in the meantime
                if FrameState::of(&self.host, frame) != FrameState::Gated {
                    return Ok(());
                }
                self.host.set_display(frame, "block")?;
                Ok(())
            }
        }
    }

    /// Entry point for events the host dispatches
    pub fn handle_event(&self, event: &HostEvent) -> Result<()> {
        if !self.is_listening(event.kind()) {
            tracing::trace!(event = event.kind().dom_name(), "Ignoring unregistered event");
            return Ok(());
        }

        match event {
            HostEvent::ConsentAccepted | HostEvent::ConsentDeclined | HostEvent::PopState => {
                self.scan();
                Ok(())
            }
            HostEvent::Load => {
                self.on_load();
                Ok(())
            }
            HostEvent::Message(data) => self.handle_message(data),
        }
    }

    fn on_load(&self) {
        if !self.provider.is_loaded() {
            tracing::warn!("{}", MISSING_PROVIDER_WARNING);
            return;
        }

        self.scan();
        self.listen(HostEventKind::Message);
    }

    /// Act on a message posted by a placeholder
    pub fn handle_message(&self, data: &str) -> Result<()> {
        let message: GateMessage = match data.parse() {
            Ok(message) => message,
            Err(reason) => {
                tracing::trace!(%reason, "Ignoring message");
                return Ok(());
            }
        };

        match message {
            GateMessage::OpenSettings => {
                self.provider.open_settings()?;
                tracing::debug!("Consent settings opened");
            }
            GateMessage::AcceptMarketing | GateMessage::AcceptRequired(_) => {
                let current = self.provider.consent().ok_or(ConsentError::NotLoaded)?;
                let decision = current.accepting(&message.accepted_categories());
                self.provider.submit(&decision)?;
                tracing::info!(accepted = %message, "Consent submitted from placeholder");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, OnceLock, Weak};
    use veil_consent::MemoryProvider;
    use veil_frames::{Document, Scheduler, StaticPage};

    const PAGE: &str = r#"
        <iframe id="video" data-cookieconsent="marketing" src="https://www.youtube.com/embed/xyz"></iframe>
        <iframe id="map" data-cookieconsent="preferences,statistics" data-cookieblock-src="https://maps.example/embed"></iframe>
        <iframe id="chat" data-cookieconsent="ignore" src="https://chat.example"></iframe>
        <iframe id="plain" src="https://example.com"></iframe>"#;

    fn frame(page: &StaticPage, id: &str) -> FrameId {
        page.query_selector_all(&format!("#{}", id)).unwrap()[0]
    }

    fn gate(consent: ConsentState) -> ConsentGate<StaticPage, MemoryProvider> {
        ConsentGate::new(
            GateConfig::default(),
            StaticPage::parse(PAGE),
            MemoryProvider::new(consent),
        )
    }

    #[test]
    fn test_initial_scan_gates_missing_consent() {
        let gate = gate(ConsentState::new(true, false, false));
        let page = gate.host();

        assert_eq!(gate.state(), GateState::Initialized);
        let video = frame(page, "video");
        let map = frame(page, "map");
        assert!(page.attribute(video, PLACEHOLDER_ATTRIBUTE).is_some());
        assert!(page.attribute(map, PLACEHOLDER_ATTRIBUTE).is_some());
        assert_eq!(
            page.attribute(video, "src").as_deref(),
            Some("https://www.youtube.com/embed/xyz")
        );
        assert!(page.attribute(frame(page, "chat"), PLACEHOLDER_ATTRIBUTE).is_none());
        assert!(page.attribute(frame(page, "plain"), PLACEHOLDER_ATTRIBUTE).is_none());
    }

    #[test]
    fn test_placeholder_lists_only_missing_categories() {
        let gate = gate(ConsentState::new(true, false, false));
        let page = gate.host();

        let srcdoc = page
            .attribute(frame(page, "map"), PLACEHOLDER_ATTRIBUTE)
            .unwrap();
        assert!(srcdoc.contains("Enable Statistics cookies on Cookiebot settings"));
        assert!(srcdoc.contains("https://maps.example/embed"));
    }

    #[test]
    fn test_granted_frames_untouched() {
        let gate = gate(ConsentState::new(true, true, true));
        assert!(gate.host().document().mutations().is_empty());
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let gate = gate(ConsentState::default());
        let before = gate.host().document().mutations().len();

        let report = gate.scan();
        assert!(report.gated.is_empty());
        assert_eq!(report.unchanged, 2);
        assert_eq!(report.exempt, 1);
        assert_eq!(gate.host().document().mutations().len(), before);
    }

    #[test]
    fn test_reveal_after_delay() {
        let gate = gate(ConsentState::default());
        let page = gate.host();
        let video = frame(page, "video");

        assert_eq!(page.document().display(video), None);
        assert!(page.scheduler().advance(Duration::from_millis(100)).is_empty());
        for task in page.scheduler().advance(Duration::from_millis(50)) {
            gate.run_deferred(task).unwrap();
        }
        assert_eq!(page.document().display(video).as_deref(), Some("block"));
    }

    #[test]
    fn test_malformed_provider_skips_scan() {
        let gate = ConsentGate::new(
            GateConfig::default(),
            StaticPage::parse(PAGE),
            MemoryProvider::malformed(),
        );
        assert!(gate.scan().skipped);
        assert!(gate.host().document().mutations().is_empty());
    }

    #[test]
    fn test_listeners_registered_once() {
        let gate = gate(ConsentState::default());
        assert_eq!(gate.host().listeners(), LIFECYCLE_EVENTS.to_vec());

        gate.handle_event(&HostEvent::Load).unwrap();
        gate.handle_event(&HostEvent::Load).unwrap();
        let messages = gate
            .host()
            .listeners()
            .into_iter()
            .filter(|k| *k == HostEventKind::Message)
            .count();
        assert_eq!(messages, 1);
    }

    type CallbackGate = ConsentGate<CallbackHost, MemoryProvider>;

    /// Host that reads the gate back while a listener is registered
    struct CallbackHost {
        page: StaticPage,
        gate: Arc<OnceLock<Weak<CallbackGate>>>,
        seen: RwLock<Vec<(HostEventKind, bool)>>,
    }

    impl Document for CallbackHost {
        fn query_selector_all(&self, selector: &str) -> veil_frames::Result<Vec<FrameId>> {
            self.page.query_selector_all(selector)
        }

        fn attribute(&self, frame: FrameId, name: &str) -> Option<String> {
            self.page.attribute(frame, name)
        }

        fn set_attribute(&self, frame: FrameId, name: &str, value: &str) -> veil_frames::Result<()> {
            self.page.set_attribute(frame, name, value)
        }

        fn remove_attribute(&self, frame: FrameId, name: &str) -> veil_frames::Result<()> {
            self.page.remove_attribute(frame, name)
        }

        fn set_display(&self, frame: FrameId, display: &str) -> veil_frames::Result<()> {
            self.page.set_display(frame, display)
        }
    }

    impl Scheduler for CallbackHost {
        fn defer(&self, delay: Duration, task: DeferredTask) {
            self.page.defer(delay, task);
        }
    }

    impl Host for CallbackHost {
        fn listen(&self, kind: HostEventKind) {
            if let Some(gate) = self.gate.get().and_then(Weak::upgrade) {
                let listening = gate.is_listening(kind);
                self.seen.write().push((kind, listening));
            }
            self.page.listen(kind);
        }
    }

    #[test]
    fn test_host_can_query_gate_while_listening() {
        let cell = Arc::new(OnceLock::new());
        let host = CallbackHost {
            page: StaticPage::parse(PAGE),
            gate: Arc::clone(&cell),
            seen: RwLock::new(Vec::new()),
        };
        let gate = Arc::new(ConsentGate::new(
            GateConfig::default(),
            host,
            MemoryProvider::new(ConsentState::default()),
        ));
        assert!(cell.set(Arc::downgrade(&gate)).is_ok());

        gate.handle_event(&HostEvent::Load).unwrap();

        assert_eq!(
            *gate.host().seen.read(),
            vec![(HostEventKind::Message, true)]
        );
        assert!(gate.is_listening(HostEventKind::Message));
    }
}
