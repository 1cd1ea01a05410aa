//! Consent provider capability
//!
//! The provider is owned by a third-party script on the host page. Veil only
//! reads its state and forwards the visitor's decisions to it.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::ConsentError;
use crate::state::ConsentState;
use crate::Result;

pub trait ConsentProvider {
    /// Whether the provider global exists on the page
    fn is_loaded(&self) -> bool;

    /// Current consent mapping, `None` when absent or malformed
    fn consent(&self) -> Option<ConsentState>;

    /// Submit explicit per-category decisions
    fn submit(&self, decision: &ConsentState) -> Result<()>;

    /// Open the provider's settings panel
    fn open_settings(&self) -> Result<()>;
}

impl<P: ConsentProvider + ?Sized> ConsentProvider for Arc<P> {
    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }

    fn consent(&self) -> Option<ConsentState> {
        (**self).consent()
    }

    fn submit(&self, decision: &ConsentState) -> Result<()> {
        (**self).submit(decision)
    }

    fn open_settings(&self) -> Result<()> {
        (**self).open_settings()
    }
}

#[derive(Debug, Default)]
struct MemoryProviderState {
    loaded: bool,
    consent: Option<ConsentState>,
    submissions: Vec<ConsentState>,
    settings_opened: usize,
}

/// In-memory provider
///
/// Submissions are applied immediately and recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    state: Arc<RwLock<MemoryProviderState>>,
}

impl MemoryProvider {
    pub fn new(consent: ConsentState) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryProviderState {
                loaded: true,
                consent: Some(consent),
                ..Default::default()
            })),
        }
    }

    /// Provider whose script has not been injected yet
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Provider that is present but exposes no consent mapping
    pub fn malformed() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryProviderState {
                loaded: true,
                ..Default::default()
            })),
        }
    }

    pub fn load(&self, consent: ConsentState) {
        let mut state = self.state.write();
        state.loaded = true;
        state.consent = Some(consent);
    }

    pub fn set_consent(&self, consent: ConsentState) {
        self.state.write().consent = Some(consent);
    }

    pub fn submissions(&self) -> Vec<ConsentState> {
        self.state.read().submissions.clone()
    }

    pub fn settings_opened(&self) -> usize {
        self.state.read().settings_opened
    }
}

impl ConsentProvider for MemoryProvider {
    fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    fn consent(&self) -> Option<ConsentState> {
        let state = self.state.read();
        if !state.loaded {
            return None;
        }
        state.consent
    }

    fn submit(&self, decision: &ConsentState) -> Result<()> {
        let mut state = self.state.write();
        if !state.loaded {
            return Err(ConsentError::NotLoaded);
        }

        state.consent = Some(*decision);
        state.submissions.push(*decision);

        tracing::debug!(
            preferences = decision.preferences,
            statistics = decision.statistics,
            marketing = decision.marketing,
            "Consent submitted"
        );

        Ok(())
    }

    fn open_settings(&self) -> Result<()> {
        let mut state = self.state.write();
        if !state.loaded {
            return Err(ConsentError::NotLoaded);
        }
        state.settings_opened += 1;
        Ok(())
    }
}
