//! Consent state as reported by the provider

use serde::{Deserialize, Serialize};

use crate::category::ConsentCategory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentState {
    pub preferences: bool,
    pub statistics: bool,
    pub marketing: bool,
}

impl ConsentState {
    pub fn new(preferences: bool, statistics: bool, marketing: bool) -> Self {
        Self {
            preferences,
            statistics,
            marketing,
        }
    }

    pub fn is_granted(&self, category: &ConsentCategory) -> bool {
        match category {
            ConsentCategory::Necessary => true,
            ConsentCategory::Preferences => self.preferences,
            ConsentCategory::Statistics => self.statistics,
            ConsentCategory::Marketing => self.marketing,
            ConsentCategory::Other(_) => false,
        }
    }

    /// Decision to submit when the visitor accepts `required`.
    ///
    /// Required categories become granted; every other category keeps the
    /// value the provider currently reports.
    pub fn accepting(&self, required: &[ConsentCategory]) -> ConsentState {
        let mut decision = *self;
        for category in required {
            match category {
                ConsentCategory::Preferences => decision.preferences = true,
                ConsentCategory::Statistics => decision.statistics = true,
                ConsentCategory::Marketing => decision.marketing = true,
                ConsentCategory::Necessary | ConsentCategory::Other(_) => {}
            }
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepting_only_flips_required() {
        let current = ConsentState::new(true, false, false);
        let decision = current.accepting(&[ConsentCategory::Marketing]);
        assert_eq!(decision, ConsentState::new(true, false, true));
    }

    #[test]
    fn test_accepting_never_downgrades() {
        let current = ConsentState::new(true, true, false);
        let decision = current.accepting(&[ConsentCategory::Marketing]);
        assert!(decision.preferences);
        assert!(decision.statistics);
    }

    #[test]
    fn test_necessary_always_granted() {
        let state = ConsentState::default();
        assert!(state.is_granted(&ConsentCategory::Necessary));
        assert!(!state.is_granted(&ConsentCategory::Other("social".to_string())));
    }
}
