//! Consent gap evaluation

use serde::{Deserialize, Serialize};

use crate::category::{ConsentCategory, RequiredConsent};
use crate::state::ConsentState;

/// Required categories that are not currently granted, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentGap {
    missing: Vec<ConsentCategory>,
}

impl ConsentGap {
    pub fn between(required: &[ConsentCategory], state: &ConsentState) -> Self {
        Self {
            missing: required
                .iter()
                .filter(|category| !state.is_granted(category))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn categories(&self) -> &[ConsentCategory] {
        &self.missing
    }

    pub fn keys(&self) -> Vec<&str> {
        self.missing.iter().map(ConsentCategory::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapOutcome {
    /// Element carries the ignore sentinel
    Exempt,
    /// Element no longer carries a declaration
    Undeclared,
    Gap(ConsentGap),
}

/// How an element's required categories are determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "category")]
pub enum GapPolicy {
    /// Read from the element's declaration attribute
    Declared,
    /// Every discovered element requires this one category
    Fixed(ConsentCategory),
}

impl GapPolicy {
    pub fn evaluate(&self, declared: Option<&str>, state: &ConsentState) -> GapOutcome {
        match self {
            GapPolicy::Declared => {
                let Some(declared) = declared else {
                    return GapOutcome::Undeclared;
                };
                match RequiredConsent::parse(declared) {
                    RequiredConsent::Ignore => GapOutcome::Exempt,
                    RequiredConsent::Categories(required) => {
                        GapOutcome::Gap(ConsentGap::between(&required, state))
                    }
                }
            }
            GapPolicy::Fixed(category) => {
                if declared.map(str::trim) == Some(crate::IGNORE_SENTINEL) {
                    return GapOutcome::Exempt;
                }
                GapOutcome::Gap(ConsentGap::between(std::slice::from_ref(category), state))
            }
        }
    }
}
