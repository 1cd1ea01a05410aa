//! Consent categories and per-element requirements

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute value that exempts an element from gating.
pub const IGNORE_SENTINEL: &str = "ignore";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ConsentCategory {
    Necessary,
    Preferences,
    Statistics,
    Marketing,
    /// A name the provider does not know about
    Other(String),
}

impl ConsentCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ConsentCategory::Necessary => "necessary",
            ConsentCategory::Preferences => "preferences",
            ConsentCategory::Statistics => "statistics",
            ConsentCategory::Marketing => "marketing",
            ConsentCategory::Other(key) => key,
        }
    }
}

impl fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Ok(match key.to_lowercase().as_str() {
            "necessary" => ConsentCategory::Necessary,
            "preferences" => ConsentCategory::Preferences,
            "statistics" => ConsentCategory::Statistics,
            "marketing" => ConsentCategory::Marketing,
            _ => ConsentCategory::Other(key.to_string()),
        })
    }
}

impl From<String> for ConsentCategory {
    fn from(s: String) -> Self {
        match s.parse::<ConsentCategory>() {
            Ok(category) => category,
            Err(never) => match never {},
        }
    }
}

impl From<ConsentCategory> for String {
    fn from(category: ConsentCategory) -> Self {
        category.as_str().to_string()
    }
}

/// What an element declares it needs before its embed may load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredConsent {
    /// Never gated, never restored
    Ignore,
    /// Ordered, de-duplicated list of categories
    Categories(Vec<ConsentCategory>),
}

impl RequiredConsent {
    /// Parse a comma-separated declaration such as `statistics,marketing`
    pub fn parse(declared: &str) -> Self {
        if declared.trim() == IGNORE_SENTINEL {
            return RequiredConsent::Ignore;
        }

        let mut categories: Vec<ConsentCategory> = Vec::new();
        for part in declared.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let category: ConsentCategory = part.to_string().into();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        RequiredConsent::Categories(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories() {
        let required = RequiredConsent::parse("statistics, marketing,,marketing");
        assert_eq!(
            required,
            RequiredConsent::Categories(vec![
                ConsentCategory::Statistics,
                ConsentCategory::Marketing
            ])
        );
    }

    #[test]
    fn test_ignore_sentinel() {
        assert_eq!(RequiredConsent::parse(" ignore "), RequiredConsent::Ignore);
        assert!(matches!(
            RequiredConsent::parse("ignore,marketing"),
            RequiredConsent::Categories(_)
        ));
    }

    #[test]
    fn test_unknown_category_keeps_key() {
        let category: ConsentCategory = " Social ".to_string().into();
        assert_eq!(category, ConsentCategory::Other("Social".to_string()));
        assert_eq!(category.as_str(), "Social");
    }

    #[test]
    fn test_empty_declaration() {
        assert_eq!(
            RequiredConsent::parse(" , "),
            RequiredConsent::Categories(Vec::new())
        );
    }
}
