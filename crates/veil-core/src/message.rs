//! Messages placeholders post to the host page
//!
//! | Token                                   | Action                       |
//! | `open_cookiebot`                        | Open the settings panel      |
//! | `accept_marketing`                      | Accept marketing             |
//! | `accept_required_cookies:<categories>`  | Accept the listed categories |

use std::fmt;
use std::str::FromStr;

use veil_consent::ConsentCategory;

const OPEN_SETTINGS: &str = "open_cookiebot";
const ACCEPT_MARKETING: &str = "accept_marketing";
const ACCEPT_REQUIRED_PREFIX: &str = "accept_required_cookies:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateMessage {
    OpenSettings,
    AcceptMarketing,
    AcceptRequired(Vec<ConsentCategory>),
}

impl GateMessage {
    /// Categories this message grants
    pub fn accepted_categories(&self) -> Vec<ConsentCategory> {
        match self {
            GateMessage::OpenSettings => Vec::new(),
            GateMessage::AcceptMarketing => vec![ConsentCategory::Marketing],
            GateMessage::AcceptRequired(categories) => categories.clone(),
        }
    }
}

impl fmt::Display for GateMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateMessage::OpenSettings => f.write_str(OPEN_SETTINGS),
            GateMessage::AcceptMarketing => f.write_str(ACCEPT_MARKETING),
            GateMessage::AcceptRequired(categories) => {
                let keys: Vec<&str> = categories.iter().map(ConsentCategory::as_str).collect();
                write!(f, "{}{}", ACCEPT_REQUIRED_PREFIX, keys.join(","))
            }
        }
    }
}

impl FromStr for GateMessage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            OPEN_SETTINGS => Ok(GateMessage::OpenSettings),
            ACCEPT_MARKETING => Ok(GateMessage::AcceptMarketing),
            _ => {
                let list = s
                    .strip_prefix(ACCEPT_REQUIRED_PREFIX)
                    .ok_or_else(|| format!("Unknown gate message: {}", s))?;
                match veil_consent::RequiredConsent::parse(list) {
                    veil_consent::RequiredConsent::Categories(categories)
                        if !categories.is_empty() =>
                    {
                        Ok(GateMessage::AcceptRequired(categories))
                    }
                    _ => Err(format!("No categories in gate message: {}", s)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("open_cookiebot".parse::<GateMessage>(), Ok(GateMessage::OpenSettings));
        assert_eq!("accept_marketing".parse::<GateMessage>(), Ok(GateMessage::AcceptMarketing));
        assert_eq!(
            "accept_required_cookies:statistics,marketing".parse::<GateMessage>(),
            Ok(GateMessage::AcceptRequired(vec![
                ConsentCategory::Statistics,
                ConsentCategory::Marketing
            ]))
        );
    }

    #[test]
    fn test_reject_unknown_and_empty() {
        assert!("hello".parse::<GateMessage>().is_err());
        assert!("accept_required_cookies:".parse::<GateMessage>().is_err());
        assert!("accept_required_cookies:ignore".parse::<GateMessage>().is_err());
    }

    #[test]
    fn test_display_matches_placeholder_script() {
        let message = GateMessage::AcceptRequired(vec![ConsentCategory::Marketing]);
        assert_eq!(message.to_string(), "accept_required_cookies:marketing");
        assert_eq!(
            GateMessage::AcceptMarketing.accepted_categories(),
            vec![ConsentCategory::Marketing]
        );
    }
}
