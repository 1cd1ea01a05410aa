//! Gate configuration
//!
//! Overrides use the same camelCase keys a page would pass to the script
//! version, e.g. `{"headingText": {"vimeo": "..."}, "showSourceURL": false}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use veil_consent::{ConsentCategory, GapPolicy};
use veil_frames::Discovery;
use veil_placeholder::{Template, Theme};

use crate::Result;

/// Attribute listing an iframe's required categories
pub const DECLARATION_ATTRIBUTE: &str = "data-cookieconsent";

/// Which frames are gated and what they require
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PolicyConfig {
    /// Iframes carrying `attribute`, requiring the categories it lists
    Declared { attribute: String },
    /// Known marketing embeds, all requiring marketing consent
    MarketingEmbeds,
}

impl PolicyConfig {
    pub fn discovery(&self) -> Discovery {
        match self {
            PolicyConfig::Declared { attribute } => Discovery::attribute(attribute.clone()),
            PolicyConfig::MarketingEmbeds => Discovery::marketing_embeds(),
        }
    }

    pub fn gap_policy(&self) -> GapPolicy {
        match self {
            PolicyConfig::Declared { .. } => GapPolicy::Declared,
            PolicyConfig::MarketingEmbeds => GapPolicy::Fixed(ConsentCategory::Marketing),
        }
    }

    /// Attribute read for the declaration (or the ignore sentinel)
    pub fn declaration_attribute(&self) -> &str {
        match self {
            PolicyConfig::Declared { attribute } => attribute,
            PolicyConfig::MarketingEmbeds => DECLARATION_ATTRIBUTE,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig::Declared {
            attribute: DECLARATION_ATTRIBUTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfig {
    /// Show a link to the original resource inside the placeholder
    #[serde(rename = "showSourceURL")]
    pub show_source_url: bool,
    /// Hostname fragment -> heading, `default` used when nothing matches
    pub heading_text: BTreeMap<String, String>,
    /// Category key -> display title
    pub cookie_categories_title: BTreeMap<String, String>,
    pub accept_button_text: String,
    pub open_cookiebot_settings_button_text: String,
    pub background: String,
    pub text_color: String,
    pub button_background_color: String,
    pub button_background_color_hover: String,
    pub button_text_color: String,
    pub gap: String,
    #[serde(rename = "customCSS")]
    pub custom_css: String,
    /// Delay before a freshly gated frame is made visible
    pub reveal_delay_ms: u64,
    pub policy: PolicyConfig,
}

fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            show_source_url: true,
            heading_text: string_map(&[
                (
                    "default",
                    "Enable [REQUIRED_COOKIES] cookies on Cookiebot settings to view this content.",
                ),
                (
                    "youtube",
                    "To play this video, please enable marketing cookies required by YouTube.",
                ),
            ]),
            cookie_categories_title: string_map(&[
                ("preferences", "Preferences"),
                ("statistics", "Statistics"),
                ("marketing", "Marketing"),
            ]),
            accept_button_text: "Accept required cookies".to_string(),
            open_cookiebot_settings_button_text: "Open Cookiebot Settings".to_string(),
            background: "rgba(0, 0, 0, 0.7)".to_string(),
            text_color: "white".to_string(),
            button_background_color: "#88b364".to_string(),
            button_background_color_hover: "#6e9e4f".to_string(),
            button_text_color: "white".to_string(),
            gap: "15px".to_string(),
            custom_css: String::new(),
            reveal_delay_ms: 150,
            policy: PolicyConfig::default(),
        }
    }
}

/// Partial configuration supplied by the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfigOverrides {
    #[serde(rename = "showSourceURL")]
    pub show_source_url: Option<bool>,
    pub heading_text: Option<BTreeMap<String, String>>,
    pub cookie_categories_title: Option<BTreeMap<String, String>>,
    pub accept_button_text: Option<String>,
    pub open_cookiebot_settings_button_text: Option<String>,
    pub background: Option<String>,
    pub text_color: Option<String>,
    pub button_background_color: Option<String>,
    pub button_background_color_hover: Option<String>,
    pub button_text_color: Option<String>,
    pub gap: Option<String>,
    #[serde(rename = "customCSS")]
    pub custom_css: Option<String>,
    pub reveal_delay_ms: Option<u64>,
    pub policy: Option<PolicyConfig>,
}

impl GateConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl GateConfig {
    /// Defaults with `overrides` applied
    pub fn with_overrides(overrides: GateConfigOverrides) -> Self {
        Self::default().merged(overrides)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::with_overrides(GateConfigOverrides::from_json(json)?))
    }

    /// Scalars are replaced; the heading and title tables merge key by key
    pub fn merged(mut self, overrides: GateConfigOverrides) -> Self {
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *field = value;
            }
        }

        set(&mut self.show_source_url, overrides.show_source_url);
        set(&mut self.accept_button_text, overrides.accept_button_text);
        set(
            &mut self.open_cookiebot_settings_button_text,
            overrides.open_cookiebot_settings_button_text,
        );
        set(&mut self.background, overrides.background);
        set(&mut self.text_color, overrides.text_color);
        set(&mut self.button_background_color, overrides.button_background_color);
        set(
            &mut self.button_background_color_hover,
            overrides.button_background_color_hover,
        );
        set(&mut self.button_text_color, overrides.button_text_color);
        set(&mut self.gap, overrides.gap);
        set(&mut self.custom_css, overrides.custom_css);
        set(&mut self.reveal_delay_ms, overrides.reveal_delay_ms);
        set(&mut self.policy, overrides.policy);

        if let Some(headings) = overrides.heading_text {
            self.heading_text.extend(headings);
        }
        if let Some(titles) = overrides.cookie_categories_title {
            self.cookie_categories_title.extend(titles);
        }

        self
    }

    pub fn template(&self) -> Template<'_> {
        Template {
            show_source_url: self.show_source_url,
            heading_text: &self.heading_text,
            category_titles: &self.cookie_categories_title,
            accept_label: &self.accept_button_text,
            settings_label: &self.open_cookiebot_settings_button_text,
            theme: Theme {
                background: &self.background,
                text_color: &self.text_color,
                button_background: &self.button_background_color,
                button_background_hover: &self.button_background_color_hover,
                button_text_color: &self.button_text_color,
                gap: &self.gap,
                custom_css: &self.custom_css,
            },
        }
    }
}
