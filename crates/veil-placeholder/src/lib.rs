//! Veil Placeholder Documents
//!
//! Renders the document installed into a gated iframe's `srcdoc`. The output
//! carries its own markup, style and script and loads nothing from the
//! network, so it renders the same inside any isolated frame.
//!
//! The actions inside the placeholder never touch the parent page directly.
//! They are relayed with `window.parent.postMessage`:
//! - `open_cookiebot` opens the provider's settings panel
//! - `accept_required_cookies:<categories>` accepts the listed categories

mod escape;
mod heading;
mod template;

pub use escape::{escape_html, escape_script_json};
pub use heading::{join_titles, select_heading, REQUIRED_COOKIES_TOKEN};
pub use template::{Template, Theme, ACCEPT_ANCHOR, OPEN_SETTINGS_ANCHOR};
