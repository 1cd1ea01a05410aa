//! Placeholder document template

use std::collections::BTreeMap;
use veil_consent::ConsentCategory;

use crate::escape::{escape_html, escape_script_json};
use crate::heading::{join_titles, select_heading, REQUIRED_COOKIES_TOKEN};

/// Hash anchor of the "accept required categories" action
pub const ACCEPT_ANCHOR: &str = "#accept_required_cookies";
/// Hash anchor of the "open settings" action
pub const OPEN_SETTINGS_ANCHOR: &str = "#open_cookiebot";

#[derive(Debug, Clone, Copy)]
pub struct Theme<'a> {
    pub background: &'a str,
    pub text_color: &'a str,
    pub button_background: &'a str,
    pub button_background_hover: &'a str,
    pub button_text_color: &'a str,
    pub gap: &'a str,
    pub custom_css: &'a str,
}

/// Everything needed to render a placeholder, borrowed from the gate config
#[derive(Debug, Clone, Copy)]
pub struct Template<'a> {
    pub show_source_url: bool,
    pub heading_text: &'a BTreeMap<String, String>,
    pub category_titles: &'a BTreeMap<String, String>,
    pub accept_label: &'a str,
    pub settings_label: &'a str,
    pub theme: Theme<'a>,
}

const STYLE: &str = r#"
  * {
    box-sizing: border-box;
  }

  html {
    height: 100%;
  }

  body {
    margin: 0;
    width: 100%;
    display: flex;
    padding: 32px 12px;
    justify-content: center;
    align-items: center;
    background-color: {background};
    color: {text_color};
    position: relative;
    font-family: sans-serif;
    font-weight: 400;
    line-height: 1.34;
  }

  #info {
    display: flex;
    flex-direction: column;
    gap: {gap};
    text-align: left;
    max-width: 750px;
    overflow: hidden;
  }

  .actions {
    display: flex;
    flex-flow: row wrap;
    gap: calc({gap} / 2);
    justify-content: start;
  }

  a.source {
    display: inline;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
    max-width: 250px;
    background: black;
    font-size: 14px;
    position: fixed;
    top: 0;
    left: 0;
    padding: 5px 10px;
    color: currentColor;
    text-decoration: none;
    opacity: .8;
  }

  a.source:hover,
  a.source:focus {
    text-decoration: underline;
  }

  .btn {
    text-decoration: none;
    display: inline-flex;
    font-family: sans-serif;
    padding: 8px 14px;
    background: {button_background};
    color: {button_text_color};
    transition: all 0.2s ease;
    border: none;
  }

  .btn:hover {
    background: {button_background_hover};
  }

  .btn.btn--accept-required-cookies.loading {
    cursor: wait;
  }

  .heading {
    font-family: sans-serif;
    margin: 0;
    font-size: 18px;
  }

  @media screen and (min-width: 400px) {
    body {
      padding: 40px 30px 30px;
      min-height: 100%;
    }
  }

  @media screen and (min-width: 768px) {
    .btn {
      padding: 12px 20px;
    }

    .heading {
      font-size: 36px;
    }
  }

  a.btn:focus-visible {
    outline: 2px solid #005fcc;
    background-color: #eef;
    color: #005fcc;
    transition: outline 0.3s ease, background-color 0.3s ease;
  }

  .loading__overlay {
    position: fixed;
    inset: 0;
    z-index: 999;
    display: flex;
    align-items: center;
    justify-content: center;
    opacity: 0;
    visibility: hidden;
    transition: opacity 0.3s ease, visibility 0.3s ease;
    background-color: {background};
    color: {text_color};
  }

  .loading__overlay--icon {
    width: 10vw;
    height: 10vw;
  }

  .loading__overlay.loading {
    opacity: 0.92;
    visibility: visible;
  }
"#;

const SCRIPT: &str = r##"
  var requiredConsents = {required};
  var overlay = document.querySelector(".loading__overlay");
  var accept = document.querySelector(".btn--accept-required-cookies");
  var actions = document.querySelectorAll('a:not(.source)[href^="#"]');

  actions.forEach(function (a) {
    a.addEventListener("click", function (e) {
      e.preventDefault();
      if (overlay.classList.contains("loading")) {
        return;
      }

      if (a.getAttribute("href") === "{open_anchor}") {
        window.parent.postMessage("open_cookiebot", "*");
      }

      if (a.getAttribute("href") === "{accept_anchor}") {
        overlay.classList.add("loading");
        accept.classList.add("loading");
        window.parent.postMessage("accept_required_cookies:" + requiredConsents.join(","), "*");
      }
    });
  });
"##;

const SPINNER: &str = r#"<svg class="loading__overlay--icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><path d="M10.72 19.9a8 8 0 0 1-6.5-9.79 7.77 7.77 0 0 1 6.18-5.95 8 8 0 0 1 9.49 6.52A1.54 1.54 0 0 0 21.38 12h.13a1.37 1.37 0 0 0 1.38-1.54 11 11 0 1 0-12.7 12.39A1.54 1.54 0 0 0 12 21.34a1.47 1.47 0 0 0-1.28-1.44Z"><animateTransform attributeName="transform" dur="0.75s" repeatCount="indefinite" type="rotate" values="0 12 12;360 12 12"/></path></svg>"#;

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

impl<'a> Template<'a> {
    /// Heading for `source` with the missing category titles substituted
    pub fn heading(&self, source: &str, missing: &[ConsentCategory]) -> String {
        let heading = select_heading(source, self.heading_text);
        if heading.contains(REQUIRED_COOKIES_TOKEN) {
            heading.replacen(
                REQUIRED_COOKIES_TOKEN,
                &join_titles(missing, self.category_titles),
                1,
            )
        } else {
            heading.to_string()
        }
    }

    fn style(&self) -> String {
        let theme = &self.theme;
        let mut style = fill(
            STYLE,
            &[
                ("background", theme.background),
                ("text_color", theme.text_color),
                ("button_background", theme.button_background),
                ("button_background_hover", theme.button_background_hover),
                ("button_text_color", theme.button_text_color),
                ("gap", theme.gap),
            ],
        );
        style.push_str(theme.custom_css);
        style.push('\n');
        style
    }

    fn script(missing: &[ConsentCategory]) -> String {
        let keys: Vec<&str> = missing.iter().map(ConsentCategory::as_str).collect();
        let required = escape_script_json(&keys);
        fill(
            SCRIPT,
            &[
                ("required", required.as_str()),
                ("open_anchor", OPEN_SETTINGS_ANCHOR),
                ("accept_anchor", ACCEPT_ANCHOR),
            ],
        )
    }

    /// Render the placeholder for `source`
    ///
    /// An empty locator renders an empty document.
    pub fn render(&self, source: &str, missing: &[ConsentCategory]) -> String {
        if source.trim().is_empty() {
            return String::new();
        }

        let mut out = String::new();
        out.push_str("<div role=\"dialog\" aria-labelledby=\"consent_required\" id=\"info\">\n");
        out.push_str("  <h1 id=\"consent_required\" class=\"heading\">");
        out.push_str(&self.heading(source, missing));
        out.push_str("</h1>\n");
        out.push_str("  <div class=\"actions\">\n");
        out.push_str("    <a href=\"");
        out.push_str(ACCEPT_ANCHOR);
        out.push_str("\" class=\"btn btn--accept-required-cookies\">");
        out.push_str(self.accept_label);
        out.push_str("</a>\n");
        out.push_str("    <a href=\"");
        out.push_str(OPEN_SETTINGS_ANCHOR);
        out.push_str("\" class=\"btn btn--open-settings\">");
        out.push_str(self.settings_label);
        out.push_str("</a>\n");
        out.push_str("  </div>\n");
        out.push_str("</div>\n");

        out.push_str("<div class=\"loading__overlay\" aria-hidden=\"true\">");
        out.push_str(SPINNER);
        out.push_str("</div>\n");

        if self.show_source_url {
            let escaped = escape_html(source);
            out.push_str("<a href=\"");
            out.push_str(&escaped);
            out.push_str("\" class=\"source\" target=\"_blank\" rel=\"nofollow noopener\" aria-label=\"Open in new tab\">");
            out.push_str(&escaped);
            out.push_str("</a>\n");
        }

        out.push_str("<style>");
        out.push_str(&self.style());
        out.push_str("</style>\n");
        out.push_str("<script>");
        out.push_str(&Self::script(missing));
        out.push_str("</script>\n");

        tracing::trace!(source = %source, bytes = out.len(), "Rendered placeholder");

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        headings: BTreeMap<String, String>,
        titles: BTreeMap<String, String>,
    }

    impl Fixture {
        fn new() -> Self {
            let headings = [
                ("default", "Enable [REQUIRED_COOKIES] cookies to view this content."),
                ("youtube", "To play this video, please enable marketing cookies."),
            ];
            let titles = [("statistics", "Statistics"), ("marketing", "Marketing")];
            Self {
                headings: headings
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                titles: titles
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }

        fn template(&self, show_source_url: bool) -> Template<'_> {
            Template {
                show_source_url,
                heading_text: &self.headings,
                category_titles: &self.titles,
                accept_label: "Accept required cookies",
                settings_label: "Open settings",
                theme: Theme {
                    background: "rgba(0, 0, 0, 0.7)",
                    text_color: "white",
                    button_background: "#88b364",
                    button_background_hover: "#6e9e4f",
                    button_text_color: "white",
                    gap: "15px",
                    custom_css: ".heading { letter-spacing: 1px; }",
                },
            }
        }
    }

    #[test]
    fn test_heading_substitutes_missing_titles() {
        let fixture = Fixture::new();
        let heading = fixture.template(true).heading(
            "https://stats.example/embed",
            &[ConsentCategory::Statistics, ConsentCategory::Marketing],
        );
        assert_eq!(heading, "Enable Statistics & Marketing cookies to view this content.");
    }

    #[test]
    fn test_render_is_self_contained() {
        let fixture = Fixture::new();
        let doc = fixture
            .template(true)
            .render("https://www.youtube.com/embed/xyz", &[ConsentCategory::Marketing]);

        assert!(doc.contains("To play this video"));
        assert!(doc.contains(ACCEPT_ANCHOR));
        assert!(doc.contains(OPEN_SETTINGS_ANCHOR));
        assert!(doc.contains("background-color: rgba(0, 0, 0, 0.7);"));
        assert!(doc.contains("gap: calc(15px / 2);"));
        assert!(doc.contains("@media screen and (min-width: 768px)"));
        assert!(doc.contains(".heading { letter-spacing: 1px; }"));
        assert!(doc.contains(r#"var requiredConsents = ["marketing"];"#));
        assert!(doc.contains("window.parent.postMessage(\"open_cookiebot\", \"*\")"));
        assert!(!doc.contains("window.parent.Cookiebot"));
        assert!(!doc.contains("<link"));
        assert!(!doc.contains("{background}"));
    }

    #[test]
    fn test_loading_overlay_blocks_repeat_clicks() {
        let fixture = Fixture::new();
        let doc = fixture.template(false).render(
            "https://stats.example/embed",
            &[ConsentCategory::Statistics, ConsentCategory::Marketing],
        );

        assert!(doc.contains("@media screen and (min-width: 400px)"));
        assert!(doc.contains(r#"<div class="loading__overlay" aria-hidden="true"><svg class="loading__overlay--icon""#));
        assert!(doc.contains(".loading__overlay.loading {"));
        assert!(doc.contains(r##"document.querySelectorAll('a:not(.source)[href^="#"]')"##));

        let guard = doc
            .find("if (overlay.classList.contains(\"loading\")) {")
            .unwrap();
        let mark = doc.find("overlay.classList.add(\"loading\");").unwrap();
        let post = doc
            .find("window.parent.postMessage(\"accept_required_cookies:\" + requiredConsents.join(\",\"), \"*\");")
            .unwrap();
        assert!(guard < mark && mark < post);
        assert!(doc.contains(r#"var requiredConsents = ["statistics","marketing"];"#));
    }

    #[test]
    fn test_source_link_is_optional_and_escaped() {
        let fixture = Fixture::new();
        let source = "https://www.youtube.com/embed/xyz?a=1&b=\"2\"";

        let shown = fixture.template(true).render(source, &[ConsentCategory::Marketing]);
        assert!(shown.contains("class=\"source\""));
        assert!(shown.contains("a=1&amp;b=&quot;2&quot;"));

        let hidden = fixture.template(false).render(source, &[ConsentCategory::Marketing]);
        assert!(!hidden.contains("class=\"source\""));
        assert!(!hidden.contains("youtube.com/embed/xyz"));
    }

    #[test]
    fn test_empty_source_renders_nothing() {
        let fixture = Fixture::new();
        assert_eq!(fixture.template(true).render("  ", &[ConsentCategory::Marketing]), "");
    }
}
