//! Heading selection and category title joining

use std::collections::BTreeMap;
use url::Url;
use veil_consent::ConsentCategory;

/// Replaced by the joined titles of the missing categories
pub const REQUIRED_COOKIES_TOKEN: &str = "[REQUIRED_COOKIES]";

const DEFAULT_KEY: &str = "default";

/// Pick the heading for `source` from a fragment -> text table.
///
/// The hostname of `source` is matched (the raw locator when it does not
/// parse). The longest matching fragment wins; equal lengths fall back to
/// key order. Without a match the `default` entry is used.
pub fn select_heading<'a>(source: &str, table: &'a BTreeMap<String, String>) -> &'a str {
    let host = Url::parse(source)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase));
    let haystack = host.as_deref().unwrap_or(source);

    let mut best: Option<(&String, &String)> = None;
    for (fragment, text) in table {
        if fragment == DEFAULT_KEY || fragment.is_empty() || !haystack.contains(fragment.as_str()) {
            continue;
        }
        if best.map_or(true, |(b, _)| fragment.len() > b.len()) {
            best = Some((fragment, text));
        }
    }

    match best {
        Some((_, text)) => text,
        None => table.get(DEFAULT_KEY).map(String::as_str).unwrap_or(""),
    }
}

/// `A`, `A & B`, `A, B & C`
///
/// Categories without a configured title show their raw key.
pub fn join_titles(categories: &[ConsentCategory], titles: &BTreeMap<String, String>) -> String {
    let names: Vec<&str> = categories
        .iter()
        .map(|c| {
            titles
                .get(c.as_str())
                .map(String::as_str)
                .unwrap_or_else(|| c.as_str())
        })
        .collect();

    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} & {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_youtube_heading_selected() {
        let headings = table(&[("default", "Default"), ("youtube", "YouTube")]);
        assert_eq!(
            select_heading("https://www.youtube.com/embed/xyz", &headings),
            "YouTube"
        );
        assert_eq!(select_heading("https://vimeo.com/1", &headings), "Default");
    }

    #[test]
    fn test_only_hostname_is_matched() {
        let headings = table(&[("default", "Default"), ("youtube", "YouTube")]);
        assert_eq!(
            select_heading("https://example.com/?next=youtube", &headings),
            "Default"
        );
    }

    #[test]
    fn test_unparsable_locator_matches_raw() {
        let headings = table(&[("default", "Default"), ("youtube", "YouTube")]);
        assert_eq!(select_heading("//www.youtube.com/embed/1", &headings), "YouTube");
    }

    #[test]
    fn test_longest_fragment_wins() {
        let headings = table(&[
            ("default", "Default"),
            ("youtube", "YouTube"),
            ("youtube-nocookie", "Privacy-enhanced YouTube"),
        ]);
        assert_eq!(
            select_heading("https://www.youtube-nocookie.com/embed/1", &headings),
            "Privacy-enhanced YouTube"
        );
    }

    #[test]
    fn test_join_titles() {
        let titles = table(&[
            ("preferences", "Preferences"),
            ("statistics", "Statistics"),
            ("marketing", "Marketing"),
        ]);

        assert_eq!(join_titles(&[ConsentCategory::Marketing], &titles), "Marketing");
        assert_eq!(
            join_titles(&[ConsentCategory::Statistics, ConsentCategory::Marketing], &titles),
            "Statistics & Marketing"
        );
        assert_eq!(
            join_titles(
                &[
                    ConsentCategory::Preferences,
                    ConsentCategory::Statistics,
                    ConsentCategory::Marketing
                ],
                &titles
            ),
            "Preferences, Statistics & Marketing"
        );
        assert_eq!(
            join_titles(&[ConsentCategory::Other("social".to_string())], &titles),
            "social"
        );
        assert_eq!(join_titles(&[], &titles), "");
    }
}
