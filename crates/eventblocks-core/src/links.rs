//! Meeting link detection against a list of base URLs.
//!
//! The upstream service normally detects meeting links itself, guided by the
//! `meeting_urls` query parameter. [`MeetingLinkMatcher`] holds that same
//! list of base URLs and can scan event text locally when the service sent
//! no links.
//!
//! # Example
//!
//! ```
//! use eventblocks_core::links::MeetingLinkMatcher;
//!
//! let matcher = MeetingLinkMatcher::from_csv("https://zoom.us,https://meet.google.com");
//! let links = matcher.extract_from_text("Dial in: https://us02web.zoom.us/j/123 or call");
//! assert_eq!(links, vec!["https://us02web.zoom.us/j/123".to_string()]);
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

/// Regex for extracting URLs from text.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'\)\]]+"#).expect("Invalid URL regex"));

/// Regex for detecting Microsoft Outlook SafeLinks.
///
/// SafeLinks wrap the original URL in a redirect through `safelinks.protection.outlook.com`.
/// The original URL is encoded in the `url` query parameter.
static SAFELINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^/]*safelinks\.protection\.outlook\.com/?\?[^?]*url=([^&]+)")
        .expect("Invalid SafeLink regex")
});

/// Splits a comma-separated base URL setting, dropping blanks.
pub fn parse_base_urls(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Matches URLs against configured meeting service base URLs.
#[derive(Debug, Clone, Default)]
pub struct MeetingLinkMatcher {
    raw: Vec<String>,
    bases: Vec<Url>,
}

impl MeetingLinkMatcher {
    /// Creates a matcher; base URLs that do not parse are skipped.
    pub fn new<I, S>(base_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = base_urls.into_iter().map(Into::into).collect();
        let bases = raw
            .iter()
            .filter_map(|base| match Url::parse(base) {
                Ok(url) => Some(url),
                Err(e) => {
                    debug!(base = %base, error = %e, "Ignoring invalid meeting base URL");
                    None
                }
            })
            .collect();

        Self { raw, bases }
    }

    /// Creates a matcher from a comma-separated setting value.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(parse_base_urls(csv))
    }

    /// Returns true if no base URLs are configured.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns true if `url` lives under one of the base URLs.
    ///
    /// The host must equal the base host or be a subdomain of it, and the
    /// path must start with the base path. The scheme is not compared.
    pub fn matches(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        self.bases.iter().any(|base| under_base(&parsed, base))
    }

    /// Extracts matching meeting URLs from free text, in order, without duplicates.
    pub fn extract_from_text(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        URL_REGEX
            .find_iter(text)
            .map(|m| unwrap_safelink(m.as_str()))
            .filter(|url| self.matches(url))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    /// Extracts meeting URLs from several text fields, de-duplicated across all of them.
    pub fn extract_from_fields<'a, I>(&self, fields: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        fields
            .into_iter()
            .flat_map(|text| self.extract_from_text(text))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}

fn under_base(url: &Url, base: &Url) -> bool {
    let (Some(host), Some(base_host)) = (url.host_str(), base.host_str()) else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let base_host = base_host.to_ascii_lowercase();

    let same_site = host == base_host || host.ends_with(&format!(".{base_host}"));
    same_site && url.path().starts_with(base.path())
}

/// Unwraps a Microsoft Outlook SafeLink to get the original URL.
///
/// If the URL is not a SafeLink, it is returned unchanged.
fn unwrap_safelink(url: &str) -> String {
    if let Some(encoded) = SAFELINK_REGEX.captures(url).and_then(|caps| caps.get(1)) {
        if let Ok(decoded) = urlencoding::decode(encoded.as_str()) {
            return decoded.into_owned();
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_BASES: &str = "https://teams.microsoft.com,https://zoom.us,https://meet.google.com";

    #[test]
    fn parse_csv_trims_and_skips_blanks() {
        assert_eq!(
            parse_base_urls(" https://zoom.us , ,https://meet.google.com,"),
            vec!["https://zoom.us".to_string(), "https://meet.google.com".to_string()]
        );
        assert!(parse_base_urls("").is_empty());
    }

    #[test]
    fn matches_host_and_subdomains() {
        let matcher = MeetingLinkMatcher::from_csv(DEFAULT_BASES);
        assert!(matcher.matches("https://zoom.us/j/123"));
        assert!(matcher.matches("https://us02web.zoom.us/j/123?pwd=abc"));
        assert!(matcher.matches("https://teams.microsoft.com/l/meetup-join/xyz"));
        assert!(!matcher.matches("https://notzoom.us/j/123"));
        assert!(!matcher.matches("https://example.com/zoom.us"));
        assert!(!matcher.matches("not a url"));
    }

    #[test]
    fn base_path_must_prefix() {
        let matcher = MeetingLinkMatcher::from_csv("https://example.com/meet");
        assert!(matcher.matches("https://example.com/meet/room-1"));
        assert!(!matcher.matches("https://example.com/docs"));
    }

    #[test]
    fn invalid_bases_are_ignored() {
        let matcher = MeetingLinkMatcher::from_csv("zoom,https://zoom.us");
        assert!(!matcher.is_empty());
        assert!(matcher.matches("https://zoom.us/j/1"));
    }

    #[test]
    fn extracts_in_order_without_duplicates() {
        let matcher = MeetingLinkMatcher::from_csv(DEFAULT_BASES);
        let text = "Agenda at https://docs.example.com/x\n\
                    Join https://meet.google.com/abc-defg-hij or https://zoom.us/j/9 \
                    (backup https://meet.google.com/abc-defg-hij)";
        assert_eq!(
            matcher.extract_from_text(text),
            vec![
                "https://meet.google.com/abc-defg-hij".to_string(),
                "https://zoom.us/j/9".to_string(),
            ]
        );
    }

    #[test]
    fn unwraps_safelinks_before_matching() {
        let matcher = MeetingLinkMatcher::from_csv(DEFAULT_BASES);
        let text = "https://nam12.safelinks.protection.outlook.com/?url=https%3A%2F%2Fzoom.us%2Fj%2F42&data=abc";
        assert_eq!(
            matcher.extract_from_text(text),
            vec!["https://zoom.us/j/42".to_string()]
        );
    }

    #[test]
    fn fields_are_deduplicated_across() {
        let matcher = MeetingLinkMatcher::from_csv(DEFAULT_BASES);
        let links = matcher.extract_from_fields([
            "https://zoom.us/j/1",
            "see https://zoom.us/j/1 and https://zoom.us/j/2",
        ]);
        assert_eq!(
            links,
            vec!["https://zoom.us/j/1".to_string(), "https://zoom.us/j/2".to_string()]
        );
    }
}
