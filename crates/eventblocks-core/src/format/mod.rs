//! Display strings for individual event fields.
//!
//! These formatters produce the values that fill template placeholders:
//! - **attendees**: filtered and bracketed names
//! - **description**: trimmed and length-capped text
//! - **subject**: bracket policy, recurrence marker and meeting links
//!
//! # Example
//!
//! ```rust
//! use eventblocks_core::format::{format_event_subject, BracketPolicy};
//!
//! let links = vec!["https://zoom.us/j/1".to_string()];
//! let subject = format_event_subject("Sync", false, &links, BracketPolicy::None);
//! assert_eq!(subject, "Sync [Join Meeting](https://zoom.us/j/1)");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker appended to the subject of recurring events.
pub const RECURRING_INDICATOR: &str = "🔃";

/// Appended to descriptions cut at the length limit.
const ELLIPSIS: &str = "...";

/// When to wrap event subjects in `[[...]]` page-link brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketPolicy {
    /// Wrap every subject.
    All,
    /// Wrap only subjects of recurring events.
    Recurring,
    /// Never wrap.
    #[default]
    None,
}

impl BracketPolicy {
    /// Returns the settings value for this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Recurring => "recurring",
            Self::None => "none",
        }
    }

    /// Returns true if a subject with the given recurrence should be wrapped.
    pub fn wraps(&self, is_recurring: bool) -> bool {
        match self {
            Self::All => true,
            Self::Recurring => is_recurring,
            Self::None => false,
        }
    }
}

impl fmt::Display for BracketPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BracketPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            "recurring" => Ok(Self::Recurring),
            "none" => Ok(Self::None),
            other => Err(format!(
                "invalid bracket policy {other:?}, expected one of: all, recurring, none"
            )),
        }
    }
}

/// Formats attendees as `[name]` entries joined by `, `.
///
/// Entries exactly equal to `exclude` are dropped (case-sensitive, no
/// trimming). An empty `exclude` filters nothing.
pub fn format_attendees(attendees: &[String], exclude: Option<&str>) -> String {
    let exclude = exclude.filter(|name| !name.is_empty());

    attendees
        .iter()
        .filter(|name| exclude != Some(name.as_str()))
        .map(|name| format!("[{name}]"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trims a description and caps it at `max_length` characters.
///
/// Text over the limit is cut, trimmed again, and suffixed with `...`.
/// A limit of zero means unlimited.
pub fn format_description(description: &str, max_length: usize) -> String {
    let trimmed = description.trim();

    if max_length == 0 || trimmed.chars().count() <= max_length {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(max_length).collect();
    format!("{}{ELLIPSIS}", cut.trim())
}

/// Builds the subject line: optional brackets, recurrence marker, then links.
pub fn format_event_subject(
    subject: &str,
    is_recurring: bool,
    meeting_links: &[String],
    policy: BracketPolicy,
) -> String {
    let mut out = if policy.wraps(is_recurring) {
        format!("[[{subject}]]")
    } else {
        subject.to_string()
    };

    if is_recurring {
        out.push(' ');
        out.push_str(RECURRING_INDICATOR);
    }

    if !meeting_links.is_empty() {
        out.push(' ');
        out.push_str(&format_meeting_links(meeting_links));
    }

    out
}

/// Renders meeting links as markdown, space separated.
///
/// A single link is labelled `Join Meeting`; several are numbered from 1.
pub fn format_meeting_links(links: &[String]) -> String {
    match links {
        [] => String::new(),
        [only] => make_link("Join Meeting", only),
        many => many
            .iter()
            .enumerate()
            .map(|(i, url)| make_link(&format!("Join Meeting {}", i + 1), url))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Creates a markdown link.
pub fn make_link(label: &str, url: &str) -> String {
    format!("[{label}]({url})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    mod attendees {
        use super::*;

        #[test]
        fn brackets_and_joins_in_order() {
            let list = names(&["Ada", "Grace", "Linus"]);
            assert_eq!(format_attendees(&list, None), "[Ada], [Grace], [Linus]");
        }

        #[test]
        fn empty_input() {
            assert_eq!(format_attendees(&[], None), "");
            assert_eq!(format_attendees(&[], Some("Ada")), "");
        }

        #[test]
        fn excludes_every_exact_match() {
            let list = names(&["Martin, David", "Ada", "Martin, David", "Grace"]);
            assert_eq!(
                format_attendees(&list, Some("Martin, David")),
                "[Ada], [Grace]"
            );
        }

        #[test]
        fn exclusion_is_case_sensitive_and_untrimmed() {
            let list = names(&["ada", "Ada ", "Ada"]);
            assert_eq!(format_attendees(&list, Some("Ada")), "[ada], [Ada ]");
        }

        #[test]
        fn empty_exclude_filters_nothing() {
            let list = names(&["", "Ada"]);
            assert_eq!(format_attendees(&list, Some("")), "[], [Ada]");
        }

        #[test]
        fn only_excluded_attendee_gives_empty_text() {
            let list = names(&["Me"]);
            assert_eq!(format_attendees(&list, Some("Me")), "");
        }

        #[test]
        fn never_contains_excluded_and_keeps_order() {
            let list = names(&["C", "me", "A", "me", "B"]);
            let out = format_attendees(&list, Some("me"));
            assert!(!out.split(", ").any(|entry| entry == "[me]"));
            assert_eq!(out, "[C], [A], [B]");
        }
    }

    mod description {
        use super::*;

        #[test]
        fn trims_whitespace() {
            assert_eq!(format_description("  hello world \n", 0), "hello world");
        }

        #[test]
        fn unlimited_when_zero() {
            let long = "x".repeat(1000);
            assert_eq!(format_description(&long, 0), long);
        }

        #[test]
        fn within_limit_unchanged() {
            assert_eq!(format_description("hello", 5), "hello");
        }

        #[test]
        fn over_limit_truncated_with_ellipsis() {
            assert_eq!(format_description("hello world", 8), "hello wo...");
        }

        #[test]
        fn cut_is_retrimmed_before_ellipsis() {
            assert_eq!(format_description("hello world", 6), "hello...");
        }

        #[test]
        fn limit_applies_to_trimmed_text() {
            assert_eq!(format_description("   abc   ", 3), "abc");
        }

        #[test]
        fn counts_characters_not_bytes() {
            assert_eq!(format_description("héllo wörld", 5), "héllo...");
        }

        #[test]
        fn empty_description() {
            assert_eq!(format_description("", 200), "");
            assert_eq!(format_description("   ", 200), "");
        }
    }

    mod subject {
        use super::*;

        #[test]
        fn recurring_policy_wraps_recurring() {
            assert_eq!(
                format_event_subject("Standup", true, &[], BracketPolicy::Recurring),
                "[[Standup]] 🔃"
            );
        }

        #[test]
        fn recurring_policy_skips_single_events() {
            assert_eq!(
                format_event_subject("Standup", false, &[], BracketPolicy::Recurring),
                "Standup"
            );
        }

        #[test]
        fn none_policy_keeps_marker() {
            assert_eq!(
                format_event_subject("Standup", true, &[], BracketPolicy::None),
                "Standup 🔃"
            );
        }

        #[test]
        fn all_policy_wraps_everything() {
            assert_eq!(
                format_event_subject("Review", false, &[], BracketPolicy::All),
                "[[Review]]"
            );
            assert_eq!(
                format_event_subject("Review", true, &[], BracketPolicy::All),
                "[[Review]] 🔃"
            );
        }

        #[test]
        fn single_link() {
            let links = names(&["https://meet.google.com/abc-defg-hij"]);
            assert_eq!(
                format_event_subject("Sync", false, &links, BracketPolicy::None),
                "Sync [Join Meeting](https://meet.google.com/abc-defg-hij)"
            );
        }

        #[test]
        fn numbered_links() {
            let links = names(&["https://zoom.us/j/1", "https://zoom.us/j/2"]);
            assert_eq!(
                format_event_subject("Sync", false, &links, BracketPolicy::None),
                "Sync [Join Meeting 1](https://zoom.us/j/1) [Join Meeting 2](https://zoom.us/j/2)"
            );
        }

        #[test]
        fn links_follow_marker_outside_brackets() {
            let links = names(&["https://zoom.us/j/1"]);
            assert_eq!(
                format_event_subject("Standup", true, &links, BracketPolicy::All),
                "[[Standup]] 🔃 [Join Meeting](https://zoom.us/j/1)"
            );
        }
    }

    mod bracket_policy {
        use super::*;

        #[test]
        fn default_is_none() {
            assert_eq!(BracketPolicy::default(), BracketPolicy::None);
        }

        #[test]
        fn parse_values() {
            assert_eq!("all".parse::<BracketPolicy>().unwrap(), BracketPolicy::All);
            assert_eq!(
                "recurring".parse::<BracketPolicy>().unwrap(),
                BracketPolicy::Recurring
            );
            assert_eq!("none".parse::<BracketPolicy>().unwrap(), BracketPolicy::None);
            assert!("some".parse::<BracketPolicy>().is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let json = serde_json::to_string(&BracketPolicy::Recurring).unwrap();
            assert_eq!(json, "\"recurring\"");
            let parsed: BracketPolicy = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, BracketPolicy::Recurring);
        }
    }
}
