//! Event rendering pipeline.
//!
//! [`render_event`] turns one [`EventRecord`] into block content by building
//! its [`VariableMap`] with the field formatters and handing it to the
//! template renderer. [`render_day`] does the same for a whole day in start
//! order.

use tracing::trace;

use crate::event::EventRecord;
use crate::format::{BracketPolicy, format_attendees, format_description, format_event_subject};
use crate::links::MeetingLinkMatcher;
use crate::template::{self, RenderedEvent, Variable, VariableMap};
use crate::time::{TimeFormat, calculate_duration, format_time};

/// Template used when none is configured.
pub const DEFAULT_OUTPUT_TEMPLATE: &str =
    "{subject}\nevent-time:: {time}\nevent-duration:: {duration}\nattendees:: {attendees}";

/// Default cap on description length.
pub const DEFAULT_DESCRIPTION_MAX_LENGTH: usize = 200;

/// Fully resolved rendering options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Clock style for `{time}`.
    pub time_format: TimeFormat,
    /// When to wrap subjects in `[[...]]`.
    pub bracket_policy: BracketPolicy,
    /// Attendee name to leave out, usually the user's own.
    pub exclude_attendee_name: Option<String>,
    /// Description length cap in characters; 0 means unlimited.
    pub description_max_length: usize,
    /// Keep property lines whose value is empty.
    pub include_empty_fields: bool,
    /// The block template.
    pub output_template: String,
    /// Meeting service base URLs, for local link detection.
    pub meeting_base_urls: Vec<String>,
    /// Scan location and description for meeting links when the event has none.
    pub detect_links_locally: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::H12,
            bracket_policy: BracketPolicy::None,
            exclude_attendee_name: None,
            description_max_length: DEFAULT_DESCRIPTION_MAX_LENGTH,
            include_empty_fields: false,
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            meeting_base_urls: Vec::new(),
            detect_links_locally: false,
        }
    }
}

impl RenderConfig {
    /// Builder method to set the template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.output_template = template.into();
        self
    }

    /// Builder method to set the time format.
    #[must_use]
    pub fn with_time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Builder method to set the bracket policy.
    #[must_use]
    pub fn with_bracket_policy(mut self, policy: BracketPolicy) -> Self {
        self.bracket_policy = policy;
        self
    }

    /// Builder method to set the excluded attendee.
    #[must_use]
    pub fn with_excluded_attendee(mut self, name: impl Into<String>) -> Self {
        self.exclude_attendee_name = Some(name.into());
        self
    }
}

/// Computes every template variable for one event.
pub fn build_variables(event: &EventRecord, config: &RenderConfig) -> VariableMap {
    let links = meeting_links(event, config);
    let location = event.location.as_deref().map(str::trim).unwrap_or_default();
    let description = event.description.as_deref().unwrap_or_default();

    [
        (
            Variable::Subject,
            format_event_subject(
                &event.subject,
                event.is_recurring,
                &links,
                config.bracket_policy,
            ),
        ),
        (Variable::Time, format_time(&event.start, config.time_format)),
        (Variable::Duration, calculate_duration(&event.start, &event.end)),
        (
            Variable::Attendees,
            format_attendees(&event.attendees, config.exclude_attendee_name.as_deref()),
        ),
        (Variable::Location, location.to_string()),
        (
            Variable::Description,
            format_description(description, config.description_max_length),
        ),
    ]
    .into_iter()
    .collect()
}

/// Renders one event into block content.
pub fn render_event(event: &EventRecord, config: &RenderConfig) -> RenderedEvent {
    let variables = build_variables(event, config);
    let rendered = template::render(
        &config.output_template,
        &variables,
        config.include_empty_fields,
    );
    trace!(
        subject = %event.subject,
        children = rendered.child_blocks.len(),
        "Rendered event"
    );
    rendered
}

/// Renders a day's events, earliest start first.
///
/// Events with equal starts keep their input order.
pub fn render_day(events: &[EventRecord], config: &RenderConfig) -> Vec<RenderedEvent> {
    let mut sorted: Vec<&EventRecord> = events.iter().collect();
    sorted.sort_by_key(|event| event.start);
    sorted
        .into_iter()
        .map(|event| render_event(event, config))
        .collect()
}

fn meeting_links(event: &EventRecord, config: &RenderConfig) -> Vec<String> {
    if !event.meeting_links.is_empty() || !config.detect_links_locally {
        return event.meeting_links.clone();
    }

    let matcher = MeetingLinkMatcher::new(config.meeting_base_urls.iter().cloned());
    matcher.extract_from_fields(
        [event.location.as_deref(), event.description.as_deref()]
            .into_iter()
            .flatten(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::EventTimestamp;

    fn ts(s: &str) -> EventTimestamp {
        EventTimestamp::parse(s).unwrap()
    }

    fn standup() -> EventRecord {
        EventRecord::new("Standup", ts("2025-08-18T09:00:00Z"), ts("2025-08-18T09:15:00Z"))
            .with_attendees(["Ada", "Me", "Grace"])
            .with_recurring(true)
    }

    #[test]
    fn default_config_matches_settings_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.time_format, TimeFormat::H12);
        assert_eq!(config.bracket_policy, BracketPolicy::None);
        assert_eq!(config.description_max_length, 200);
        assert!(!config.include_empty_fields);
        assert_eq!(config.output_template, DEFAULT_OUTPUT_TEMPLATE);
    }

    #[test]
    fn variables_are_computed_from_event_and_config() {
        let config = RenderConfig::default()
            .with_bracket_policy(BracketPolicy::Recurring)
            .with_excluded_attendee("Me");
        let vars = build_variables(&standup().with_location("  Room 4 "), &config);

        assert_eq!(vars.get(Variable::Subject), "[[Standup]] 🔃");
        assert_eq!(vars.get(Variable::Time), "9:00 AM");
        assert_eq!(vars.get(Variable::Duration), "00:15:00");
        assert_eq!(vars.get(Variable::Attendees), "[Ada], [Grace]");
        assert_eq!(vars.get(Variable::Location), "Room 4");
        assert_eq!(vars.get(Variable::Description), "");
    }

    #[test]
    fn default_template() {
        let rendered = render_event(&standup(), &RenderConfig::default());
        assert_eq!(
            rendered.main_content,
            "Standup 🔃\nevent-time:: 9:00 AM\nevent-duration:: 00:15:00\nattendees:: [Ada], [Me], [Grace]"
        );
        assert!(rendered.child_blocks.is_empty());
    }

    #[test]
    fn empty_attendees_line_is_dropped() {
        let event = EventRecord::new("Focus", ts("2025-08-18T14:00:00Z"), ts("2025-08-18T16:00:00Z"));
        let rendered = render_event(&event, &RenderConfig::default());
        assert_eq!(
            rendered.main_content,
            "Focus\nevent-time:: 2:00 PM\nevent-duration:: 02:00:00"
        );
    }

    #[test]
    fn local_detection_only_when_enabled_and_missing() {
        let event = EventRecord::new("Sync", ts("2025-08-18T10:00:00Z"), ts("2025-08-18T10:30:00Z"))
            .with_description("Join: https://zoom.us/j/77");
        let mut config = RenderConfig::default().with_template("{subject}");
        config.meeting_base_urls = vec!["https://zoom.us".to_string()];

        assert_eq!(render_event(&event, &config).main_content, "Sync");

        config.detect_links_locally = true;
        assert_eq!(
            render_event(&event, &config).main_content,
            "Sync [Join Meeting](https://zoom.us/j/77)"
        );

        let with_upstream_link = event.with_meeting_link("https://meet.google.com/abc");
        assert_eq!(
            render_event(&with_upstream_link, &config).main_content,
            "Sync [Join Meeting](https://meet.google.com/abc)"
        );
    }

    #[test]
    fn day_is_sorted_by_start() {
        let late = EventRecord::new("Late", ts("2025-08-18T15:00:00Z"), ts("2025-08-18T16:00:00Z"));
        let early = EventRecord::new("Early", ts("2025-08-18T08:00:00Z"), ts("2025-08-18T08:30:00Z"));
        let mid = EventRecord::new("Mid", ts("2025-08-18T11:00:00Z"), ts("2025-08-18T12:00:00Z"));
        let config = RenderConfig::default().with_template("{subject}");

        let rendered = render_day(&[late, early, mid], &config);
        let subjects: Vec<_> = rendered.iter().map(|r| r.main_content.as_str()).collect();
        assert_eq!(subjects, vec!["Early", "Mid", "Late"]);
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let a = EventRecord::new("A", ts("2025-08-18T09:00:00Z"), ts("2025-08-18T10:00:00Z"));
        let b = EventRecord::new("B", ts("2025-08-18T09:00:00Z"), ts("2025-08-18T09:30:00Z"));
        let config = RenderConfig::default().with_template("{subject}");

        let rendered = render_day(&[b, a], &config);
        assert_eq!(rendered[0].main_content, "B");
        assert_eq!(rendered[1].main_content, "A");
    }
}
