//! Core types: event records, time, field formatting, templates, rendering

pub mod event;
pub mod format;
pub mod links;
pub mod render;
pub mod template;
pub mod time;
pub mod tracing;

pub use event::EventRecord;
pub use format::{
    BracketPolicy, RECURRING_INDICATOR, format_attendees, format_description,
    format_event_subject, format_meeting_links, make_link,
};
pub use links::{MeetingLinkMatcher, parse_base_urls};
pub use render::{
    DEFAULT_DESCRIPTION_MAX_LENGTH, DEFAULT_OUTPUT_TEMPLATE, RenderConfig, build_variables,
    render_day, render_event,
};
pub use template::{CHILD_DELIMITER, RenderedEvent, Variable, VariableMap};
pub use time::{EventTimestamp, TimeFormat, TimestampError, calculate_duration, format_time};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
