//! Event records as delivered by the upstream calendar service.
//!
//! [`EventRecord`] mirrors one entry of the service's `events` array. Only
//! the fields used for rendering are modelled; anything else in the payload
//! is ignored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::time::EventTimestamp;

/// One calendar appointment.
///
/// `end >= start` is assumed but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// The event title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,

    /// When the event starts.
    pub start: EventTimestamp,

    /// When the event ends.
    pub end: EventTimestamp,

    /// Attendee display names, in the order the service returned them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendees: Vec<String>,

    /// Whether this is an occurrence of a recurring series.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_recurring: bool,

    /// Online meeting URLs detected by the service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub meeting_links: Vec<String>,

    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,

    /// Free-form body text.
    #[serde(default)]
    pub description: Option<String>,
}

impl EventRecord {
    /// Creates an event with the required fields.
    pub fn new(subject: impl Into<String>, start: EventTimestamp, end: EventTimestamp) -> Self {
        Self {
            subject: subject.into(),
            start,
            end,
            attendees: Vec::new(),
            is_recurring: false,
            meeting_links: Vec::new(),
            location: None,
            description: None,
        }
    }

    /// Builder method to set the attendees.
    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to mark the event as recurring.
    pub fn with_recurring(mut self, is_recurring: bool) -> Self {
        self.is_recurring = is_recurring;
        self
    }

    /// Builder method to add a meeting link.
    pub fn with_meeting_link(mut self, url: impl Into<String>) -> Self {
        self.meeting_links.push(url.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
