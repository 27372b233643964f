//! Where a day's events come from.
//!
//! The [`EventSource`] trait lets the command handler run against the
//! upstream HTTP service, a saved JSON file, or a test double.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::NaiveDate;
use eventblocks_core::EventRecord;
use serde::Deserialize;
use tracing::debug;

use crate::api::{EventsApi, EventsResponse, FetchError};

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A provider of calendar events for a given day.
pub trait EventSource: Send + Sync {
    /// Returns a short name for log output.
    fn name(&self) -> &str;

    /// Fetches every event of `date`, in any order.
    fn fetch_events(&self, date: NaiveDate) -> BoxFuture<'_, Result<Vec<EventRecord>, FetchError>>;
}

impl EventSource for EventsApi {
    fn name(&self) -> &str {
        "api"
    }

    fn fetch_events(&self, date: NaiveDate) -> BoxFuture<'_, Result<Vec<EventRecord>, FetchError>> {
        Box::pin(EventsApi::fetch_events(self, date))
    }
}

/// Reads events from a JSON file.
///
/// The file holds either a bare array of events or a full response
/// envelope as saved from the service. Only events starting on the
/// requested day are returned.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventsFile {
    List(Vec<EventRecord>),
    Envelope(EventsResponse),
}

/// Parses an events file and keeps the events that start on `date`.
pub fn parse_events_file(content: &str, date: NaiveDate) -> Result<Vec<EventRecord>, FetchError> {
    let file: EventsFile = serde_json::from_str(content)
        .map_err(|e| FetchError::Decode(format!("failed to parse events file: {}", e)))?;

    let events = match file {
        EventsFile::List(events) => events,
        EventsFile::Envelope(envelope) => envelope.into_events()?,
    };

    Ok(events
        .into_iter()
        .filter(|event| event.start.date() == date)
        .collect())
}

impl EventSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch_events(&self, date: NaiveDate) -> BoxFuture<'_, Result<Vec<EventRecord>, FetchError>> {
        Box::pin(async move {
            let content =
                tokio::fs::read_to_string(&self.path)
                    .await
                    .map_err(|e| FetchError::Read {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    })?;

            let events = parse_events_file(&content, date)?;
            debug!(path = %self.path.display(), date = %date, count = events.len(), "Read events file");
            Ok(events)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 18).unwrap()
    }

    const TWO_DAYS: &str = r#"[
        {"subject": "Monday", "start": "2025-08-18T09:00:00Z", "end": "2025-08-18T10:00:00Z"},
        {"subject": "Tuesday", "start": "2025-08-19T09:00:00Z", "end": "2025-08-19T10:00:00Z"}
    ]"#;

    #[test]
    fn bare_array_is_filtered_by_day() {
        let events = parse_events_file(TWO_DAYS, day()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].subject, "Monday");
    }

    #[test]
    fn envelope_is_accepted() {
        let content = r#"{"success": true, "date": "2025-08-18", "events": [
            {"subject": "Sync", "start": "2025-08-18 15:00:00+00:00", "end": "2025-08-18 15:30:00+00:00"}
        ]}"#;
        let events = parse_events_file(content, day()).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn failed_envelope_is_an_error() {
        let content = r#"{"success": false, "error": "boom"}"#;
        assert!(matches!(
            parse_events_file(content, day()),
            Err(FetchError::Upstream(_))
        ));
    }

    #[test]
    fn day_uses_written_offset() {
        let content = r#"[
            {"subject": "Late", "start": "2025-08-18T23:30:00-04:00", "end": "2025-08-19T00:30:00-04:00"}
        ]"#;
        assert_eq!(parse_events_file(content, day()).unwrap().len(), 1);
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            parse_events_file("not json", day()),
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn file_source_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_DAYS.as_bytes()).unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.name(), "file");
        let events = source.fetch_events(day()).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(
            source.fetch_events(day()).await,
            Err(FetchError::Read { .. })
        ));
    }
}
