//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/eventblocks/config.toml` by default. Keys are camelCase:
//!
//! ```toml
//! apiUrl = "http://localhost:5000"
//! timeFormat = "24"
//! bracketEvents = "recurring"
//! excludeUserName = "Martin, David"
//! outputFormat = "{subject}\nevent-time:: {time}"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use eventblocks_core::{
    BracketPolicy, DEFAULT_DESCRIPTION_MAX_LENGTH, DEFAULT_OUTPUT_TEMPLATE, RenderConfig,
    TimeFormat, parse_base_urls,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, EventsApiConfig};

/// Meeting services recognized out of the box.
pub const DEFAULT_MEETING_BASE_URLS: &str =
    "https://teams.microsoft.com,https://zoom.us,https://meet.google.com";

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the events service.
    pub api_url: String,

    /// When to wrap subjects in `[[...]]`.
    pub bracket_events: BracketPolicy,

    /// `12` or `24` hour clock.
    pub time_format: TimeFormat,

    /// Comma-separated meeting service base URLs.
    pub meeting_base_urls: String,

    /// Block template.
    pub output_format: String,

    /// Keep property lines whose value is empty.
    pub include_empty_fields: bool,

    /// Description length cap in characters; 0 means unlimited.
    pub description_max_length: usize,

    /// Attendee name to leave out of `{attendees}`.
    pub exclude_user_name: String,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Look for meeting links in location and description when the service sent none.
    pub detect_links_locally: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bracket_events: BracketPolicy::None,
            time_format: TimeFormat::H12,
            meeting_base_urls: DEFAULT_MEETING_BASE_URLS.to_string(),
            output_format: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            include_empty_fields: false,
            description_max_length: DEFAULT_DESCRIPTION_MAX_LENGTH,
            exclude_user_name: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            detect_links_locally: false,
        }
    }
}

impl Settings {
    /// Loads settings from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads settings from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eventblocks")
    }

    /// Checks values that the file format alone cannot.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if let Err(e) = Url::parse(self.api_url.trim()) {
            problems.push(format!("apiUrl {:?} is not a valid URL: {}", self.api_url, e));
        }

        for base in parse_base_urls(&self.meeting_base_urls) {
            if let Err(e) = Url::parse(&base) {
                problems.push(format!("meetingBaseUrls entry {:?} is not a valid URL: {}", base, e));
            }
        }

        if self.timeout_secs == 0 {
            problems.push("timeoutSecs must be greater than 0".to_string());
        }

        if self.output_format.trim().is_empty() {
            problems.push("outputFormat must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Resolves the rendering options.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            time_format: self.time_format,
            bracket_policy: self.bracket_events,
            exclude_attendee_name: Some(self.exclude_user_name.clone())
                .filter(|name| !name.is_empty()),
            description_max_length: self.description_max_length,
            include_empty_fields: self.include_empty_fields,
            output_template: self.output_format.clone(),
            meeting_base_urls: parse_base_urls(&self.meeting_base_urls),
            detect_links_locally: self.detect_links_locally,
        }
    }

    /// Resolves the upstream connection settings.
    pub fn api_config(&self) -> EventsApiConfig {
        EventsApiConfig::new(self.api_url.trim())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_meeting_base_urls(parse_base_urls(&self.meeting_base_urls))
    }
}
