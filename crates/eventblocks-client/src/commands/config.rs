//! Configuration commands.

use std::path::Path;

use crate::config::Settings;
use crate::error::{ClientError, ClientResult};

/// Dump the effective configuration to stdout.
pub fn dump(settings: &Settings, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(settings)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(settings: &Settings) -> ClientResult<()> {
    settings.validate().map_err(ClientError::Config)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("config: {}{}", path.display(), state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_bad_settings() {
        let settings = Settings {
            api_url: "nope".to_string(),
            ..Default::default()
        };
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().starts_with("configuration error: apiUrl"));
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(validate(&Settings::default()).is_ok());
    }
}
