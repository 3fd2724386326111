use reqwest::header::{HeaderName, AUTHORIZATION, PROXY_AUTHORIZATION};

use super::Level;
use crate::error::ConfigError;

pub const LEVEL_ENV: &str = "REQLOG_LEVEL";
pub const REDACT_HEADERS_ENV: &str = "REQLOG_REDACT_HEADERS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Level,
    /// Headers whose values are never written out.
    pub redact_headers: Vec<HeaderName>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::Basic,
            redact_headers: vec![AUTHORIZATION, PROXY_AUTHORIZATION],
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `REQLOG_LEVEL` and `REQLOG_REDACT_HEADERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// A redaction list replaces the default one rather than extending it.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(level) = lookup(LEVEL_ENV) {
            config.level = level.parse()?;
        }
        if let Some(names) = lookup(REDACT_HEADERS_ENV) {
            config.redact_headers = parse_header_names(&names)?;
        }
        Ok(config)
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn redact(mut self, name: &str) -> Result<Self, ConfigError> {
        let name = parse_header_name(name)?;
        if !self.redact_headers.contains(&name) {
            self.redact_headers.push(name);
        }
        Ok(self)
    }
}

/// Parse a comma separated list of header names, ignoring empty entries.
pub fn parse_header_names(list: &str) -> Result<Vec<HeaderName>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(parse_header_name)
        .collect()
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| ConfigError::InvalidHeaderName(name.to_string()))
}
