use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How much of each exchange the [`HttpLogger`](super::HttpLogger) writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Level {
    /// Nothing.
    None,
    /// Request and response lines only.
    #[default]
    Basic,
    /// Request and response lines plus headers.
    Headers,
    /// Lines, headers and plaintext bodies.
    Body,
}

impl Level {
    pub fn logs_headers(self) -> bool {
        self >= Level::Headers
    }

    pub fn logs_body(self) -> bool {
        self >= Level::Body
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Level::None),
            "basic" => Ok(Level::Basic),
            "headers" => Ok(Level::Headers),
            "body" => Ok(Level::Body),
            _ => Err(ConfigError::UnknownLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::None => "none",
            Level::Basic => "basic",
            Level::Headers => "headers",
            Level::Body => "body",
        };
        f.write_str(name)
    }
}
