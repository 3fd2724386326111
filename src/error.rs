use thiserror::Error;

/// Rejected arguments and failures while assembling a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("unexpected scheme: {0}")]
    UnexpectedScheme(String),

    #[error("invalid host: {0:?}")]
    InvalidHost(String),

    #[error("invalid port: {0}")]
    InvalidPort(u16),

    #[error("url has no scheme")]
    MissingScheme,

    #[error("url has no host")]
    MissingHost,

    #[error(transparent)]
    Parse(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown log level {0:?} (expected none, basic, headers or body)")]
    UnknownLevel(String),

    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("unknown name style {0:?} (expected snake, camel, pascal or kebab)")]
    UnknownNameStyle(String),
}
