mod client;
mod config;
mod exchange;
mod interceptor;
mod level;

pub use client::LoggingClient;
pub use config::{parse_header_names, LoggingConfig, LEVEL_ENV, REDACT_HEADERS_ENV};
pub use exchange::{RecordedRequest, RecordedResponse};
pub use interceptor::HttpLogger;
pub use level::Level;
