use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Display;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_ENCODING};

use super::{Level, LoggingConfig, RecordedRequest, RecordedResponse};
use crate::body::{classify, BodyKind};
use crate::utils::{LogHandler, LogLevel, TracingLogger};

const REDACTED: &str = "██";

/// Writes request and response lines, headers and bodies to a [`LogHandler`].
///
/// Output follows the `-->` / `<--` layout:
///
/// ```text
/// --> POST https://example.com/api HTTP/1.1
/// content-type: application/json
///
/// {"id": 1}
/// --> END POST (9-byte body)
/// <-- 200 OK https://example.com/api (12ms)
/// ...
/// <-- END HTTP (2-byte body)
/// ```
pub struct HttpLogger {
    level: Level,
    redact_headers: HashSet<HeaderName>,
    handler: Arc<dyn LogHandler>,
}

impl HttpLogger {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            redact_headers: HashSet::new(),
            handler: Arc::new(TracingLogger),
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut logger = Self::new(config.level);
        logger.redact_headers.extend(config.redact_headers.iter().cloned());
        logger
    }

    pub fn with_handler(mut self, handler: Arc<dyn LogHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn redact_header(mut self, name: HeaderName) -> Self {
        self.redact_headers.insert(name);
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn log_request(&self, request: &RecordedRequest) {
        if self.level == Level::None {
            return;
        }

        let method = &request.method;
        let mut start = format!("--> {} {} {:?}", method, request.url, request.version);
        if !self.level.logs_headers() {
            if let Some(body) = &request.body {
                start.push_str(&format!(" ({}-byte body)", body.len()));
            }
        }
        self.log(&start);

        if !self.level.logs_headers() {
            return;
        }
        self.log_headers(&request.headers);

        let end = format!("--> END {method}");
        match &request.body {
            Some(body) if self.level.logs_body() => {
                if has_unknown_encoding(&request.headers) {
                    self.log(&format!("{end} (encoded body omitted)"));
                } else {
                    self.log_body(&end, &request.headers, body);
                }
            }
            _ => self.log(&end),
        }
    }

    pub fn log_response(&self, response: &RecordedResponse, elapsed: Duration) {
        if self.level == Level::None {
            return;
        }

        let reason = response
            .status
            .canonical_reason()
            .map(|reason| format!(" {reason}"))
            .unwrap_or_default();
        let size = if self.level.logs_headers() {
            String::new()
        } else {
            format!(", {}-byte body", response.body.len())
        };
        self.log(&format!(
            "<-- {}{} {} ({}ms{})",
            response.status.as_u16(),
            reason,
            response.url,
            elapsed.as_millis(),
            size
        ));

        if !self.level.logs_headers() {
            return;
        }
        self.log_headers(&response.headers);

        let end = "<-- END HTTP";
        if !self.level.logs_body() || !response.promises_body() {
            self.log(end);
        } else if has_unknown_encoding(&response.headers) {
            self.log(&format!("{end} (encoded body omitted)"));
        } else {
            self.log_body(end, &response.headers, &response.body);
        }
    }

    pub fn log_failure(&self, error: &dyn Display) {
        if self.level == Level::None {
            return;
        }
        self.handler
            .handle(LogLevel::Error, &format!("<-- HTTP FAILED: {error}"));
    }

    fn log_headers(&self, headers: &HeaderMap) {
        for (name, value) in headers {
            let value = if self.redact_headers.contains(name) {
                Cow::Borrowed(REDACTED)
            } else {
                String::from_utf8_lossy(value.as_bytes())
            };
            self.log(&format!("{name}: {value}"));
        }
    }

    fn log_body(&self, end: &str, headers: &HeaderMap, body: &[u8]) {
        let inflated;
        let (body, gzipped_len) = if is_gzip(headers) {
            match inflate(body) {
                Ok(bytes) => {
                    inflated = bytes;
                    (&inflated[..], Some(body.len()))
                }
                Err(err) => {
                    self.warn(&format!("gzip body could not be inflated: {err}"));
                    self.log(&format!("{end} (binary {}-byte body omitted)", body.len()));
                    return;
                }
            }
        } else {
            (body, None)
        };

        match classify(body) {
            BodyKind::Plaintext => {
                if !body.is_empty() {
                    self.log("");
                    self.log(&String::from_utf8_lossy(body));
                }
                match gzipped_len {
                    Some(gzipped) => self.log(&format!(
                        "{end} ({}-byte, {gzipped}-gzipped-byte body)",
                        body.len()
                    )),
                    None => self.log(&format!("{end} ({}-byte body)", body.len())),
                }
            }
            kind => {
                if kind == BodyKind::TruncatedUtf8 {
                    self.warn("body prefix ends inside a UTF-8 sequence, logging it as binary");
                }
                self.log(&format!("{end} (binary {}-byte body omitted)", body.len()));
            }
        }
    }

    fn log(&self, line: &str) {
        self.handler.handle(LogLevel::Info, line);
    }

    fn warn(&self, line: &str) {
        self.handler.handle(LogLevel::Warning, line);
    }
}

/// Any `Content-Encoding` other than identity or gzip.
fn has_unknown_encoding(headers: &HeaderMap) -> bool {
    headers.get(CONTENT_ENCODING).is_some_and(|value| {
        let encoding = String::from_utf8_lossy(value.as_bytes());
        !encoding.eq_ignore_ascii_case("identity") && !encoding.eq_ignore_ascii_case("gzip")
    })
}

fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"gzip"))
}

fn inflate(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut inflated = Vec::new();
    GzDecoder::new(body).read_to_end(&mut inflated)?;
    Ok(inflated)
}
