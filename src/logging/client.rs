use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use reqwest::blocking::{Client, Request};
use url::Url;

use super::{HttpLogger, LoggingConfig, RecordedRequest, RecordedResponse};
use crate::utils::LogHandler;

/// A blocking HTTP client that logs every exchange it performs.
pub struct LoggingClient {
    client: Client,
    logger: HttpLogger,
}

impl LoggingClient {
    pub fn new(client: Client, logger: HttpLogger) -> Self {
        Self { client, logger }
    }

    pub fn from_config(config: &LoggingConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::new(client, HttpLogger::from_config(config)))
    }

    /// Send log lines to `handler` instead of the current one.
    pub fn with_handler(self, handler: Arc<dyn LogHandler>) -> Self {
        Self {
            client: self.client,
            logger: self.logger.with_handler(handler),
        }
    }

    pub fn logger(&self) -> &HttpLogger {
        &self.logger
    }

    pub fn get(&self, url: Url) -> anyhow::Result<RecordedResponse> {
        let request = self
            .client
            .get(url)
            .build()
            .context("failed to build GET request")?;
        self.execute(request)
    }

    /// Send `request`, logging it before it leaves and the response once its
    /// body has been read.
    pub fn execute(&self, request: Request) -> anyhow::Result<RecordedResponse> {
        self.logger.log_request(&RecordedRequest::from_blocking(&request));

        let started = Instant::now();
        let response = self.client.execute(request).and_then(RecordedResponse::from_blocking);
        let elapsed = started.elapsed();

        match response {
            Ok(response) => {
                self.logger.log_response(&response, elapsed);
                Ok(response)
            }
            Err(err) => {
                self.logger.log_failure(&err);
                Err(err).context("HTTP request failed")
            }
        }
    }
}
