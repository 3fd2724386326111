pub mod body;
pub mod error;
pub mod http_url;
pub mod logging;
pub mod utils;

pub use body::{classify, is_plaintext, BodyKind};
pub use error::{ConfigError, UrlError};
pub use http_url::{HttpUrlBuilder, QueryParameters};
pub use logging::{HttpLogger, Level, LoggingClient, LoggingConfig};
