pub mod log;
pub mod naming;

pub use log::{ConsoleLogger, LogHandler, LogLevel, MemoryLogger, TracingLogger};
pub use naming::{convert, to_camel_case, to_kebab_case, to_pascal_case, to_snake_case, NameStyle};
