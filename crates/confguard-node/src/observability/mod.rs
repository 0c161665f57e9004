//! Observability for the node: structured logging.

mod logging;

pub use logging::{default_filter, init_logging, LogFormat};
