pub mod config;
pub mod logging;

pub use config::{Config, FeedConfig, SentFilter, StoreKind};
pub use logging::init_logging;
