pub mod models;
pub mod db;
pub mod services;
pub mod handlers;
pub mod utils;
pub mod constants;
pub mod error;
pub mod identity;
pub mod server;

pub use utils::config::Config;
pub use db::connection::get_db_pool;
pub use error::{ConnectError, ConnectResult};
pub use server::{create_router, AppState};

// Re-export common types
pub use sqlx::PgPool;
pub use anyhow::Result;
pub use uuid::Uuid;
pub use chrono::{DateTime, Utc};
