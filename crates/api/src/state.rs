use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (pool is internally reference-counted, config is `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ucarx_db::DbPool,
    /// Server configuration, built once at startup.
    pub config: Arc<ServerConfig>,
}
