use std::sync::Arc;

use lexforge_pipeline::DocumentPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lexforge_db::DbPool,
    /// Server configuration (read by middleware and extractors).
    pub config: Arc<ServerConfig>,
    /// The document lifecycle manager.
    pub pipeline: Arc<DocumentPipeline>,
}
