//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostRepository, UserRepository};
use quill_infra::database::{
    DatabaseConfig, PostgresPostRepository, PostgresUserRepository, connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Connect to the database and build the repositories.
    ///
    /// The connection is established here, once, and injected into the
    /// repositories; a failure aborts startup.
    pub async fn new(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let db = connect(config).await?;

        let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
        let posts: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(db));

        tracing::info!("Application state initialized");

        Ok(Self { users, posts })
    }
}
