use crate::config::AppConfig;
use crate::db;
use crate::users::repo::{SqliteUserStore, UserStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Opens the database and ensures the schema. Any failure here aborts
    /// startup.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config).await?;
        let users = SqliteUserStore::new(db);
        users
            .ensure_schema()
            .await
            .context("ensure users schema")?;

        Ok(Self::from_parts(
            Arc::new(config),
            Arc::new(users) as Arc<dyn UserStore>,
        ))
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> Self {
        Self { config, users }
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let db = db::connect_in_memory().await.expect("in-memory pool");
        let users = SqliteUserStore::new(db);
        users.ensure_schema().await.expect("schema");
        Self::from_parts(Arc::new(AppConfig::default()), Arc::new(users))
    }
}
