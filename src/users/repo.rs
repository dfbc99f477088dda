use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::users::repo_types::{User, UserRow};

#[derive(Debug, Error)]
pub enum StoreError {
    /// `id` or `email` already taken. Both constraints surface here.
    #[error("duplicate key: {0}")]
    Duplicate(#[source] sqlx::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    fn from_insert(err: sqlx::Error) -> Self {
        let duplicate = matches!(
            &err,
            sqlx::Error::Database(db)
                if db.is_unique_violation() || db.message().contains("UNIQUE constraint failed")
        );
        if duplicate {
            StoreError::Duplicate(err)
        } else {
            StoreError::Database(err)
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the `users` table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), StoreError>;
    /// Inserts a fully populated user in one statement.
    async fn create(&self, user: &User) -> Result<(), StoreError>;
    /// Every stored user, read fresh on each call.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteUserStore {
    db: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                points INTEGER DEFAULT 0,
                level INTEGER DEFAULT 1,
                missionsCompleted INTEGER DEFAULT 0,
                ecoActions INTEGER DEFAULT 0
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;
        debug!("users schema ensured");
        Ok(())
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.db.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, points, level, missionsCompleted, ecoActions)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.points)
        .bind(user.level)
        .bind(user.missions_completed)
        .bind(user.eco_actions)
        .execute(&mut *conn)
        .await
        .map_err(StoreError::from_insert)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password, points, level, missionsCompleted, ecoActions
            FROM users
            ORDER BY rowid
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, db};
    use tempfile::tempdir;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            name: "Ann".into(),
            email: email.into(),
            password: "p".into(),
            points: 0,
            level: 1,
            missions_completed: 0,
            eco_actions: 0,
        }
    }

    async fn memory_store() -> SqliteUserStore {
        let pool = db::connect_in_memory().await.expect("in-memory pool");
        let store = SqliteUserStore::new(pool);
        store.ensure_schema().await.expect("schema");
        store
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let store = memory_store().await;
        store.ensure_schema().await.expect("second ensure_schema");
        assert!(store.list_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn create_then_list_in_insertion_order() {
        let store = memory_store().await;
        store.create(&user("u2", "b@x.com")).await.expect("create u2");
        store.create(&user("u1", "a@x.com")).await.expect("create u1");

        let ids: Vec<String> = store
            .list_all()
            .await
            .expect("list")
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["u2", "u1"]);
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_as_duplicate() {
        let store = memory_store().await;
        store.create(&user("u1", "a@x.com")).await.expect("first");
        let err = store.create(&user("u2", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)), "got {err:?}");
        assert_eq!(store.list_all().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_reported_as_duplicate() {
        let store = memory_store().await;
        store.create(&user("u1", "a@x.com")).await.expect("first");
        let err = store.create(&user("u1", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn null_counters_read_back_as_defaults() {
        let store = memory_store().await;
        sqlx::query(
            "INSERT INTO users (id, name, email, password, points, level, missionsCompleted, ecoActions) \
             VALUES ('legacy', 'Old', 'old@x.com', 'p', NULL, NULL, NULL, NULL)",
        )
        .execute(&store.db)
        .await
        .expect("raw insert");

        let users = store.list_all().await.expect("list");
        let expected = User {
            name: "Old".into(),
            ..user("legacy", "old@x.com")
        };
        assert_eq!(users, vec![expected]);
    }

    #[tokio::test]
    async fn closed_pool_is_a_storage_error() {
        let store = memory_store().await;
        store.db.close().await;
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn records_survive_reopening_the_file() {
        let dir = tempdir().expect("tempdir");
        let config = AppConfig {
            database_path: dir.path().join("users.db"),
            ..AppConfig::default()
        };

        {
            let store = SqliteUserStore::new(db::connect(&config).await.expect("open"));
            store.ensure_schema().await.expect("schema");
            store.create(&user("u1", "a@x.com")).await.expect("create");
            store.db.close().await;
        }

        let store = SqliteUserStore::new(db::connect(&config).await.expect("reopen"));
        store.ensure_schema().await.expect("schema again");
        let users = store.list_all().await.expect("list");
        store.db.close().await;

        assert_eq!(users, vec![user("u1", "a@x.com")]);
    }
}
