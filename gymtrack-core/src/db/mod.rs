//! Device-local key/value store for the session (token, user, launch marker).

pub mod models;
pub mod operations;
pub mod schema;

use anyhow::{Result, anyhow};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};
use std::path::Path;

use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const FIRST_LAUNCH_KEY: &str = "first_launch_done";

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = 5000;",
        )
        .map_err(r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct LocalStore {
    pool: DbPool,
}

impl LocalStore {
    /// Opens (creating if needed) the store at `path` and applies pending
    /// migrations.
    pub fn open(path: &Path) -> Result<Self> {
        let url = path.to_string_lossy().to_string();
        let manager = ConnectionManager::<SqliteConnection>::new(url);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(|e| anyhow!("failed to open local store {}: {}", path.display(), e))?;

        let mut conn = pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("failed to migrate local store: {}", e))?;
        for migration in applied {
            info!("Applied local store migration {}", migration);
        }

        debug!("Local store ready at {}", path.display());
        Ok(Self { pool })
    }

    /// Runs a diesel closure on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await?
    }

    pub async fn get(&self, key: &'static str) -> Result<Option<String>> {
        self.with_conn(move |conn| operations::get_value(conn, key)).await
    }

    pub async fn token(&self) -> Result<Option<String>> {
        self.get(TOKEN_KEY).await
    }

    /// The cached account. A value that no longer decodes is treated as
    /// absent rather than as an error.
    pub async fn user(&self) -> Result<Option<User>> {
        let raw = self.get(USER_KEY).await?;
        Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("Discarding unreadable cached user: {}", e);
                None
            }
        }))
    }

    /// Writes token and user together so a crash never leaves only one.
    pub async fn save_credentials(&self, token: &str, user: &User) -> Result<()> {
        let token = token.to_string();
        let user = serde_json::to_string(user)?;
        self.with_conn(move |conn| {
            operations::put_values(conn, &[(TOKEN_KEY, token.as_str()), (USER_KEY, user.as_str())])?;
            Ok(())
        })
        .await
    }

    pub async fn clear_credentials(&self) -> Result<()> {
        self.with_conn(|conn| {
            operations::delete_values(conn, &[TOKEN_KEY, USER_KEY])?;
            Ok(())
        })
        .await
    }

    pub async fn is_first_launch(&self) -> Result<bool> {
        Ok(self.get(FIRST_LAUNCH_KEY).await?.is_none())
    }

    pub async fn mark_launched(&self) -> Result<()> {
        self.with_conn(|conn| {
            operations::put_value(conn, FIRST_LAUNCH_KEY, "1")?;
            Ok(())
        })
        .await
    }

    /// Forgets everything, including the first-launch marker.
    pub async fn reset(&self) -> Result<()> {
        self.with_conn(|conn| {
            operations::delete_all(conn)?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn user() -> User {
        User {
            email: "ana@example.com".into(),
            name: "Ana".into(),
            last_name: "Ruiz".into(),
            phone: None,
            role: Role::Premium,
            is_verified: true,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn credentials_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(&dir.path().join("store.sqlite3")).unwrap();

        assert_eq!(store.token().await.unwrap(), None);
        store.save_credentials("tok-1", &user()).await.unwrap();
        store.save_credentials("tok-2", &user()).await.unwrap();
        assert_eq!(store.token().await.unwrap().as_deref(), Some("tok-2"));
        assert_eq!(store.user().await.unwrap(), Some(user()));

        store.clear_credentials().await.unwrap();
        assert_eq!(store.token().await.unwrap(), None);
        assert_eq!(store.user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn first_launch_marker_survives_logout_but_not_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite3");
        let store = LocalStore::open(&path).unwrap();

        assert!(store.is_first_launch().await.unwrap());
        store.mark_launched().await.unwrap();
        store.clear_credentials().await.unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert!(!reopened.is_first_launch().await.unwrap());

        reopened.reset().await.unwrap();
        assert!(reopened.is_first_launch().await.unwrap());
    }
}
