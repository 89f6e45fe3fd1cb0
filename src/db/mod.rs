//! Database module for SeaORM persistence (SQLite or Postgres)

pub mod apps;
pub mod console_entities;
pub mod cursor;
pub mod entities;

use std::path::PathBuf;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use entities::{app, App, ConsoleEntity};

/// Initialize database connection and create tables
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    // Ensure parent directory exists for file-backed SQLite
    if let Some(path) = sqlite_file_path(database_url) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create database directory {}: {}", parent.display(), e);
            }
        }
    }

    tracing::info!("Connecting to database: {}", redact_url(database_url));

    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    let db = Database::connect(options).await?;

    create_tables(&db).await?;

    Ok(db)
}

/// Create all tables and indexes if they don't exist
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Entities first: apps reference them
    let stmt = schema
        .create_table_from_entity(ConsoleEntity)
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&stmt)).await?;

    let stmt = schema
        .create_table_from_entity(App)
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&stmt)).await?;

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_apps_entity_id")
        .table(App)
        .col(app::Column::EntityId)
        .to_owned();
    db.execute(backend.build(&stmt)).await?;

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_apps_name")
        .table(App)
        .col(app::Column::Name)
        .to_owned();
    db.execute(backend.build(&stmt)).await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

/// File path behind a `sqlite:` URL, if it names a file
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Strip credentials from a connection URL before logging it
fn redact_url(database_url: &str) -> String {
    match (database_url.find("://"), database_url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &database_url[..scheme_end], &database_url[at..])
        }
        _ => database_url.to_string(),
    }
}

/// Helpers shared by the database tests in this crate
#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::DatabaseConnection;
    use tempfile::TempDir;

    /// Fresh SQLite database in a temp dir. Keep the `TempDir` alive for the test.
    pub async fn temp_database() -> (TempDir, DatabaseConnection) {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", temp_dir.path().join("test.db").display());
        let db = super::init_database(&url).await.unwrap();
        (temp_dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:/tmp/console/console.db?mode=rwc"),
            Some(PathBuf::from("/tmp/console/console.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:///var/lib/console.db"),
            Some(PathBuf::from("/var/lib/console.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/console"), None);
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://user:secret@db:5432/console"),
            "postgres://***@db:5432/console"
        );
        assert_eq!(redact_url("sqlite:/tmp/x.db"), "sqlite:/tmp/x.db");
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() {
        let (_dir, db) = test_support::temp_database().await;
        create_tables(&db).await.unwrap();
        create_tables(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_init_creates_missing_parent_dirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("console.db");
        let url = format!("sqlite:{}?mode=rwc", path.display());
        init_database(&url).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_init_reports_unusable_parent_as_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let url = format!("sqlite:{}?mode=rwc", blocker.join("console.db").display());
        assert!(init_database(&url).await.is_err());
    }
}
