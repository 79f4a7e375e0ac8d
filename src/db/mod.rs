//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for users and blogs.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            bio TEXT NOT NULL DEFAULT '',
            profile_pic_url TEXT NOT NULL DEFAULT '',
            password_hash TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // tags holds a JSON array of lowercase strings; *_folded hold
    // query::fold_case() of their source column for search
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blogs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            sub_title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            tags TEXT NOT NULL DEFAULT '[]',
            author_id TEXT NOT NULL REFERENCES users(id),
            created_date TEXT NOT NULL,
            modified_date TEXT NOT NULL,
            title_folded TEXT NOT NULL DEFAULT '',
            sub_title_folded TEXT NOT NULL DEFAULT '',
            content_folded TEXT NOT NULL DEFAULT ''
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_blogs_created_date ON blogs(created_date);
        CREATE INDEX IF NOT EXISTS idx_blogs_author_id ON blogs(author_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
