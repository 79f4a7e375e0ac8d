//! Database repository for users and blogs.
//!
//! Listing queries are assembled with [`QueryBuilder`] from a typed [`BlogQuery`].

use chrono::{SecondsFormat, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::errors::AppError;
use crate::models::{AuthorSummary, Blog, BlogDraft, NewUser, User};
use crate::query::{fold_case, BlogQuery};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, bio, profile_pic_url, created_at, updated_at";

const BLOG_SELECT: &str = r#"SELECT b.id, b.title, b.sub_title, b.content, b.slug, b.tags,
       b.created_date, b.modified_date, b.author_id,
       u.first_name, u.last_name, u.bio, u.profile_pic_url
FROM blogs b LEFT JOIN users u ON u.id = b.author_id"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user and their password hash by email, for credential checks.
    pub async fn get_user_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, Option<String>)>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {}, password_hash FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| (user_from_row(&row), row.get("password_hash"))))
    }

    /// Create a new user. `password_hash` is stored but never returned.
    pub async fn create_user(
        &self,
        user: &NewUser,
        password_hash: Option<String>,
    ) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();

        let result = sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, bio, profile_pic_url, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(&user.profile_pic_url)
        .bind(&password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AppError::BadRequest(
                    "User with this email already exists".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %id, "user created");

        Ok(User {
            id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            profile_pic_url: user.profile_pic_url.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Replace a user's password hash.
    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(timestamp())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn user_exists(&self, id: &str) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    // ==================== BLOG OPERATIONS ====================

    /// List one page of blogs matching the query, newest first, plus the total match count.
    pub async fn list_blogs(&self, query: &BlogQuery) -> Result<(Vec<Blog>, u64), AppError> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM blogs b");
        query.filter.push_where(&mut count_qb);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_qb = QueryBuilder::<Sqlite>::new(BLOG_SELECT);
        query.filter.push_where(&mut page_qb);
        page_qb.push(" ORDER BY b.created_date DESC, b.rowid DESC LIMIT ");
        page_qb.push_bind(i64::from(query.limit));
        page_qb.push(" OFFSET ");
        page_qb.push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));

        let rows = page_qb.build().fetch_all(&self.pool).await?;

        tracing::debug!(
            page = query.page,
            limit = query.limit,
            tags = ?query.filter.tags,
            search = ?query.filter.search,
            total,
            returned = rows.len(),
            "listed blogs"
        );

        Ok((
            rows.iter().map(blog_from_row).collect(),
            u64::try_from(total).unwrap_or(0),
        ))
    }

    /// Get a blog by ID with its author populated.
    pub async fn get_blog(&self, id: &str) -> Result<Option<Blog>, AppError> {
        let row = sqlx::query(&format!("{} WHERE b.id = ?", BLOG_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(blog_from_row))
    }

    /// Create a new blog. The slug is derived from the title when not given.
    pub async fn create_blog(&self, draft: &BlogDraft) -> Result<Blog, AppError> {
        if !self.user_exists(&draft.author_id).await? {
            return Err(AppError::NotFound("Author not found".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();
        let slug = draft.slug_for_create()?;
        let tags_json = serde_json::to_string(&draft.tags)?;

        let result = sqlx::query(
            "INSERT INTO blogs (id, title, sub_title, content, slug, tags, author_id, created_date, modified_date, title_folded, sub_title_folded, content_folded) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&draft.title)
        .bind(&draft.sub_title)
        .bind(&draft.content)
        .bind(&slug)
        .bind(&tags_json)
        .bind(&draft.author_id)
        .bind(&now)
        .bind(&now)
        .bind(fold_case(&draft.title))
        .bind(fold_case(&draft.sub_title))
        .bind(fold_case(&draft.content))
        .execute(&self.pool)
        .await;
        map_slug_conflict(result)?;

        tracing::info!(blog_id = %id, slug = %slug, "blog created");

        self.get_blog(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Blog {} vanished after insert", id)))
    }

    /// Replace a blog's content. The stored slug is kept when the draft has none.
    pub async fn update_blog(&self, id: &str, draft: &BlogDraft) -> Result<Blog, AppError> {
        let existing = self
            .get_blog(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        if !self.user_exists(&draft.author_id).await? {
            return Err(AppError::NotFound("Author not found".to_string()));
        }

        let slug = draft.slug.clone().unwrap_or(existing.slug);
        let tags_json = serde_json::to_string(&draft.tags)?;

        let result = sqlx::query(
            "UPDATE blogs SET title = ?, sub_title = ?, content = ?, slug = ?, tags = ?, author_id = ?, modified_date = ?, title_folded = ?, sub_title_folded = ?, content_folded = ? WHERE id = ?"
        )
        .bind(&draft.title)
        .bind(&draft.sub_title)
        .bind(&draft.content)
        .bind(&slug)
        .bind(&tags_json)
        .bind(&draft.author_id)
        .bind(timestamp())
        .bind(fold_case(&draft.title))
        .bind(fold_case(&draft.sub_title))
        .bind(fold_case(&draft.content))
        .bind(id)
        .execute(&self.pool)
        .await;
        map_slug_conflict(result)?;

        self.get_blog(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))
    }

    /// Delete a blog.
    pub async fn delete_blog(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog not found".to_string()));
        }

        tracing::info!(blog_id = %id, "blog deleted");
        Ok(())
    }
}

/// RFC 3339 UTC with fixed precision, so text ordering matches time ordering.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_slug_conflict(
    result: Result<sqlx::sqlite::SqliteQueryResult, sqlx::Error>,
) -> Result<(), AppError> {
    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::BadRequest(
            "Blog with this slug already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        bio: row.get("bio"),
        profile_pic_url: row.get("profile_pic_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn blog_from_row(row: &sqlx::sqlite::SqliteRow) -> Blog {
    let tags_str: String = row.get("tags");
    let first_name: Option<String> = row.get("first_name");

    let author = first_name.map(|first_name| AuthorSummary {
        id: row.get("author_id"),
        first_name,
        last_name: row.get::<Option<String>, _>("last_name").unwrap_or_default(),
        bio: row.get::<Option<String>, _>("bio").unwrap_or_default(),
        profile_pic_url: row
            .get::<Option<String>, _>("profile_pic_url")
            .unwrap_or_default(),
    });

    Blog {
        id: row.get("id"),
        title: row.get("title"),
        sub_title: row.get("sub_title"),
        content: row.get("content"),
        slug: row.get("slug"),
        tags: parse_json_array(&tags_str),
        author,
        created_date: row.get("created_date"),
        modified_date: row.get("modified_date"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
