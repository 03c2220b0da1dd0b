use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ListStore;
use crate::{
    error::{AppError, AppResult},
    models::{ContentKey, ContentKind, NewSavedItem, SavedItem},
};

/// `my_list` table in PostgreSQL
#[derive(Clone)]
pub struct PgListStore {
    pool: PgPool,
}

impl PgListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MyListRow {
    user_id: Uuid,
    tmdb_id: i64,
    media_type: String,
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
    release_year: Option<i32>,
    genre_ids: Vec<i32>,
    added_at: DateTime<Utc>,
}

impl TryFrom<MyListRow> for SavedItem {
    type Error = AppError;

    fn try_from(row: MyListRow) -> Result<Self, Self::Error> {
        let kind: ContentKind = row.media_type.parse().map_err(AppError::Internal)?;

        Ok(SavedItem {
            user_id: row.user_id,
            content_id: to_content_id(row.tmdb_id)?,
            kind,
            title: row.title,
            poster_path: row.poster_path,
            backdrop_path: row.backdrop_path,
            rating: row.vote_average,
            release_year: row.release_year,
            genre_ids: row
                .genre_ids
                .into_iter()
                .filter_map(|g| u32::try_from(g).ok())
                .collect(),
            added_at: row.added_at,
        })
    }
}

fn to_content_id(tmdb_id: i64) -> AppResult<u64> {
    u64::try_from(tmdb_id)
        .map_err(|_| AppError::Internal(format!("negative tmdb_id in my_list: {}", tmdb_id)))
}

fn to_tmdb_id(content_id: u64) -> AppResult<i64> {
    i64::try_from(content_id)
        .map_err(|_| AppError::InvalidInput(format!("content id out of range: {}", content_id)))
}

fn to_genre_ids(genre_ids: &[u32]) -> AppResult<Vec<i32>> {
    genre_ids
        .iter()
        .map(|&id| {
            i32::try_from(id)
                .map_err(|_| AppError::InvalidInput(format!("genre id out of range: {}", id)))
        })
        .collect()
}

/// Maps a unique-constraint violation to `AppError::Constraint`
fn map_insert_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Constraint(db_err.message().to_string())
        }
        _ => AppError::Database(err),
    }
}

const ROW_COLUMNS: &str = "user_id, tmdb_id, media_type, title, poster_path, backdrop_path, \
     vote_average, release_year, genre_ids, added_at";

#[async_trait::async_trait]
impl ListStore for PgListStore {
    async fn fetch_keys(&self, user_id: Uuid) -> AppResult<Vec<ContentKey>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT tmdb_id, media_type FROM my_list WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(tmdb_id, media_type)| {
                let kind: ContentKind = media_type.parse().map_err(AppError::Internal)?;
                Ok(ContentKey::new(to_content_id(tmdb_id)?, kind))
            })
            .collect()
    }

    async fn fetch_items(&self, user_id: Uuid) -> AppResult<Vec<SavedItem>> {
        let rows: Vec<MyListRow> = sqlx::query_as(&format!(
            "SELECT {} FROM my_list WHERE user_id = $1 ORDER BY added_at DESC",
            ROW_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SavedItem::try_from).collect()
    }

    async fn insert(&self, user_id: Uuid, item: NewSavedItem) -> AppResult<SavedItem> {
        let genre_ids = to_genre_ids(&item.genre_ids)?;

        let row: MyListRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO my_list
                (user_id, tmdb_id, media_type, title, poster_path, backdrop_path,
                 vote_average, release_year, genre_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ROW_COLUMNS
        ))
        .bind(user_id)
        .bind(to_tmdb_id(item.content_id)?)
        .bind(item.kind.as_str())
        .bind(&item.title)
        .bind(&item.poster_path)
        .bind(&item.backdrop_path)
        .bind(item.rating)
        .bind(item.release_year)
        .bind(&genre_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        tracing::debug!(user_id = %user_id, key = %item.key(), "Inserted my_list row");

        SavedItem::try_from(row)
    }

    async fn delete(&self, user_id: Uuid, key: ContentKey) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM my_list WHERE user_id = $1 AND tmdb_id = $2 AND media_type = $3")
                .bind(user_id)
                .bind(to_tmdb_id(key.content_id)?)
                .bind(key.kind.as_str())
                .execute(&self.pool)
                .await?;

        tracing::debug!(
            user_id = %user_id,
            key = %key,
            rows = result.rows_affected(),
            "Deleted my_list row"
        );

        Ok(())
    }
}
