use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use super::models::FavoriteRecord;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Clone)]
pub struct FavoriteRepository {
    pool: SqlitePool,
}

impl FavoriteRepository {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Inserts `record`, replacing every field of an existing row with the same id.
    pub async fn put(&self, record: &FavoriteRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO favorite_movies (
              id, title, poster_path, release_date, vote_average, overview,
              runtime, backdrop_path, tagline, genres, spoken_languages
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
              title = excluded.title,
              poster_path = excluded.poster_path,
              release_date = excluded.release_date,
              vote_average = excluded.vote_average,
              overview = excluded.overview,
              runtime = excluded.runtime,
              backdrop_path = excluded.backdrop_path,
              tagline = excluded.tagline,
              genres = excluded.genres,
              spoken_languages = excluded.spoken_languages
            "#,
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.poster_path)
        .bind(&record.release_date)
        .bind(record.vote_average)
        .bind(&record.overview)
        .bind(record.runtime)
        .bind(&record.backdrop_path)
        .bind(&record.tagline)
        .bind(&record.genres)
        .bind(&record.spoken_languages)
        .execute(&self.pool)
        .await?;
        tracing::debug!(movie_id = record.id, "favorite stored");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<FavoriteRecord>, StorageError> {
        let rows = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            SELECT id, title, poster_path, release_date, vote_average, overview,
                   runtime, backdrop_path, tagline, genres, spoken_languages
            FROM favorite_movies
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<FavoriteRecord>, StorageError> {
        let row = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            SELECT id, title, poster_path, release_date, vote_average, overview,
                   runtime, backdrop_path, tagline, genres, spoken_languages
            FROM favorite_movies
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn contains(&self, id: i64) -> Result<bool, StorageError> {
        let exists: i64 =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS (SELECT 1 FROM favorite_movies WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists == 1)
    }

    /// Returns the number of rows removed; an unknown id removes nothing.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, StorageError> {
        let affected = sqlx::query("DELETE FROM favorite_movies WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::debug!(movie_id = id, affected, "favorite delete");
        Ok(affected)
    }
}
