use super::dto::MovieSearch;
use super::model::{Movie, MovieGenreLink, MovieRow, NewMovie};
use crate::modules::genre::model::Genre;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;

/// Persistence for movies and their `movie_genres` links.
///
/// Every `Movie` handed out carries its genres, loaded with an explicit join.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// One page ordered by id, plus the total number of movies.
    async fn find_and_count(&self, skip: i64, take: i64) -> Result<(Vec<Movie>, u64)>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>>;

    /// Inserts the row and links it to `movie.genres`, which must already exist.
    async fn create(&self, movie: NewMovie) -> Result<Movie>;

    /// Upserts the row by id and replaces its association set.
    async fn save(&self, movie: &Movie) -> Result<Movie>;

    /// Deletes the row. Its links are removed by the foreign-key cascade.
    async fn remove(&self, movie: &Movie) -> Result<()>;

    async fn query_by_search(&self, criteria: &MovieSearch) -> Result<Vec<Movie>>;

    /// Drops every link to `genre`. Returns the number of links removed.
    async fn unlink_genre_from_all_movies(&self, genre: &Genre) -> Result<u64>;
}

#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

/// Builds a `LIKE` pattern matching `value` as a literal substring.
pub fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

async fn link_genres(tx: &mut Transaction<'_, Postgres>, movie_id: i32, genres: &[Genre]) -> Result<()> {
    let genre_ids: Vec<i32> = genres.iter().map(|g| g.id).collect();
    if genre_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO movie_genres (movie_id, genre_id)
        SELECT $1, unnest($2::int4[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(movie_id)
    .bind(&genre_ids)
    .execute(&mut **tx)
    .await
    .map_err(|e| anyhow!("Failed to link movie genres: {}", e))?;

    Ok(())
}

impl MovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_genres(&self, rows: Vec<MovieRow>) -> Result<Vec<Movie>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let links = sqlx::query_as::<_, MovieGenreLink>(
            r#"
            SELECT mg.movie_id, g.id AS genre_id, g.name AS genre_name
            FROM movie_genres mg
            JOIN genres g ON g.id = mg.genre_id
            WHERE mg.movie_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch movie genres: {}", e))?;

        let mut by_movie: HashMap<i32, Vec<Genre>> = HashMap::new();
        for link in links {
            by_movie.entry(link.movie_id).or_default().push(Genre {
                id: link.genre_id,
                name: link.genre_name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genres = by_movie.remove(&row.id).unwrap_or_default();
                row.into_movie(genres)
            })
            .collect())
    }
}

#[async_trait]
impl MovieStore for MovieRepository {
    async fn find_and_count(&self, skip: i64, take: i64) -> Result<(Vec<Movie>, u64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to count movies: {}", e))?;

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, description, release_date
            FROM movies
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(take)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch movies: {}", e))?;

        let movies = self.load_genres(rows).await?;
        Ok((movies, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(
            "SELECT id, title, description, release_date FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch movie: {}", e))?;

        match row {
            Some(row) => Ok(self.load_genres(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, movie: NewMovie) -> Result<Movie> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (title, description, release_date)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, release_date
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.release_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to create movie: {}", e))?;

        link_genres(&mut tx, row.id, &movie.genres).await?;

        tx.commit().await?;
        Ok(row.into_movie(movie.genres))
    }

    async fn save(&self, movie: &Movie) -> Result<Movie> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (id, title, description, release_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                release_date = EXCLUDED.release_date
            RETURNING id, title, description, release_date
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.release_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to save movie: {}", e))?;

        sqlx::query("DELETE FROM movie_genres WHERE movie_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to clear movie genres: {}", e))?;

        link_genres(&mut tx, row.id, &movie.genres).await?;

        tx.commit().await?;
        Ok(row.into_movie(movie.genres.clone()))
    }

    async fn remove(&self, movie: &Movie) -> Result<()> {
        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(movie.id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete movie: {}", e))?;

        Ok(())
    }

    async fn query_by_search(&self, criteria: &MovieSearch) -> Result<Vec<Movie>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT DISTINCT m.id, m.title, m.description, m.release_date
            FROM movies m
            LEFT JOIN movie_genres mg ON mg.movie_id = m.id
            LEFT JOIN genres g ON g.id = mg.genre_id
            WHERE TRUE
            "#,
        );

        if let Some(genre) = criteria.genre.as_deref() {
            query.push(" AND g.name LIKE ").push_bind(like_pattern(genre));
        }

        if let Some(title) = criteria.title.as_deref() {
            query.push(" AND m.title LIKE ").push_bind(like_pattern(title));
        }

        query.push(" ORDER BY m.id ASC");

        let rows = query
            .build_query_as::<MovieRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to search movies: {}", e))?;

        self.load_genres(rows).await
    }

    async fn unlink_genre_from_all_movies(&self, genre: &Genre) -> Result<u64> {
        let result = sqlx::query("DELETE FROM movie_genres WHERE genre_id = $1")
            .bind(genre.id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to unlink genre from movies: {}", e))?;

        Ok(result.rows_affected())
    }
}
