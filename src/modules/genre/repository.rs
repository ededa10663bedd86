use super::model::Genre;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence for genre rows.
///
/// Names are not unique at the storage level; callers that need one row per
/// name go through [`GenreStore::find_or_create`].
#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Genre>>;

    /// Exact name match. The oldest row wins when the name is duplicated.
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>>;

    async fn create(&self, name: &str) -> Result<Genre>;

    async fn delete(&self, id: i32) -> Result<()>;

    async fn remove(&self, genre: &Genre) -> Result<()>;

    async fn find_or_create(&self, name: &str) -> Result<Genre> {
        match self.find_by_name(name).await? {
            Some(genre) => Ok(genre),
            None => self.create(name).await,
        }
    }
}

#[derive(Clone)]
pub struct GenreRepository {
    pool: PgPool,
}

impl GenreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreStore for GenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name
            FROM genres
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch genres: {}", e))?;

        Ok(genres)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name
            FROM genres
            WHERE name = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch genre by name: {}", e))?;

        Ok(genre)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name
            FROM genres
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch genre: {}", e))?;

        Ok(genre)
    }

    async fn create(&self, name: &str) -> Result<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            r#"
            INSERT INTO genres (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to create genre: {}", e))?;

        Ok(genre)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete genre: {}", e))?;

        Ok(())
    }

    async fn remove(&self, genre: &Genre) -> Result<()> {
        self.delete(genre.id).await
    }

    async fn find_or_create(&self, name: &str) -> Result<Genre> {
        let mut tx = self.pool.begin().await?;

        // Serializes resolvers of the same name until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to lock genre name: {}", e))?;

        let existing = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE name = $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| anyhow!("Failed to fetch genre by name: {}", e))?;

        let genre = match existing {
            Some(genre) => genre,
            None => sqlx::query_as::<_, Genre>(
                "INSERT INTO genres (name) VALUES ($1) RETURNING id, name",
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to create genre: {}", e))?,
        };

        tx.commit().await?;
        Ok(genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn genre_rows(pool: &PgPool, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM genres WHERE name = $1")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn concurrent_find_or_create_inserts_one_row(pool: PgPool) {
        let repo = GenreRepository::new(pool.clone());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.find_or_create("Noir").await })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(genre_rows(&pool, "Noir").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn find_or_create_reuses_the_oldest_row(pool: PgPool) {
        let repo = GenreRepository::new(pool.clone());
        let first = repo.create("Drama").await.unwrap();
        repo.create("Drama").await.unwrap();

        assert_eq!(repo.find_by_name("Drama").await.unwrap(), Some(first.clone()));
        assert_eq!(repo.find_or_create("Drama").await.unwrap(), first);
        assert_eq!(genre_rows(&pool, "Drama").await, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn find_all_orders_by_name(pool: PgPool) {
        let repo = GenreRepository::new(pool);
        for name in ["Western", "Action", "Comedy"] {
            repo.create(name).await.unwrap();
        }

        let names: Vec<String> = repo.find_all().await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Action", "Comedy", "Western"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn linked_genre_cannot_be_deleted(pool: PgPool) {
        let repo = GenreRepository::new(pool.clone());
        let genre = repo.create("Horror").await.unwrap();
        let movie_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO movies (title, description, release_date) VALUES ('Alien', '', '1979-05-25') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2)")
            .bind(movie_id)
            .bind(genre.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(repo.remove(&genre).await.is_err());
        assert_eq!(repo.find_by_id(genre.id).await.unwrap(), Some(genre.clone()));

        sqlx::query("DELETE FROM movie_genres WHERE genre_id = $1")
            .bind(genre.id)
            .execute(&pool)
            .await
            .unwrap();
        repo.remove(&genre).await.unwrap();
        assert_eq!(repo.find_by_id(genre.id).await.unwrap(), None);
    }
}
