//! Authors repository for database operations

use async_trait::async_trait;

use super::{AuthorRepository, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorInput, Pagination},
};

#[async_trait]
impl AuthorRepository for PgUnitOfWork {
    async fn add(&mut self, author: &AuthorInput) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, surname, date_of_birth)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&author.name)
        .bind(&author.surname)
        .bind(author.date_of_birth)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn get_by_id(&mut self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn count(&mut self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn update(&mut self, id: i32, author: &AuthorInput) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET name = $2, surname = $3, date_of_birth = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&author.name)
        .bind(&author.surname)
        .bind(author.date_of_birth)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn delete(&mut self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        Ok(())
    }
}
