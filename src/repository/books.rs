//! Books repository for database operations

use async_trait::async_trait;

use super::{BookRepository, CopyCheckout, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, Pagination},
};

#[async_trait]
impl BookRepository for PgUnitOfWork {
    async fn add(&mut self, book: &BookInput) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, description, author_id, available_copies)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.author_id)
        .bind(book.available_copies)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn get_by_id(&mut self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id LIMIT $1 OFFSET $2")
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn count(&mut self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn update(&mut self, id: i32, book: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, description = $3, author_id = $4, available_copies = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.author_id)
        .bind(book.available_copies)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn delete(&mut self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        Ok(())
    }

    async fn take_copy(&mut self, id: i32) -> AppResult<CopyCheckout> {
        // The row lock taken by this UPDATE serializes concurrent checkouts of the same book.
        let remaining: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1, updated_at = NOW()
            WHERE id = $1 AND available_copies >= 1
            RETURNING available_copies
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        if let Some(remaining) = remaining {
            return Ok(CopyCheckout::Taken { remaining });
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(if exists {
            CopyCheckout::Exhausted
        } else {
            CopyCheckout::Missing
        })
    }

    async fn return_copy(&mut self, id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
