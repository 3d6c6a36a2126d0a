//! Borrows repository for database operations

use async_trait::async_trait;

use super::{BorrowRepository, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Borrow, BorrowInput, Pagination},
};

#[async_trait]
impl BorrowRepository for PgUnitOfWork {
    async fn add(&mut self, borrow: &BorrowInput) -> AppResult<Borrow> {
        let row = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (book_id, reader_name, borrow_date)
            VALUES ($1, $2, NOW())
            RETURNING *
            "#,
        )
        .bind(borrow.book_id)
        .bind(&borrow.reader_name)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn get_by_id(&mut self, id: i32) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Borrow not found".to_string()))
    }

    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Borrow>> {
        let rows =
            sqlx::query_as::<_, Borrow>("SELECT * FROM borrows ORDER BY id LIMIT $1 OFFSET $2")
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(rows)
    }

    async fn count(&mut self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows")
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn count_for_book(&mut self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(count)
    }

    async fn count_for_author(&mut self, author_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM borrows
            JOIN books ON books.id = borrows.book_id
            WHERE books.author_id = $1
            "#,
        )
        .bind(author_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(count)
    }

    async fn close(&mut self, id: i32) -> AppResult<Option<Borrow>> {
        let row = sqlx::query_as::<_, Borrow>(
            r#"
            UPDATE borrows
            SET return_date = NOW(), updated_at = NOW()
            WHERE id = $1 AND return_date IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }
}
