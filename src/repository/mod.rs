//! Repository layer for database operations
//!
//! Every repository call runs inside a [`UnitOfWork`], one store transaction.
//! Services open a unit of work with [`Store::begin`], do their reads and
//! writes through the per-entity repositories it exposes, and hand it back to
//! [`settle`], which commits on success and rolls back on error. A unit of
//! work dropped without being settled rolls back.

pub mod authors;
pub mod books;
pub mod borrows;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::AppResult,
    models::{Author, AuthorInput, Book, BookInput, Borrow, BorrowInput, Pagination},
};

/// Outcome of trying to take one copy of a book off the shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyCheckout {
    /// One copy was taken; `remaining` are still available
    Taken { remaining: i32 },
    /// The book exists but has no copies left
    Exhausted,
    /// No book with that id
    Missing,
}

#[async_trait]
pub trait AuthorRepository: Send {
    async fn add(&mut self, author: &AuthorInput) -> AppResult<Author>;
    async fn get_by_id(&mut self, id: i32) -> AppResult<Author>;
    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Author>>;
    async fn count(&mut self) -> AppResult<i64>;
    async fn update(&mut self, id: i32, author: &AuthorInput) -> AppResult<Author>;
    async fn delete(&mut self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait BookRepository: Send {
    async fn add(&mut self, book: &BookInput) -> AppResult<Book>;
    async fn get_by_id(&mut self, id: i32) -> AppResult<Book>;
    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Book>>;
    async fn count(&mut self) -> AppResult<i64>;
    async fn update(&mut self, id: i32, book: &BookInput) -> AppResult<Book>;
    async fn delete(&mut self, id: i32) -> AppResult<()>;

    /// Decrement `available_copies` only if at least one copy is left.
    /// Check and decrement happen in a single statement.
    async fn take_copy(&mut self, id: i32) -> AppResult<CopyCheckout>;

    /// Put one copy back on the shelf. Returns false if the book is gone.
    async fn return_copy(&mut self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait BorrowRepository: Send {
    async fn add(&mut self, borrow: &BorrowInput) -> AppResult<Borrow>;
    async fn get_by_id(&mut self, id: i32) -> AppResult<Borrow>;
    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Borrow>>;
    async fn count(&mut self) -> AppResult<i64>;

    /// Borrows, open or closed, that reference the book
    async fn count_for_book(&mut self, book_id: i32) -> AppResult<i64>;

    /// Borrows, open or closed, that reference any book by the author
    async fn count_for_author(&mut self, author_id: i32) -> AppResult<i64>;

    /// Set `return_date` on an open borrow. Returns `None` when the borrow is
    /// missing or was already closed.
    async fn close(&mut self, id: i32) -> AppResult<Option<Borrow>>;
}

/// One transaction against the store
#[async_trait]
pub trait UnitOfWork: Send {
    fn authors(&mut self) -> &mut dyn AuthorRepository;
    fn books(&mut self) -> &mut dyn BookRepository;
    fn borrows(&mut self) -> &mut dyn BorrowRepository;

    async fn commit(self: Box<Self>) -> AppResult<()>;
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Source of units of work
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Round-trip to the store, used by the readiness check
    async fn ping(&self) -> AppResult<()>;
}

/// Commit `uow` if `result` is Ok, roll it back otherwise, and pass the result through.
pub async fn settle<T: Send>(uow: Box<dyn UnitOfWork>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if !err.is_domain() {
                tracing::warn!("Rolling back after failure: {}", err);
            }
            if let Err(rollback_err) = uow.rollback().await {
                tracing::warn!("Rollback failed after {}: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    /// Create a new store with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A PostgreSQL transaction. The per-entity repository impls live in
/// `authors.rs`, `books.rs` and `borrows.rs`.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn authors(&mut self) -> &mut dyn AuthorRepository {
        self
    }

    fn books(&mut self) -> &mut dyn BookRepository {
        self
    }

    fn borrows(&mut self) -> &mut dyn BorrowRepository {
        self
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
