//! Book service

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, Pagination},
    repository::{settle, Store, UnitOfWork},
};

use super::validation::{book_validator, ComposedValidator};

#[async_trait]
pub trait BookService: Send + Sync {
    async fn create(&self, input: BookInput) -> AppResult<Book>;
    async fn get(&self, id: i32) -> AppResult<Book>;
    /// One page of books and the total number of books
    async fn get_list(&self, page: &Pagination) -> AppResult<(Vec<Book>, i64)>;
    async fn update(&self, id: i32, input: BookInput) -> AppResult<Book>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct BooksService {
    store: Arc<dyn Store>,
    validator: ComposedValidator<BookInput>,
}

impl BooksService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            validator: book_validator(),
        }
    }
}

/// The referenced author must exist; NotFound otherwise
async fn check_author(uow: &mut dyn UnitOfWork, input: &BookInput) -> AppResult<()> {
    uow.authors().get_by_id(input.author_id).await.map(|_| ())
}

/// Borrow records, open or closed, keep their book alive
async fn remove(uow: &mut dyn UnitOfWork, id: i32) -> AppResult<()> {
    if uow.borrows().count_for_book(id).await? > 0 {
        return Err(AppError::Validation(
            "Book has borrow records and cannot be deleted".to_string(),
        ));
    }
    uow.books().delete(id).await
}

#[async_trait]
impl BookService for BooksService {
    async fn create(&self, input: BookInput) -> AppResult<Book> {
        self.validator.validate(&input)?;

        let mut uow = self.store.begin().await?;
        let result = match check_author(uow.as_mut(), &input).await {
            Ok(()) => uow.books().add(&input).await,
            Err(e) => Err(e),
        };
        let book = settle(uow, result).await?;

        tracing::info!(
            "Created book {} \"{}\" with {} copies",
            book.id,
            book.title,
            book.available_copies
        );
        Ok(book)
    }

    async fn get(&self, id: i32) -> AppResult<Book> {
        let mut uow = self.store.begin().await?;
        let result = uow.books().get_by_id(id).await;
        settle(uow, result).await
    }

    async fn get_list(&self, page: &Pagination) -> AppResult<(Vec<Book>, i64)> {
        let mut uow = self.store.begin().await?;
        let result = match uow.books().get_all(page).await {
            Ok(rows) => uow.books().count().await.map(|total| (rows, total)),
            Err(e) => Err(e),
        };
        settle(uow, result).await
    }

    async fn update(&self, id: i32, input: BookInput) -> AppResult<Book> {
        self.validator.validate(&input)?;

        let mut uow = self.store.begin().await?;
        let result = match check_author(uow.as_mut(), &input).await {
            Ok(()) => uow.books().update(id, &input).await,
            Err(e) => Err(e),
        };
        settle(uow, result).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        let result = remove(uow.as_mut(), id).await;
        settle(uow, result).await?;

        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
