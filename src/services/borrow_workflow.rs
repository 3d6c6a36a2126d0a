//! Borrow / return workflow
//!
//! Keeps `books.available_copies` consistent with the set of open borrows.
//! Checking out a copy and recording the borrow happen in one unit of work,
//! as do closing a borrow and putting the copy back; a failure at any step
//! rolls back both.
//!
//! ```text
//!   create_borrow ──> OPEN ──complete_return──> CLOSED
//! ```

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Borrow, BorrowInput},
    repository::{settle, CopyCheckout, Store, UnitOfWork},
};

use super::validation::{borrow_validator, ComposedValidator};

pub struct BorrowWorkflow {
    store: Arc<dyn Store>,
    validator: ComposedValidator<BorrowInput>,
}

impl BorrowWorkflow {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            validator: borrow_validator(),
        }
    }

    /// Take one copy of the book off the shelf and open a borrow for it.
    pub async fn create_borrow(&self, input: BorrowInput) -> AppResult<Borrow> {
        self.validator.validate(&input)?;

        let mut uow = self.store.begin().await?;
        let result = checkout(uow.as_mut(), &input).await;
        let borrow = settle(uow, result).await?;

        tracing::info!(
            "Borrow {} opened: book {} lent to {}",
            borrow.id,
            borrow.book_id,
            borrow.reader_name
        );
        Ok(borrow)
    }

    /// Close an open borrow and put its copy back on the shelf.
    pub async fn complete_return(&self, borrow_id: i32) -> AppResult<Borrow> {
        let mut uow = self.store.begin().await?;
        let result = close(uow.as_mut(), borrow_id).await;
        let borrow = settle(uow, result).await?;

        tracing::info!("Borrow {} closed: book {} returned", borrow.id, borrow.book_id);
        Ok(borrow)
    }
}

async fn checkout(uow: &mut dyn UnitOfWork, input: &BorrowInput) -> AppResult<Borrow> {
    match uow.books().take_copy(input.book_id).await? {
        CopyCheckout::Taken { remaining } => {
            tracing::debug!("Book {}: {} copies left", input.book_id, remaining);
        }
        CopyCheckout::Exhausted => {
            tracing::debug!("Book {} has no copies left", input.book_id);
            return Err(AppError::Unavailable("book is not available now".to_string()));
        }
        CopyCheckout::Missing => {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
    }

    uow.borrows().add(input).await
}

async fn close(uow: &mut dyn UnitOfWork, borrow_id: i32) -> AppResult<Borrow> {
    let borrow = uow.borrows().get_by_id(borrow_id).await?;
    if borrow.return_date.is_some() {
        return Err(already_returned(borrow_id));
    }

    // Conditional on return_date IS NULL: a concurrent return that got here first wins.
    let closed = uow
        .borrows()
        .close(borrow_id)
        .await?
        .ok_or_else(|| already_returned(borrow_id))?;

    if !uow.books().return_copy(closed.book_id).await? {
        return Err(AppError::NotFound("Book not found".to_string()));
    }

    Ok(closed)
}

fn already_returned(borrow_id: i32) -> AppError {
    tracing::debug!("Borrow {} was already returned", borrow_id);
    AppError::AlreadyReturned("Borrow has already been returned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AuthorInput, Book, BookInput, BorrowState},
        repository::memory::MemoryStore,
    };
    use chrono::NaiveDate;

    async fn seed_book(store: &MemoryStore, copies: i32) -> Book {
        let mut uow = store.begin().await.unwrap();
        let author = uow
            .authors()
            .add(&AuthorInput {
                name: "Jane".to_string(),
                surname: "Doe".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            })
            .await
            .unwrap();
        let book = uow
            .books()
            .add(&BookInput {
                title: "X".to_string(),
                description: "A book".to_string(),
                author_id: author.id,
                available_copies: copies,
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
        book
    }

    async fn copies_of(store: &MemoryStore, book_id: i32) -> i32 {
        let mut uow = store.begin().await.unwrap();
        uow.books().get_by_id(book_id).await.unwrap().available_copies
    }

    async fn borrow_count(store: &MemoryStore) -> i64 {
        let mut uow = store.begin().await.unwrap();
        uow.borrows().count().await.unwrap()
    }

    fn request(book_id: i32, reader: &str) -> BorrowInput {
        BorrowInput {
            book_id,
            reader_name: reader.to_string(),
        }
    }

    fn workflow(store: &MemoryStore) -> BorrowWorkflow {
        BorrowWorkflow::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn borrowing_takes_one_copy() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 3).await;

        let borrow = workflow(&store)
            .create_borrow(request(book.id, "Bob"))
            .await
            .unwrap();

        assert_eq!(borrow.book_id, book.id);
        assert_eq!(borrow.reader_name, "Bob");
        assert_eq!(borrow.state(), BorrowState::Open);
        assert_eq!(copies_of(&store, book.id).await, 2);
    }

    #[tokio::test]
    async fn borrowing_without_copies_changes_nothing() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 0).await;

        let err = workflow(&store)
            .create_borrow(request(book.id, "Bob"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unavailable(_)));
        assert_eq!(copies_of(&store, book.id).await, 0);
        assert_eq!(borrow_count(&store).await, 0);
    }

    #[tokio::test]
    async fn borrowing_unknown_book_is_not_found() {
        let store = MemoryStore::new();

        let err = workflow(&store)
            .create_borrow(request(404, "Bob"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(borrow_count(&store).await, 0);
    }

    #[tokio::test]
    async fn long_reader_name_is_rejected_before_touching_stock() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;

        let err = workflow(&store)
            .create_borrow(request(book.id, &"r".repeat(256)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(copies_of(&store, book.id).await, 1);
    }

    #[tokio::test]
    async fn failed_borrow_insert_restores_the_copy() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;
        store.fail_next_borrow_insert();

        let err = workflow(&store)
            .create_borrow(request(book.id, "Bob"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(copies_of(&store, book.id).await, 1);
        assert_eq!(borrow_count(&store).await, 0);
    }

    #[tokio::test]
    async fn returning_puts_the_copy_back() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;
        let workflow = workflow(&store);
        let borrow = workflow.create_borrow(request(book.id, "Bob")).await.unwrap();
        assert_eq!(copies_of(&store, book.id).await, 0);

        let closed = workflow.complete_return(borrow.id).await.unwrap();

        assert_eq!(closed.id, borrow.id);
        assert_eq!(closed.state(), BorrowState::Closed);
        assert!(closed.return_date.unwrap() >= closed.borrow_date);
        assert_eq!(copies_of(&store, book.id).await, 1);
    }

    #[tokio::test]
    async fn failed_copy_return_leaves_the_borrow_open() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;
        let workflow = workflow(&store);
        let borrow = workflow.create_borrow(request(book.id, "Bob")).await.unwrap();
        store.fail_next_copy_return();

        let err = workflow.complete_return(borrow.id).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(copies_of(&store, book.id).await, 0);
        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.borrows().get_by_id(borrow.id).await.unwrap().return_date, None);
        drop(uow);

        let closed = workflow.complete_return(borrow.id).await.unwrap();
        assert_eq!(closed.state(), BorrowState::Closed);
        assert_eq!(copies_of(&store, book.id).await, 1);
    }

    #[tokio::test]
    async fn second_return_is_refused_without_side_effects() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;
        let workflow = workflow(&store);
        let borrow = workflow.create_borrow(request(book.id, "Bob")).await.unwrap();
        let closed = workflow.complete_return(borrow.id).await.unwrap();

        let err = workflow.complete_return(borrow.id).await.unwrap_err();

        assert!(matches!(err, AppError::AlreadyReturned(_)));
        assert_eq!(copies_of(&store, book.id).await, 1);
        let mut uow = store.begin().await.unwrap();
        assert_eq!(
            uow.borrows().get_by_id(borrow.id).await.unwrap().return_date,
            closed.return_date
        );
    }

    #[tokio::test]
    async fn returning_unknown_borrow_is_not_found() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 2).await;

        let err = workflow(&store).complete_return(77).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(copies_of(&store, book.id).await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_borrowers_get_the_last_copy_once() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;
        let book_id = book.id;
        let workflow = Arc::new(workflow(&store));

        let mut handles = Vec::new();
        for i in 0..16 {
            let workflow = workflow.clone();
            handles.push(tokio::spawn(async move {
                workflow
                    .create_borrow(request(book_id, &format!("reader-{}", i)))
                    .await
            }));
        }

        let mut granted = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => granted += 1,
                Err(AppError::Unavailable(_)) => refused += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(granted, 1);
        assert_eq!(refused, 15);
        assert_eq!(copies_of(&store, book.id).await, 0);
        assert_eq!(borrow_count(&store).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_returns_put_back_one_copy() {
        let store = MemoryStore::new();
        let book = seed_book(&store, 1).await;
        let workflow = Arc::new(workflow(&store));
        let borrow_id = workflow.create_borrow(request(book.id, "Bob")).await.unwrap().id;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let workflow = workflow.clone();
            handles.push(tokio::spawn(
                async move { workflow.complete_return(borrow_id).await },
            ));
        }

        let mut closed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => closed += 1,
                Err(AppError::AlreadyReturned(_)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(closed, 1);
        assert_eq!(copies_of(&store, book.id).await, 1);
    }
}
