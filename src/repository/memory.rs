//! In-process store
//!
//! Keeps authors, books and borrows in ordered maps behind one async mutex.
//! A unit of work holds the lock for its whole lifetime, so units of work are
//! fully serialized; rollback restores the snapshot taken at `begin`.
//! Foreign keys and cascades follow the SQL schema.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    AuthorRepository, BookRepository, BorrowRepository, CopyCheckout, Store, UnitOfWork,
};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorInput, Book, BookInput, Borrow, BorrowInput, Pagination},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, Book>,
    borrows: BTreeMap<i32, Borrow>,
    last_author_id: i32,
    last_book_id: i32,
    last_borrow_id: i32,
}

impl Tables {
    /// Borrows reference books with ON DELETE RESTRICT
    fn remove_book(&mut self, id: i32) -> AppResult<()> {
        if !self.books.contains_key(&id) {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        if self.borrows.values().any(|borrow| borrow.book_id == id) {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "foreign key violation: book {} is still referenced by borrows",
                id
            ))));
        }
        self.books.remove(&id);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_next_borrow_insert: AtomicBool,
    fail_next_copy_return: AtomicBool,
}

/// Store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next borrow insert fail with a storage error
    pub fn fail_next_borrow_insert(&self) {
        self.faults
            .fail_next_borrow_insert
            .store(true, Ordering::SeqCst);
    }

    /// Make the next copy return fail with a storage error
    pub fn fail_next_copy_return(&self) {
        self.faults
            .fail_next_copy_return
            .store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            tables: guard,
            snapshot,
            faults: self.faults.clone(),
            settled: false,
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    tables: OwnedMutexGuard<Tables>,
    snapshot: Tables,
    faults: Arc<Faults>,
    settled: bool,
}

impl MemoryUnitOfWork {
    /// Put the tables back as they were at `begin`. Id counters keep their
    /// current values, so ids handed out by a rolled-back unit are never
    /// reused, as with SERIAL columns.
    fn restore(&mut self) {
        let (authors, books, borrows) = (
            self.tables.last_author_id,
            self.tables.last_book_id,
            self.tables.last_borrow_id,
        );
        *self.tables = std::mem::take(&mut self.snapshot);
        self.tables.last_author_id = authors;
        self.tables.last_book_id = books;
        self.tables.last_borrow_id = borrows;
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        if !self.settled {
            self.restore();
        }
    }
}

fn page_of<T: Clone>(rows: &BTreeMap<i32, T>, page: &Pagination) -> Vec<T> {
    rows.values()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .cloned()
        .collect()
}

fn foreign_key_violation(what: &str) -> AppError {
    AppError::Database(sqlx::Error::Protocol(format!(
        "foreign key violation: {} does not exist",
        what
    )))
}

#[async_trait]
impl AuthorRepository for MemoryUnitOfWork {
    async fn add(&mut self, author: &AuthorInput) -> AppResult<Author> {
        let now = Utc::now();
        self.tables.last_author_id += 1;
        let row = Author {
            id: self.tables.last_author_id,
            name: author.name.clone(),
            surname: author.surname.clone(),
            date_of_birth: author.date_of_birth,
            created_at: now,
            updated_at: now,
        };
        self.tables.authors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&mut self, id: i32) -> AppResult<Author> {
        self.tables
            .authors
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Author>> {
        Ok(page_of(&self.tables.authors, page))
    }

    async fn count(&mut self) -> AppResult<i64> {
        Ok(self.tables.authors.len() as i64)
    }

    async fn update(&mut self, id: i32, author: &AuthorInput) -> AppResult<Author> {
        let row = self
            .tables
            .authors
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        row.name = author.name.clone();
        row.surname = author.surname.clone();
        row.date_of_birth = author.date_of_birth;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&mut self, id: i32) -> AppResult<()> {
        if !self.tables.authors.contains_key(&id) {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        let orphaned: Vec<i32> = self
            .tables
            .books
            .values()
            .filter(|book| book.author_id == id)
            .map(|book| book.id)
            .collect();
        // A failed statement changes nothing, so check every book before removing any
        let tables = &*self.tables;
        if let Some(book_id) = orphaned
            .iter()
            .find(|book_id| tables.borrows.values().any(|b| b.book_id == **book_id))
        {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "foreign key violation: book {} is still referenced by borrows",
                book_id
            ))));
        }
        for book_id in orphaned {
            self.tables.remove_book(book_id)?;
        }
        self.tables.authors.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MemoryUnitOfWork {
    async fn add(&mut self, book: &BookInput) -> AppResult<Book> {
        if !self.tables.authors.contains_key(&book.author_id) {
            return Err(foreign_key_violation("author"));
        }
        let now = Utc::now();
        self.tables.last_book_id += 1;
        let row = Book {
            id: self.tables.last_book_id,
            title: book.title.clone(),
            description: book.description.clone(),
            author_id: book.author_id,
            available_copies: book.available_copies,
            created_at: now,
            updated_at: now,
        };
        self.tables.books.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&mut self, id: i32) -> AppResult<Book> {
        self.tables
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Book>> {
        Ok(page_of(&self.tables.books, page))
    }

    async fn count(&mut self) -> AppResult<i64> {
        Ok(self.tables.books.len() as i64)
    }

    async fn update(&mut self, id: i32, book: &BookInput) -> AppResult<Book> {
        if !self.tables.authors.contains_key(&book.author_id) {
            return Err(foreign_key_violation("author"));
        }
        let row = self
            .tables
            .books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        row.title = book.title.clone();
        row.description = book.description.clone();
        row.author_id = book.author_id;
        row.available_copies = book.available_copies;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&mut self, id: i32) -> AppResult<()> {
        self.tables.remove_book(id)
    }

    async fn take_copy(&mut self, id: i32) -> AppResult<CopyCheckout> {
        let Some(book) = self.tables.books.get_mut(&id) else {
            return Ok(CopyCheckout::Missing);
        };
        if book.available_copies < 1 {
            return Ok(CopyCheckout::Exhausted);
        }
        book.available_copies -= 1;
        book.updated_at = Utc::now();
        Ok(CopyCheckout::Taken {
            remaining: book.available_copies,
        })
    }

    async fn return_copy(&mut self, id: i32) -> AppResult<bool> {
        if self
            .faults
            .fail_next_copy_return
            .swap(false, Ordering::SeqCst)
        {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        match self.tables.books.get_mut(&id) {
            Some(book) => {
                book.available_copies += 1;
                book.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BorrowRepository for MemoryUnitOfWork {
    async fn add(&mut self, borrow: &BorrowInput) -> AppResult<Borrow> {
        if self
            .faults
            .fail_next_borrow_insert
            .swap(false, Ordering::SeqCst)
        {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        if !self.tables.books.contains_key(&borrow.book_id) {
            return Err(foreign_key_violation("book"));
        }
        let now = Utc::now();
        self.tables.last_borrow_id += 1;
        let row = Borrow {
            id: self.tables.last_borrow_id,
            book_id: borrow.book_id,
            reader_name: borrow.reader_name.clone(),
            borrow_date: now,
            return_date: None,
            created_at: now,
            updated_at: now,
        };
        self.tables.borrows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&mut self, id: i32) -> AppResult<Borrow> {
        self.tables
            .borrows
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Borrow not found".to_string()))
    }

    async fn get_all(&mut self, page: &Pagination) -> AppResult<Vec<Borrow>> {
        Ok(page_of(&self.tables.borrows, page))
    }

    async fn count(&mut self) -> AppResult<i64> {
        Ok(self.tables.borrows.len() as i64)
    }

    async fn count_for_book(&mut self, book_id: i32) -> AppResult<i64> {
        Ok(self
            .tables
            .borrows
            .values()
            .filter(|borrow| borrow.book_id == book_id)
            .count() as i64)
    }

    async fn count_for_author(&mut self, author_id: i32) -> AppResult<i64> {
        let tables = &self.tables;
        Ok(tables
            .borrows
            .values()
            .filter(|borrow| {
                tables
                    .books
                    .get(&borrow.book_id)
                    .is_some_and(|book| book.author_id == author_id)
            })
            .count() as i64)
    }

    async fn close(&mut self, id: i32) -> AppResult<Option<Borrow>> {
        match self.tables.borrows.get_mut(&id) {
            Some(borrow) if borrow.return_date.is_none() => {
                let now = Utc::now();
                borrow.return_date = Some(now);
                borrow.updated_at = now;
                Ok(Some(borrow.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
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
        let mut uow = self;
        uow.settled = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut uow = self;
        uow.restore();
        uow.settled = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jane() -> AuthorInput {
        AuthorInput {
            name: "Jane".to_string(),
            surname: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = MemoryStore::new();

        {
            let mut uow = store.begin().await.unwrap();
            uow.authors().add(&jane()).await.unwrap();
        }

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.authors().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn committed_changes_are_visible_to_later_units() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let author = uow.authors().add(&jane()).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.authors().get_by_id(author.id).await.unwrap(), author);
    }

    #[tokio::test]
    async fn pages_follow_insertion_order() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        for _ in 0..5 {
            uow.authors().add(&jane()).await.unwrap();
        }

        let page = uow.authors().get_all(&Pagination::new(2, 3)).await.unwrap();
        let ids: Vec<i32> = page.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(uow.authors().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn take_copy_stops_at_zero() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let author = uow.authors().add(&jane()).await.unwrap();
        let book = uow
            .books()
            .add(&BookInput {
                title: "X".to_string(),
                description: String::new(),
                author_id: author.id,
                available_copies: 1,
            })
            .await
            .unwrap();

        assert_eq!(
            uow.books().take_copy(book.id).await.unwrap(),
            CopyCheckout::Taken { remaining: 0 }
        );
        assert_eq!(
            uow.books().take_copy(book.id).await.unwrap(),
            CopyCheckout::Exhausted
        );
        assert_eq!(uow.books().take_copy(999).await.unwrap(), CopyCheckout::Missing);
        assert_eq!(uow.books().get_by_id(book.id).await.unwrap().available_copies, 0);
    }

    #[tokio::test]
    async fn deleting_an_author_cascades_to_books() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let author = uow.authors().add(&jane()).await.unwrap();
        uow.books()
            .add(&BookInput {
                title: "X".to_string(),
                description: String::new(),
                author_id: author.id,
                available_copies: 2,
            })
            .await
            .unwrap();

        uow.authors().delete(author.id).await.unwrap();

        assert_eq!(uow.books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn borrowed_book_cannot_be_deleted() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let author = uow.authors().add(&jane()).await.unwrap();
        let book = uow
            .books()
            .add(&BookInput {
                title: "X".to_string(),
                description: String::new(),
                author_id: author.id,
                available_copies: 2,
            })
            .await
            .unwrap();
        uow.borrows()
            .add(&BorrowInput {
                book_id: book.id,
                reader_name: "Bob".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(uow.books().delete(book.id).await, Err(AppError::Database(_))));
        assert!(matches!(uow.authors().delete(author.id).await, Err(AppError::Database(_))));
        assert_eq!(uow.authors().get_by_id(author.id).await.unwrap(), author);
        assert_eq!(uow.books().get_by_id(book.id).await.unwrap(), book);
        assert_eq!(uow.borrows().count_for_book(book.id).await.unwrap(), 1);
        assert_eq!(uow.borrows().count_for_author(author.id).await.unwrap(), 1);
        assert_eq!(uow.borrows().count_for_author(author.id + 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rolled_back_ids_are_not_reused() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let discarded = uow.authors().add(&jane()).await.unwrap();
        uow.rollback().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let kept = uow.authors().add(&jane()).await.unwrap();

        assert_eq!(uow.authors().count().await.unwrap(), 1);
        assert!(kept.id > discarded.id);
    }

    #[tokio::test]
    async fn book_requires_existing_author() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let err = uow
            .books()
            .add(&BookInput {
                title: "X".to_string(),
                description: String::new(),
                author_id: 42,
                available_copies: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
