//! Business logic services

pub mod authors;
pub mod books;
pub mod borrow_workflow;
pub mod borrows;
pub mod validation;

use std::sync::Arc;

use crate::repository::Store;

pub use authors::{AuthorService, AuthorsService};
pub use books::{BookService, BooksService};
pub use borrows::{BorrowService, BorrowsService};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: Arc<dyn AuthorService>,
    pub books: Arc<dyn BookService>,
    pub borrows: Arc<dyn BorrowService>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            authors: Arc::new(AuthorsService::new(store.clone())),
            books: Arc::new(BooksService::new(store.clone())),
            borrows: Arc::new(BorrowsService::new(store)),
        }
    }
}
