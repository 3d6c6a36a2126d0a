//! Book use cases

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Book, BookInput, Pagination},
    services::BookService,
};

/// Create a book; the author must exist
pub struct CreateBook {
    books: Arc<dyn BookService>,
}

impl CreateBook {
    pub fn new(books: Arc<dyn BookService>) -> Self {
        Self { books }
    }

    pub async fn execute(&self, input: BookInput) -> AppResult<Book> {
        self.books.create(input).await
    }
}

pub struct GetBooks {
    books: Arc<dyn BookService>,
}

impl GetBooks {
    pub fn new(books: Arc<dyn BookService>) -> Self {
        Self { books }
    }

    pub async fn execute(&self, page: Pagination) -> AppResult<(Vec<Book>, i64)> {
        page.validate()?;
        self.books.get_list(&page).await
    }
}

pub struct GetBook {
    books: Arc<dyn BookService>,
}

impl GetBook {
    pub fn new(books: Arc<dyn BookService>) -> Self {
        Self { books }
    }

    pub async fn execute(&self, id: i32) -> AppResult<Book> {
        self.books.get(id).await
    }
}

pub struct UpdateBook {
    books: Arc<dyn BookService>,
}

impl UpdateBook {
    pub fn new(books: Arc<dyn BookService>) -> Self {
        Self { books }
    }

    pub async fn execute(&self, id: i32, input: BookInput) -> AppResult<Book> {
        self.books.update(id, input).await
    }
}

pub struct DeleteBook {
    books: Arc<dyn BookService>,
}

impl DeleteBook {
    pub fn new(books: Arc<dyn BookService>) -> Self {
        Self { books }
    }

    pub async fn execute(&self, id: i32) -> AppResult<()> {
        self.books.delete(id).await
    }
}
