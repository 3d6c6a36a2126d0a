//! Application operations invoked by the HTTP handlers
//!
//! Each use case is a small struct with one `execute` method over the
//! service traits it needs.

pub mod authors;
pub mod books;
pub mod borrows;

use std::sync::Arc;

use crate::{repository::Store, services::Services};

/// Every use case, wired once at startup
pub struct UseCases {
    pub create_author: authors::CreateAuthor,
    pub get_authors: authors::GetAuthors,
    pub get_author: authors::GetAuthor,
    pub update_author: authors::UpdateAuthor,
    pub delete_author: authors::DeleteAuthor,

    pub create_book: books::CreateBook,
    pub get_books: books::GetBooks,
    pub get_book: books::GetBook,
    pub update_book: books::UpdateBook,
    pub delete_book: books::DeleteBook,

    pub create_borrow: borrows::CreateBorrow,
    pub get_borrows: borrows::GetBorrows,
    pub get_borrow: borrows::GetBorrow,
    pub complete_borrow: borrows::CompleteBorrow,
}

impl UseCases {
    /// Build services over `store` and every use case over those services
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::from_services(Services::new(store))
    }

    fn from_services(services: Services) -> Self {
        let Services {
            authors: author_service,
            books: book_service,
            borrows: borrow_service,
        } = services;

        Self {
            create_author: authors::CreateAuthor::new(author_service.clone()),
            get_authors: authors::GetAuthors::new(author_service.clone()),
            get_author: authors::GetAuthor::new(author_service.clone()),
            update_author: authors::UpdateAuthor::new(author_service.clone()),
            delete_author: authors::DeleteAuthor::new(author_service),

            create_book: books::CreateBook::new(book_service.clone()),
            get_books: books::GetBooks::new(book_service.clone()),
            get_book: books::GetBook::new(book_service.clone()),
            update_book: books::UpdateBook::new(book_service.clone()),
            delete_book: books::DeleteBook::new(book_service),

            create_borrow: borrows::CreateBorrow::new(borrow_service.clone()),
            get_borrows: borrows::GetBorrows::new(borrow_service.clone()),
            get_borrow: borrows::GetBorrow::new(borrow_service.clone()),
            complete_borrow: borrows::CompleteBorrow::new(borrow_service),
        }
    }
}
