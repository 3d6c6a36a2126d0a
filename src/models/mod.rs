//! Data models for the library server

pub mod author;
pub mod book;
pub mod borrow;
pub mod pagination;

// Re-export commonly used types
pub use author::{Author, AuthorInput};
pub use book::{Book, BookInput};
pub use borrow::{Borrow, BorrowInput, BorrowState};
pub use pagination::Pagination;
