//! Borrow use cases

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Borrow, BorrowInput, Pagination},
    services::BorrowService,
};

/// Lend a copy of a book to a reader
pub struct CreateBorrow {
    borrows: Arc<dyn BorrowService>,
}

impl CreateBorrow {
    pub fn new(borrows: Arc<dyn BorrowService>) -> Self {
        Self { borrows }
    }

    pub async fn execute(&self, input: BorrowInput) -> AppResult<Borrow> {
        self.borrows.create(input).await
    }
}

pub struct GetBorrows {
    borrows: Arc<dyn BorrowService>,
}

impl GetBorrows {
    pub fn new(borrows: Arc<dyn BorrowService>) -> Self {
        Self { borrows }
    }

    pub async fn execute(&self, page: Pagination) -> AppResult<(Vec<Borrow>, i64)> {
        page.validate()?;
        self.borrows.get_list(&page).await
    }
}

pub struct GetBorrow {
    borrows: Arc<dyn BorrowService>,
}

impl GetBorrow {
    pub fn new(borrows: Arc<dyn BorrowService>) -> Self {
        Self { borrows }
    }

    pub async fn execute(&self, id: i32) -> AppResult<Borrow> {
        self.borrows.get(id).await
    }
}

/// Take a book back from the reader
pub struct CompleteBorrow {
    borrows: Arc<dyn BorrowService>,
}

impl CompleteBorrow {
    pub fn new(borrows: Arc<dyn BorrowService>) -> Self {
        Self { borrows }
    }

    pub async fn execute(&self, id: i32) -> AppResult<Borrow> {
        self.borrows.complete(id).await
    }
}
