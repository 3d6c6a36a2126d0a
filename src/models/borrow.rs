//! Borrow model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrow record. An open borrow holds one copy of its book off the shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub book_id: i32,
    pub reader_name: String,
    pub borrow_date: DateTime<Utc>,
    /// Null while the copy is still out
    pub return_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowState {
    Open,
    Closed,
}

impl Borrow {
    pub fn state(&self) -> BorrowState {
        match self.return_date {
            None => BorrowState::Open,
            Some(_) => BorrowState::Closed,
        }
    }
}

/// Create borrow request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowInput {
    pub book_id: i32,
    pub reader_name: String,
}
