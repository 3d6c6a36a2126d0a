//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub author_id: i32,
    /// Copies currently on the shelf, never negative
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update book request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author_id: i32,
    #[serde(default = "default_available_copies")]
    pub available_copies: i32,
}

fn default_available_copies() -> i32 {
    1
}
