//! Author model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Author record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub surname: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create / update author request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorInput {
    pub name: String,
    pub surname: String,
    pub date_of_birth: NaiveDate,
}
