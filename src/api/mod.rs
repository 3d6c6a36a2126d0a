//! API handlers for the library REST endpoints

pub mod authors;
pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;

use axum::{
    routing::{get, patch},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    models::{Author, Book, Borrow, Pagination},
    AppState,
};

/// Success envelope: `{"data": ..., "meta": {}, "errors": []}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: serde_json::Map<String, serde_json::Value>,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: serde_json::Map::new(),
            errors: Vec::new(),
        }
    }
}

/// Offset/limit of a page plus the total row count
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationOut {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

/// One page of a listing
#[derive(Debug, Serialize, ToSchema)]
#[aliases(AuthorPage = Page<Author>, BookPage = Page<Book>, BorrowPage = Page<Borrow>)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    pub pagination: PaginationOut,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, page: Pagination, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationOut {
                offset: page.offset,
                limit: page.limit,
                total,
            },
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authors
        .route(
            "/authors/",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id/",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/books/", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id/",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Borrows
        .route(
            "/borrows/",
            get(borrows::list_borrows).post(borrows::create_borrow),
        )
        .route("/borrows/:id/", get(borrows::get_borrow))
        .route("/borrows/:id/return", patch(borrows::return_borrow))
        // OpenAPI documentation
        .merge(openapi::swagger_ui())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
