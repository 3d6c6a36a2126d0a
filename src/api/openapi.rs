//! OpenAPI documentation

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, borrows, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Authors, books and borrows of a lending library"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Borrows
        borrows::create_borrow,
        borrows::list_borrows,
        borrows::get_borrow,
        borrows::return_borrow,
    ),
    components(
        schemas(
            crate::models::Author,
            crate::models::AuthorInput,
            crate::models::Book,
            crate::models::BookInput,
            crate::models::Borrow,
            crate::models::BorrowInput,
            crate::models::Pagination,
            crate::api::PaginationOut,
            crate::api::AuthorPage,
            crate::api::BookPage,
            crate::api::BorrowPage,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management"),
        (name = "borrows", description = "Lending and returns")
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/api/docs`, document at `/api/openapi.json`
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi())
}
