//! Book endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookInput, Pagination},
    AppState,
};

use super::{ApiResponse, BookPage, Page};

/// Create a book
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created, inside the response envelope", body = Book),
        (status = 400, description = "Invalid book or unknown author", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Book>>)> {
    let Json(input) = payload?;
    let book = state.use_cases.create_book.execute(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(book))))
}

/// List books
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(Pagination),
    responses(
        (status = 200, description = "Page of books, inside the response envelope", body = BookPage),
        (status = 400, description = "Invalid pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Page<Book>>>> {
    let Query(page) = query?;
    let (items, total) = state.use_cases.get_books.execute(page).await?;
    Ok(Json(ApiResponse::new(Page::new(items, page, total))))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book, inside the response envelope", body = Book),
        (status = 400, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let Path(id) = id?;
    let book = state.use_cases.get_book.execute(id).await?;
    Ok(Json(ApiResponse::new(book)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated, inside the response envelope", body = Book),
        (status = 400, description = "Invalid book, unknown author or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let book = state.use_cases.update_book.execute(id, input).await?;
    Ok(Json(ApiResponse::new(book)))
}

/// Delete a book and its borrows
#[utoipa::path(
    delete,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.use_cases.delete_book.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
