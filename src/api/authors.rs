//! Author endpoints

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
    models::{Author, AuthorInput, Pagination},
    AppState,
};

use super::{ApiResponse, AuthorPage, Page};

/// Create an author
#[utoipa::path(
    post,
    path = "/authors/",
    tag = "authors",
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created, inside the response envelope", body = Author),
        (status = 400, description = "Invalid author", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<AuthorInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Author>>)> {
    let Json(input) = payload?;
    let author = state.use_cases.create_author.execute(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(author))))
}

/// List authors
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "authors",
    params(Pagination),
    responses(
        (status = 200, description = "Page of authors, inside the response envelope", body = AuthorPage),
        (status = 400, description = "Invalid pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Page<Author>>>> {
    let Query(page) = query?;
    let (items, total) = state.use_cases.get_authors.execute(page).await?;
    Ok(Json(ApiResponse::new(Page::new(items, page, total))))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}/",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author, inside the response envelope", body = Author),
        (status = 400, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let Path(id) = id?;
    let author = state.use_cases.get_author.execute(id).await?;
    Ok(Json(ApiResponse::new(author)))
}

/// Replace an author
#[utoipa::path(
    put,
    path = "/authors/{id}/",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated, inside the response envelope", body = Author),
        (status = 400, description = "Invalid author or author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<AuthorInput>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let author = state.use_cases.update_author.execute(id, input).await?;
    Ok(Json(ApiResponse::new(author)))
}

/// Delete an author and their books
#[utoipa::path(
    delete,
    path = "/authors/{id}/",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.use_cases.delete_author.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
