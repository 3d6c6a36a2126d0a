//! Borrow endpoints

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
    models::{Borrow, BorrowInput, Pagination},
    AppState,
};

use super::{ApiResponse, BorrowPage, Page};

/// Lend a book
#[utoipa::path(
    post,
    path = "/borrows/",
    tag = "borrows",
    request_body = BorrowInput,
    responses(
        (status = 201, description = "Borrow opened, inside the response envelope", body = Borrow),
        (status = 400, description = "Invalid borrow, unknown book or no copies left", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_borrow(
    State(state): State<AppState>,
    payload: Result<Json<BorrowInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Borrow>>)> {
    let Json(input) = payload?;
    let borrow = state.use_cases.create_borrow.execute(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(borrow))))
}

/// List borrows
#[utoipa::path(
    get,
    path = "/borrows/",
    tag = "borrows",
    params(Pagination),
    responses(
        (status = 200, description = "Page of borrows, inside the response envelope", body = BorrowPage),
        (status = 400, description = "Invalid pagination", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_borrows(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Page<Borrow>>>> {
    let Query(page) = query?;
    let (items, total) = state.use_cases.get_borrows.execute(page).await?;
    Ok(Json(ApiResponse::new(Page::new(items, page, total))))
}

/// Get borrow by ID
#[utoipa::path(
    get,
    path = "/borrows/{id}/",
    tag = "borrows",
    params(("id" = i32, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Borrow, inside the response envelope", body = Borrow),
        (status = 400, description = "Borrow not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_borrow(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<Borrow>>> {
    let Path(id) = id?;
    let borrow = state.use_cases.get_borrow.execute(id).await?;
    Ok(Json(ApiResponse::new(borrow)))
}

/// Return a borrowed book
#[utoipa::path(
    patch,
    path = "/borrows/{id}/return",
    tag = "borrows",
    params(("id" = i32, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Borrow closed, inside the response envelope", body = Borrow),
        (status = 400, description = "Borrow not found or already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_borrow(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<ApiResponse<Borrow>>> {
    let Path(id) = id?;
    let borrow = state.use_cases.complete_borrow.execute(id).await?;
    Ok(Json(ApiResponse::new(borrow)))
}
