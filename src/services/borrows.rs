//! Borrow service
//!
//! Opening and closing borrows go through [`BorrowWorkflow`]; reads are plain
//! repository calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Borrow, BorrowInput, Pagination},
    repository::{settle, Store},
};

use super::borrow_workflow::BorrowWorkflow;

#[async_trait]
pub trait BorrowService: Send + Sync {
    async fn create(&self, input: BorrowInput) -> AppResult<Borrow>;
    async fn get(&self, id: i32) -> AppResult<Borrow>;
    /// One page of borrows and the total number of borrows
    async fn get_list(&self, page: &Pagination) -> AppResult<(Vec<Borrow>, i64)>;
    /// Mark the borrow returned and put its copy back
    async fn complete(&self, id: i32) -> AppResult<Borrow>;
}

pub struct BorrowsService {
    store: Arc<dyn Store>,
    workflow: BorrowWorkflow,
}

impl BorrowsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            workflow: BorrowWorkflow::new(store.clone()),
            store,
        }
    }
}

#[async_trait]
impl BorrowService for BorrowsService {
    async fn create(&self, input: BorrowInput) -> AppResult<Borrow> {
        self.workflow.create_borrow(input).await
    }

    async fn get(&self, id: i32) -> AppResult<Borrow> {
        let mut uow = self.store.begin().await?;
        let result = uow.borrows().get_by_id(id).await;
        settle(uow, result).await
    }

    async fn get_list(&self, page: &Pagination) -> AppResult<(Vec<Borrow>, i64)> {
        let mut uow = self.store.begin().await?;
        let result = match uow.borrows().get_all(page).await {
            Ok(rows) => uow.borrows().count().await.map(|total| (rows, total)),
            Err(e) => Err(e),
        };
        settle(uow, result).await
    }

    async fn complete(&self, id: i32) -> AppResult<Borrow> {
        self.workflow.complete_return(id).await
    }
}
