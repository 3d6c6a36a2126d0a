//! Author service

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorInput, Pagination},
    repository::{settle, Store, UnitOfWork},
};

use super::validation::{author_validator, ComposedValidator};

#[async_trait]
pub trait AuthorService: Send + Sync {
    async fn create(&self, input: AuthorInput) -> AppResult<Author>;
    async fn get(&self, id: i32) -> AppResult<Author>;
    /// One page of authors and the total number of authors
    async fn get_list(&self, page: &Pagination) -> AppResult<(Vec<Author>, i64)>;
    async fn update(&self, id: i32, input: AuthorInput) -> AppResult<Author>;
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct AuthorsService {
    store: Arc<dyn Store>,
    validator: ComposedValidator<AuthorInput>,
}

impl AuthorsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            validator: author_validator(),
        }
    }
}

/// Books with borrow records keep their author alive
async fn remove(uow: &mut dyn UnitOfWork, id: i32) -> AppResult<()> {
    if uow.borrows().count_for_author(id).await? > 0 {
        return Err(AppError::Validation(
            "Author has books with borrow records and cannot be deleted".to_string(),
        ));
    }
    uow.authors().delete(id).await
}

#[async_trait]
impl AuthorService for AuthorsService {
    async fn create(&self, input: AuthorInput) -> AppResult<Author> {
        self.validator.validate(&input)?;

        let mut uow = self.store.begin().await?;
        let result = uow.authors().add(&input).await;
        let author = settle(uow, result).await?;

        tracing::info!("Created author {} ({} {})", author.id, author.name, author.surname);
        Ok(author)
    }

    async fn get(&self, id: i32) -> AppResult<Author> {
        let mut uow = self.store.begin().await?;
        let result = uow.authors().get_by_id(id).await;
        settle(uow, result).await
    }

    async fn get_list(&self, page: &Pagination) -> AppResult<(Vec<Author>, i64)> {
        let mut uow = self.store.begin().await?;
        let result = match uow.authors().get_all(page).await {
            Ok(rows) => uow.authors().count().await.map(|total| (rows, total)),
            Err(e) => Err(e),
        };
        settle(uow, result).await
    }

    async fn update(&self, id: i32, input: AuthorInput) -> AppResult<Author> {
        self.validator.validate(&input)?;

        let mut uow = self.store.begin().await?;
        let result = uow.authors().update(id, &input).await;
        settle(uow, result).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        let result = remove(uow.as_mut(), id).await;
        settle(uow, result).await?;

        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
