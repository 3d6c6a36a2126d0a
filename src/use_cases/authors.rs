//! Author use cases

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Author, AuthorInput, Pagination},
    services::AuthorService,
};

pub struct CreateAuthor {
    authors: Arc<dyn AuthorService>,
}

impl CreateAuthor {
    pub fn new(authors: Arc<dyn AuthorService>) -> Self {
        Self { authors }
    }

    pub async fn execute(&self, input: AuthorInput) -> AppResult<Author> {
        self.authors.create(input).await
    }
}

pub struct GetAuthors {
    authors: Arc<dyn AuthorService>,
}

impl GetAuthors {
    pub fn new(authors: Arc<dyn AuthorService>) -> Self {
        Self { authors }
    }

    pub async fn execute(&self, page: Pagination) -> AppResult<(Vec<Author>, i64)> {
        page.validate()?;
        self.authors.get_list(&page).await
    }
}

pub struct GetAuthor {
    authors: Arc<dyn AuthorService>,
}

impl GetAuthor {
    pub fn new(authors: Arc<dyn AuthorService>) -> Self {
        Self { authors }
    }

    pub async fn execute(&self, id: i32) -> AppResult<Author> {
        self.authors.get(id).await
    }
}

pub struct UpdateAuthor {
    authors: Arc<dyn AuthorService>,
}

impl UpdateAuthor {
    pub fn new(authors: Arc<dyn AuthorService>) -> Self {
        Self { authors }
    }

    pub async fn execute(&self, id: i32, input: AuthorInput) -> AppResult<Author> {
        self.authors.update(id, input).await
    }
}

pub struct DeleteAuthor {
    authors: Arc<dyn AuthorService>,
}

impl DeleteAuthor {
    pub fn new(authors: Arc<dyn AuthorService>) -> Self {
        Self { authors }
    }

    pub async fn execute(&self, id: i32) -> AppResult<()> {
        self.authors.delete(id).await
    }
}
