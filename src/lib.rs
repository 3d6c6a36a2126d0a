//! Library record service
//!
//! A REST JSON API for the authors, books and borrows of a lending library.
//! Handlers call use cases, use cases call services, and services run their
//! repository work inside store units of work.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod use_cases;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Store;
use use_cases::UseCases;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub use_cases: Arc<UseCases>,
}

impl AppState {
    /// Wire every service and use case over `store`
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            use_cases: Arc::new(UseCases::new(store.clone())),
            store,
        }
    }
}
