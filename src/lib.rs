//! Library catalog server
//!
//! Tracks books and their physical copies, lends copies out and brings them
//! back, and reports stock figures on a dashboard.

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire repositories and services on top of the pool
    pub fn new(config: AppConfig, pool: Pool<Postgres>) -> Self {
        let repository = repository::Repository::new(pool);
        let services = services::Services::new(repository, &config.pagination);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
