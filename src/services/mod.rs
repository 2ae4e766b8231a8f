//! Business logic services

pub mod catalog;
pub mod dashboard;
pub mod loans;

use crate::{config::PaginationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, pagination: &PaginationConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), pagination.page_size),
            loans: loans::LoansService::new(repository.clone(), pagination.page_size),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            repository,
        }
    }
}
