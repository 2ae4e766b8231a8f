//! Dashboard statistics service

use crate::{
    api::dashboard::DashboardResponse, error::AppResult, models::book::StockTotals,
    repository::Repository,
};

/// Shown in place of the top author on an empty catalog
pub const NO_AUTHOR: &str = "N/A";

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Aggregate stock figures over the whole catalog
    pub async fn get_dashboard(&self) -> AppResult<DashboardResponse> {
        let totals = self.repository.books.stock_totals().await?;
        let top_author = self.repository.books.top_author().await?;
        Ok(summarize(totals, top_author))
    }
}

/// Derive the dashboard figures from the raw table aggregates
pub fn summarize(totals: StockTotals, top_author: Option<String>) -> DashboardResponse {
    DashboardResponse {
        total_exemplaires: totals.total_copies,
        livres_dispos: totals.available_copies,
        livres_empruntes: totals.total_copies - totals.available_copies,
        total_titres: totals.titles,
        rupture_stock: totals.out_of_stock,
        top_auteur: top_author.unwrap_or_else(|| NO_AUTHOR.to_string()),
    }
}
