//! Dashboard endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Stock figures shown on the home page
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Physical copies across all titles
    pub total_exemplaires: i64,
    /// Copies on the shelf
    pub livres_dispos: i64,
    /// Copies out on loan
    pub livres_empruntes: i64,
    /// Distinct titles
    pub total_titres: i64,
    /// Titles with no copy left on the shelf
    pub rupture_stock: i64,
    /// Author with the most titles, or "N/A"
    pub top_auteur: String,
}

/// Catalog dashboard
#[utoipa::path(
    get,
    path = "/",
    tag = "dashboard",
    responses(
        (status = 200, description = "Aggregate stock statistics", body = DashboardResponse)
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
) -> AppResult<Json<DashboardResponse>> {
    let dashboard = state.services.dashboard.get_dashboard().await?;
    Ok(Json(dashboard))
}
