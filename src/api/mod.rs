//! HTTP handlers for the catalog pages
//!
//! GET handlers return the page context as JSON; POST handlers take an
//! urlencoded form and answer with a `303 See Other` to the list page.

pub mod books;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod loans;
pub mod openapi;

use axum::{routing::get, Router};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    models::{book::Book, loan::LoanDetails, pagination::Page},
    AppState,
};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(BookPage = Paginated<Book>, LoanPage = Paginated<LoanDetails>)]
pub struct Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Rows of the current page
    pub items: Vec<T>,
    /// Total number of rows
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Rows per page
    pub per_page: i64,
    /// Number of pages, at least 1
    pub num_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> From<Page<T>> for Paginated<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from(page: Page<T>) -> Self {
        let window = page.window;
        Self {
            items: page.items,
            total: window.total,
            page: window.number,
            per_page: window.per_page,
            num_pages: window.num_pages,
            has_previous: window.has_previous(),
            has_next: window.has_next(),
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        // Dashboard
        .route("/", get(dashboard::get_dashboard))
        // Books
        .route("/livres/", get(books::list_books))
        .route(
            "/livres/nouveau/",
            get(books::new_book_form).post(books::create_book),
        )
        .route(
            "/livres/modifier/:id/",
            get(books::edit_book_form).post(books::update_book),
        )
        .route(
            "/livres/supprimer/:id/",
            get(books::confirm_delete_book).post(books::delete_book),
        )
        // Loans
        .route("/emprunts/", get(loans::list_loans))
        .route(
            "/emprunts/nouveau/",
            get(loans::new_loan_form).post(loans::create_loan),
        )
        .route(
            "/emprunts/modifier/:id/",
            get(loans::edit_loan_form).post(loans::update_loan),
        )
        .route(
            "/emprunts/supprimer/:id/",
            get(loans::confirm_delete_loan).post(loans::delete_loan),
        )
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(pages)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
