//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, dashboard, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Library catalog: books, loans and stock dashboard"
    ),
    paths(
        // Dashboard
        dashboard::get_dashboard,
        // Books
        books::list_books,
        books::new_book_form,
        books::create_book,
        books::edit_book_form,
        books::update_book,
        books::confirm_delete_book,
        books::delete_book,
        // Loans
        loans::list_loans,
        loans::new_loan_form,
        loans::create_loan,
        loans::edit_loan_form,
        loans::update_loan,
        loans::confirm_delete_loan,
        loans::delete_loan,
        // Health
        health::health_check,
        health::readiness_check,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookForm,
            crate::models::book::BookFormInput,
            crate::models::book::BookChoice,
            crate::api::BookPage,
            books::BookFormPage,
            // Loans
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanForm,
            crate::models::loan::LoanFormInput,
            crate::api::LoanPage,
            loans::LoanFormPage,
            // Dashboard
            dashboard::DashboardResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldErrors,
        )
    ),
    tags(
        (name = "dashboard", description = "Stock statistics"),
        (name = "books", description = "Catalog management"),
        (name = "loans", description = "Loan management"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
