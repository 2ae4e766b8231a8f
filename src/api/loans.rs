//! Loan (emprunt) pages

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        book::BookChoice,
        loan::{LoanDetails, LoanForm, LoanFormInput},
        pagination::PageQuery,
    },
};

use super::{
    extract::{FormInput, PathId},
    Paginated,
};

const LOAN_LIST: &str = "/emprunts/";

/// Context of the loan create/edit page
#[derive(Serialize, ToSchema)]
pub struct LoanFormPage {
    /// Page heading
    pub title: String,
    /// Loan being edited, absent on creation
    pub loan: Option<LoanDetails>,
    /// Current values, absent on creation
    pub form: Option<LoanForm>,
    /// Books offered in the selector
    pub books: Vec<BookChoice>,
}

/// Paginated loan list, most recent first
#[utoipa::path(
    get,
    path = "/emprunts/",
    tag = "loans",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of loans", body = LoanPage)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<LoanDetails>>> {
    let page = state.services.loans.list_loans(query.page.as_deref()).await?;
    Ok(Json(page.into()))
}

/// Empty loan form with the book selector
#[utoipa::path(
    get,
    path = "/emprunts/nouveau/",
    tag = "loans",
    responses(
        (status = 200, description = "Loan creation form", body = LoanFormPage)
    )
)]
pub async fn new_loan_form(State(state): State<crate::AppState>) -> AppResult<Json<LoanFormPage>> {
    let books = state.services.loans.book_choices().await?;
    Ok(Json(LoanFormPage {
        title: "Nouvel Emprunt".to_string(),
        loan: None,
        form: None,
        books,
    }))
}

/// Lend a copy of a book
#[utoipa::path(
    post,
    path = "/emprunts/nouveau/",
    tag = "loans",
    request_body(content = LoanFormInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Loan created, redirect to the loan list"),
        (status = 400, description = "Unknown book or no copy available", body = ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    FormInput(input): FormInput<LoanFormInput>,
) -> AppResult<Redirect> {
    state.services.loans.create_loan(input).await?;
    Ok(Redirect::to(LOAN_LIST))
}

/// Loan form filled with the current values
#[utoipa::path(
    get,
    path = "/emprunts/modifier/{id}/",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan edition form", body = LoanFormPage),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn edit_loan_form(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
) -> AppResult<Json<LoanFormPage>> {
    let loan = state.services.loans.get_loan(id).await?;
    let books = state.services.loans.book_choices().await?;
    Ok(Json(LoanFormPage {
        title: "Modifier l'Emprunt".to_string(),
        form: Some(LoanForm::from(&loan)),
        loan: Some(loan),
        books,
    }))
}

/// Update an existing loan
#[utoipa::path(
    post,
    path = "/emprunts/modifier/{id}/",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body(content = LoanFormInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Loan updated, redirect to the loan list"),
        (status = 400, description = "Unknown book or no copy available", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
    FormInput(input): FormInput<LoanFormInput>,
) -> AppResult<Redirect> {
    state.services.loans.update_loan(id, input).await?;
    Ok(Redirect::to(LOAN_LIST))
}

/// Loan to confirm before deletion
#[utoipa::path(
    get,
    path = "/emprunts/supprimer/{id}/",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan about to be deleted", body = LoanDetails),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn confirm_delete_loan(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Delete a loan; an outstanding copy goes back on the shelf
#[utoipa::path(
    post,
    path = "/emprunts/supprimer/{id}/",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 303, description = "Loan deleted, redirect to the loan list"),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
) -> AppResult<Redirect> {
    state.services.loans.delete_loan(id).await?;
    Ok(Redirect::to(LOAN_LIST))
}
