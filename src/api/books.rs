//! Book (livre) pages

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
        book::{Book, BookForm, BookFormInput},
        pagination::PageQuery,
    },
};

use super::{
    extract::{FormInput, PathId},
    Paginated,
};

const BOOK_LIST: &str = "/livres/";

/// Context of the book create/edit page
#[derive(Serialize, ToSchema)]
pub struct BookFormPage {
    /// Page heading
    pub title: String,
    /// Book being edited, absent on creation
    pub book_id: Option<i32>,
    /// Current values, absent on creation
    pub form: Option<BookForm>,
}

/// Paginated book list, ordered by title
#[utoipa::path(
    get,
    path = "/livres/",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<Book>>> {
    let page = state
        .services
        .catalog
        .list_books(query.page.as_deref())
        .await?;
    Ok(Json(page.into()))
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/livres/nouveau/",
    tag = "books",
    responses(
        (status = 200, description = "Book creation form", body = BookFormPage)
    )
)]
pub async fn new_book_form() -> Json<BookFormPage> {
    Json(BookFormPage {
        title: "Ajouter un Livre".to_string(),
        book_id: None,
        form: None,
    })
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/livres/nouveau/",
    tag = "books",
    request_body(content = BookFormInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book created, redirect to the book list"),
        (status = 400, description = "Invalid form or duplicate ISBN", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    FormInput(input): FormInput<BookFormInput>,
) -> AppResult<Redirect> {
    state.services.catalog.create_book(input).await?;
    Ok(Redirect::to(BOOK_LIST))
}

/// Book form filled with the current values
#[utoipa::path(
    get,
    path = "/livres/modifier/{id}/",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book edition form", body = BookFormPage),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn edit_book_form(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
) -> AppResult<Json<BookFormPage>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(BookFormPage {
        title: "Modifier un Livre".to_string(),
        book_id: Some(book.id),
        form: Some(BookForm::from(&book)),
    }))
}

/// Update an existing book
#[utoipa::path(
    post,
    path = "/livres/modifier/{id}/",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body(content = BookFormInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book updated, redirect to the book list"),
        (status = 400, description = "Invalid form or duplicate ISBN", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
    FormInput(input): FormInput<BookFormInput>,
) -> AppResult<Redirect> {
    state.services.catalog.update_book(id, input).await?;
    Ok(Redirect::to(BOOK_LIST))
}

/// Book to confirm before deletion
#[utoipa::path(
    get,
    path = "/livres/supprimer/{id}/",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book about to be deleted", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn confirm_delete_book(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Delete a book and all of its loans
#[utoipa::path(
    post,
    path = "/livres/supprimer/{id}/",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Book deleted, redirect to the book list"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    PathId(id): PathId<i32>,
) -> AppResult<Redirect> {
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to(BOOK_LIST))
}
