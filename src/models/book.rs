//! Book (catalog title) model and form payloads

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{FieldErrors, FIELD_REQUIRED};

pub const NOT_A_WHOLE_NUMBER: &str = "Enter a whole number";

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Unique across the catalog
    pub isbn: String,
    pub total_copies: i32,
    /// Copies on the shelf, between 0 and `total_copies`
    pub available_copies: i32,
}

impl Book {
    /// At least one copy can be lent
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Copies currently out on loan
    pub fn borrowed_copies(&self) -> i32 {
        self.total_copies - self.available_copies
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Book form, used for both creation and edition
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 1, max = 200, message = "Title is required (200 characters max)"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author is required (100 characters max)"))]
    pub author: String,
    #[validate(length(min = 1, max = 13, message = "ISBN is required (13 characters max)"))]
    pub isbn: String,
    #[validate(range(min = 1, message = "A book has at least one copy"))]
    pub total_copies: i32,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            total_copies: book.total_copies,
        }
    }
}

/// Book form as submitted, before any field is converted.
///
/// Empty inputs read as missing.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookFormInput {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub title: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub author: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[schema(example = "3")]
    pub total_copies: Option<String>,
}

impl BookFormInput {
    /// Convert and validate every field, collecting all the failures
    pub fn parse(self) -> Result<BookForm, FieldErrors> {
        let mut errors = FieldErrors::new();

        let mut text = |field: &str, value: Option<String>| {
            let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
            if value.is_empty() {
                errors.add(field, FIELD_REQUIRED);
            }
            value
        };
        let title = text("title", self.title);
        let author = text("author", self.author);
        let isbn = text("isbn", self.isbn);

        let total_copies = match self.total_copies.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("total_copies", FIELD_REQUIRED);
                1
            }
            Some(raw) => raw.parse::<i32>().unwrap_or_else(|_| {
                errors.add("total_copies", NOT_A_WHOLE_NUMBER);
                1
            }),
        };

        let form = BookForm {
            title,
            author,
            isbn,
            total_copies,
        };
        if let Err(invalid) = form.validate() {
            errors.merge_new(invalid.into());
        }

        if errors.is_empty() {
            Ok(form)
        } else {
            Err(errors)
        }
    }
}

/// Entry of the book selector on the loan form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookChoice {
    pub id: i32,
    pub title: String,
    pub available_copies: i32,
}

/// Aggregates over the whole `books` table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct StockTotals {
    pub total_copies: i64,
    pub available_copies: i64,
    pub titles: i64,
    pub out_of_stock: i64,
}
