//! Loan (emprunt) model and form payloads

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    error::{FieldErrors, FIELD_REQUIRED},
    repository::loans::UNKNOWN_BOOK,
};

pub const INVALID_DATE: &str = "Enter a valid date";

/// Loan row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    /// The copy has not come back yet
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Loan joined with its book title, as shown on lists and forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub loan_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl fmt::Display for LoanDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Emprunt de {} le {}", self.book_title, self.loan_date)
    }
}

/// Loan form, used for both creation and edition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LoanForm {
    pub book_id: i32,
    /// Absent while the copy is still out
    pub return_date: Option<NaiveDate>,
}

/// Loan form as submitted. An empty `return_date` means the copy is still out.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoanFormInput {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[schema(example = "4")]
    pub book_id: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[schema(example = "2024-03-15")]
    pub return_date: Option<String>,
}

impl LoanFormInput {
    pub fn parse(self) -> Result<LoanForm, FieldErrors> {
        let mut errors = FieldErrors::new();

        let book_id = match self.book_id.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("book_id", FIELD_REQUIRED);
                None
            }
            Some(raw) => match raw.parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("book_id", UNKNOWN_BOOK);
                    None
                }
            },
        };

        let return_date = match self.return_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("return_date", INVALID_DATE);
                    None
                }
            },
        };

        match book_id {
            Some(book_id) if errors.is_empty() => Ok(LoanForm {
                book_id,
                return_date,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&LoanDetails> for LoanForm {
    fn from(loan: &LoanDetails) -> Self {
        Self {
            book_id: loan.book_id,
            return_date: loan.return_date,
        }
    }
}
