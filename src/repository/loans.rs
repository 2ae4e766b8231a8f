//! Loans repository for database operations
//!
//! Stock counters on `books` are only touched here, and always with a
//! conditional `UPDATE` inside the same transaction as the loan row change,
//! so two concurrent loans can never both take the last copy.

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanDetails},
};

pub const BOOK_OUT_OF_STOCK: &str = "This book is no longer available in stock";
pub const UNKNOWN_BOOK: &str = "Select a valid book";

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.book_id, b.title AS book_title, l.loan_date, l.return_date
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan with its book title
    pub async fn get_details(&self, id: i32) -> AppResult<LoanDetails> {
        sqlx::query_as::<_, LoanDetails>(&format!("{} WHERE l.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Count all loans
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of loans, most recent first
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} ORDER BY l.loan_date DESC, l.id DESC LIMIT $1 OFFSET $2",
            DETAILS_SELECT
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Lend one copy of `book_id`.
    ///
    /// The stock decrement only succeeds while a copy is on the shelf; when it
    /// does not, nothing is written.
    pub async fn create(
        &self,
        book_id: i32,
        return_date: Option<NaiveDate>,
    ) -> AppResult<LoanDetails> {
        let today = Utc::now().date_naive();
        let mut tx = self.pool.begin().await?;

        let book_title: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            RETURNING title
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(book_title) = book_title else {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            let message = if exists { BOOK_OUT_OF_STOCK } else { UNKNOWN_BOOK };
            return Err(AppError::field("book_id", message));
        };

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, loan_date, return_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(today)
        .bind(return_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LoanDetails {
            id: loan.id,
            book_id: loan.book_id,
            book_title,
            loan_date: loan.loan_date,
            return_date: loan.return_date,
        })
    }

    /// Change the book and return date of a loan. Stock counters are not
    /// adjusted, whatever the transition.
    pub async fn update(
        &self,
        id: i32,
        book_id: i32,
        return_date: Option<NaiveDate>,
    ) -> AppResult<LoanDetails> {
        let result = sqlx::query("UPDATE loans SET book_id = $1, return_date = $2 WHERE id = $3")
            .bind(book_id)
            .bind(return_date)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| match &err {
                // 23503: foreign_key_violation
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                    AppError::field("book_id", UNKNOWN_BOOK)
                }
                _ => AppError::Database(err),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan with id {} not found", id)));
        }

        self.get_details(id).await
    }

    /// Delete a loan. A copy that was still out goes back on the shelf, never
    /// above the book's total.
    pub async fn delete(&self, id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("DELETE FROM loans WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if loan.is_outstanding() {
            sqlx::query(
                r#"
                UPDATE books
                SET available_copies = LEAST(available_copies + 1, total_copies)
                WHERE id = $1
                "#,
            )
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(loan)
    }
}
