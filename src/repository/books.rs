//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChoice, BookForm, StockTotals},
};

pub const DUPLICATE_ISBN: &str = "A book with this ISBN already exists";
pub const TOTAL_BELOW_AVAILABLE: &str =
    "Total copies cannot be lower than the copies currently on the shelf";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of books ordered by title
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books ORDER BY title, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// All books as selector entries for the loan form
    pub async fn list_choices(&self) -> AppResult<Vec<BookChoice>> {
        let choices = sqlx::query_as::<_, BookChoice>(
            "SELECT id, title, available_copies FROM books ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    /// Whether another book already uses this ISBN
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a new book; every copy starts on the shelf
    pub async fn create(&self, form: &BookForm) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(&form.title)
        .bind(&form.author)
        .bind(&form.isbn)
        .bind(form.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)
    }

    /// Update the descriptive fields and total copies.
    ///
    /// `available_copies` is left untouched.
    pub async fn update(&self, id: i32, form: &BookForm) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, total_copies = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&form.title)
        .bind(&form.author)
        .bind(&form.isbn)
        .bind(form.total_copies)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_violation)?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book; its loans go with it through the foreign key cascade.
    /// Returns the number of loans removed.
    pub async fn delete(&self, id: i32) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;

        let loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        tx.commit().await?;
        Ok(loans)
    }

    /// Copy sums and title counts over the whole catalog
    pub async fn stock_totals(&self) -> AppResult<StockTotals> {
        let totals = sqlx::query_as::<_, StockTotals>(
            r#"
            SELECT COALESCE(SUM(total_copies), 0)::bigint AS total_copies,
                   COALESCE(SUM(available_copies), 0)::bigint AS available_copies,
                   COUNT(*) AS titles,
                   COUNT(*) FILTER (WHERE available_copies = 0) AS out_of_stock
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Author with the most titles; ties go to the author catalogued first
    pub async fn top_author(&self) -> AppResult<Option<String>> {
        let author: Option<String> = sqlx::query_scalar(
            r#"
            SELECT author
            FROM books
            GROUP BY author
            ORDER BY COUNT(*) DESC, MIN(id)
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }
}

fn map_constraint_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::field("isbn", DUPLICATE_ISBN)
        }
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23514") => {
            AppError::field("total_copies", TOTAL_BELOW_AVAILABLE)
        }
        _ => AppError::Database(err),
    }
}
