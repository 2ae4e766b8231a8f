//! Catalog management service

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        book::{Book, BookFormInput},
        pagination::{Page, PageWindow},
    },
    repository::{
        books::{DUPLICATE_ISBN, TOTAL_BELOW_AVAILABLE},
        Repository,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    page_size: i64,
}

impl CatalogService {
    pub fn new(repository: Repository, page_size: i64) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    /// Books ordered by title, one page at a time
    pub async fn list_books(&self, page: Option<&str>) -> AppResult<Page<Book>> {
        let total = self.repository.books.count().await?;
        let window = PageWindow::resolve(page, total, self.page_size);
        let items = self
            .repository
            .books
            .list(window.limit(), window.offset())
            .await?;

        Ok(Page { items, window })
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book with all of its copies available
    pub async fn create_book(&self, input: BookFormInput) -> AppResult<Book> {
        let form = input.parse()?;

        if self.repository.books.isbn_exists(&form.isbn, None).await? {
            return Err(AppError::field("isbn", DUPLICATE_ISBN));
        }

        let book = self.repository.books.create(&form).await?;
        tracing::info!(
            "Book created id={} isbn={} copies={}",
            book.id,
            book.isbn,
            book.total_copies
        );
        Ok(book)
    }

    /// Update an existing book. Available copies are not re-derived from the
    /// new total, but the total may not drop below them.
    pub async fn update_book(&self, id: i32, input: BookFormInput) -> AppResult<Book> {
        let current = self.repository.books.get_by_id(id).await?;
        let form = input.parse()?;

        let mut errors = FieldErrors::new();
        if form.total_copies < current.available_copies {
            errors.add("total_copies", TOTAL_BELOW_AVAILABLE);
        }
        if self.repository.books.isbn_exists(&form.isbn, Some(id)).await? {
            errors.add("isbn", DUPLICATE_ISBN);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let book = self.repository.books.update(id, &form).await?;
        tracing::info!("Book updated id={}", book.id);
        Ok(book)
    }

    /// Delete a book together with all of its loans
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let removed_loans = self.repository.books.delete(id).await?;
        tracing::info!("Book deleted id={} ({} loans removed)", id, removed_loans);
        Ok(())
    }
}
