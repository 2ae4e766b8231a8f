//! Loan management service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookChoice,
        loan::{LoanDetails, LoanFormInput},
        pagination::{Page, PageWindow},
    },
    repository::{
        loans::{BOOK_OUT_OF_STOCK, UNKNOWN_BOOK},
        Repository,
    },
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    page_size: i64,
}

impl LoansService {
    pub fn new(repository: Repository, page_size: i64) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    /// Loans, most recent first, one page at a time
    pub async fn list_loans(&self, page: Option<&str>) -> AppResult<Page<LoanDetails>> {
        let total = self.repository.loans.count().await?;
        let window = PageWindow::resolve(page, total, self.page_size);
        let items = self
            .repository
            .loans
            .list(window.limit(), window.offset())
            .await?;

        Ok(Page { items, window })
    }

    pub async fn get_loan(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(id).await
    }

    /// Books offered on the loan form
    pub async fn book_choices(&self) -> AppResult<Vec<BookChoice>> {
        self.repository.books.list_choices().await
    }

    /// Lend a copy of the selected book
    pub async fn create_loan(&self, input: LoanFormInput) -> AppResult<LoanDetails> {
        let form = input.parse()?;
        match self
            .repository
            .loans
            .create(form.book_id, form.return_date)
            .await
        {
            Ok(loan) => {
                tracing::info!("Loan created id={} book_id={}", loan.id, loan.book_id);
                Ok(loan)
            }
            Err(AppError::Validation(errors)) => {
                tracing::warn!("Loan refused for book_id={}: {:?}", form.book_id, errors);
                Err(AppError::Validation(errors))
            }
            Err(e) => Err(e),
        }
    }

    /// Edit a loan. Stock is never adjusted here, even when the return date
    /// gets set; only moving the loan to another book requires that book to
    /// have a copy on the shelf.
    pub async fn update_loan(&self, id: i32, input: LoanFormInput) -> AppResult<LoanDetails> {
        let current = self.repository.loans.get_by_id(id).await?;
        let form = input.parse()?;

        if form.book_id != current.book_id {
            let book = match self.repository.books.get_by_id(form.book_id).await {
                Ok(book) => book,
                Err(AppError::NotFound(_)) => return Err(AppError::field("book_id", UNKNOWN_BOOK)),
                Err(e) => return Err(e),
            };
            if !book.is_available() {
                tracing::warn!("Loan id={} cannot move to unavailable book_id={}", id, book.id);
                return Err(AppError::field("book_id", BOOK_OUT_OF_STOCK));
            }
        }

        let loan = self
            .repository
            .loans
            .update(id, form.book_id, form.return_date)
            .await?;
        tracing::info!("Loan updated id={} return_date={:?}", loan.id, loan.return_date);
        Ok(loan)
    }

    /// Delete a loan, putting the copy back on the shelf when it was still out
    pub async fn delete_loan(&self, id: i32) -> AppResult<()> {
        let loan = self.repository.loans.delete(id).await?;
        tracing::info!(
            "Loan deleted id={} book_id={} restocked={}",
            loan.id,
            loan.book_id,
            loan.is_outstanding()
        );
        Ok(())
    }
}
