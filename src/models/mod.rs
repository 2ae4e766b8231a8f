//! Data models for the catalog

pub mod book;
pub mod loan;
pub mod pagination;

// Re-export commonly used types
pub use book::{Book, BookChoice, BookForm, BookFormInput, StockTotals};
pub use loan::{Loan, LoanDetails, LoanForm, LoanFormInput};
pub use pagination::{Page, PageQuery, PageWindow};
