//! SpendLens Core Library
//!
//! Expense analytics for the SpendLens service:
//! - Input validation for JSON request bodies and CSV exports
//! - Expense analysis (totals, category breakdown, monthly trend, budget status)
//! - Descriptive statistics over expense amounts
//!
//! Everything here is synchronous and free of I/O beyond the readers handed
//! to the CSV functions, so it can be called from any thread or runtime.

pub mod analyzer;
pub mod error;
pub mod input;
pub mod models;
pub mod stats;

pub use analyzer::{analyze, ExpenseAnalyzer};
pub use error::{Error, Result};
pub use input::{parse_date, read_categories_csv, read_expenses_csv, AnalysisRequest};
pub use models::{
    AnalysisResult, BudgetStatus, Category, CategoryBreakdown, CategoryId, Expense, ExpenseStats,
    MonthlyAmount,
};
