//! Data models for SpendLens

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier shared by expenses (`categoryId`) and categories (`id`)
///
/// Integers and strings are distinct: `1` never matches `"1"`. The input
/// form is echoed back in the analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A single spending transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub category_id: CategoryId,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(category_id: impl Into<CategoryId>, amount: f64, date: NaiveDate) -> Self {
        Self {
            category_id: category_id.into(),
            amount,
            date,
        }
    }
}

/// A budget bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub budget: f64,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, budget: f64) -> Self {
        Self {
            id: id.into(),
            budget,
        }
    }
}

/// Share of total spend for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: CategoryId,
    pub total_amount: f64,
    pub percentage: f64,
}

/// Spend for one calendar month, labelled like "Mar 2024"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAmount {
    pub month: String,
    pub amount: f64,
}

/// Spend against budget for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category_id: CategoryId,
    pub spent: f64,
    pub budget: f64,
    pub percentage: f64,
}

impl BudgetStatus {
    pub fn is_over_budget(&self) -> bool {
        self.budget > 0.0 && self.spent > self.budget
    }
}

/// Descriptive statistics over expense amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
}

/// Full analysis of an expense batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub total_spent: f64,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub monthly_trend: Vec<MonthlyAmount>,
    pub budget_status: Vec<BudgetStatus>,
    pub stats: ExpenseStats,
}
