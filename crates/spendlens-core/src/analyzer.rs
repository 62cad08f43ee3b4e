//! Expense analysis
//!
//! Turns a validated batch of expenses and categories into an
//! [`AnalysisResult`]: total spend, per-category breakdown, monthly trend,
//! budget status and descriptive statistics. Every call is independent and
//! allocates its own result.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    AnalysisResult, BudgetStatus, Category, CategoryBreakdown, CategoryId, Expense, MonthlyAmount,
};
use crate::stats;

/// Computes expense summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseAnalyzer;

impl ExpenseAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a batch of expenses against a list of categories.
    ///
    /// The whole batch is rejected with [`Error::InvalidInput`] if any amount
    /// or budget is negative or not a finite number, or if the totals overflow.
    pub fn analyze(&self, expenses: &[Expense], categories: &[Category]) -> Result<AnalysisResult> {
        validate(expenses, categories)?;

        let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
        // Category and month sums never exceed the total
        if !total_spent.is_finite() {
            return Err(Error::invalid_input(
                "expenses: total exceeds representable range",
            ));
        }

        let spent_by_category = sum_by_category(expenses);
        let spent_for = |id: &CategoryId| spent_by_category.get(id).copied().unwrap_or(0.0);

        let category_breakdown = categories
            .iter()
            .filter_map(|category| {
                let total_amount = spent_for(&category.id);
                (total_amount > 0.0).then(|| CategoryBreakdown {
                    category_id: category.id.clone(),
                    total_amount,
                    percentage: percent_of(total_amount, total_spent),
                })
            })
            .collect();

        let budget_status = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let spent = spent_for(&category.id);
                let percentage = percent_of(spent, category.budget);
                if !percentage.is_finite() {
                    return Err(Error::invalid_input(format!(
                        "categories[{}]: budget percentage exceeds representable range",
                        i
                    )));
                }
                Ok(BudgetStatus {
                    category_id: category.id.clone(),
                    spent,
                    budget: category.budget,
                    percentage,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let amounts: Vec<f64> = expenses.iter().map(|e| e.amount).collect();

        let result = AnalysisResult {
            total_spent,
            category_breakdown,
            monthly_trend: monthly_trend(expenses),
            budget_status,
            stats: stats::describe(&amounts),
        };

        debug!(
            expenses = expenses.len(),
            categories = categories.len(),
            months = result.monthly_trend.len(),
            total_spent = result.total_spent,
            "Analyzed expense batch"
        );

        Ok(result)
    }
}

/// Analyze with a default [`ExpenseAnalyzer`]
pub fn analyze(expenses: &[Expense], categories: &[Category]) -> Result<AnalysisResult> {
    ExpenseAnalyzer::new().analyze(expenses, categories)
}

fn validate(expenses: &[Expense], categories: &[Category]) -> Result<()> {
    for (i, expense) in expenses.iter().enumerate() {
        check_money(expense.amount, || format!("expenses[{}]: amount", i))?;
    }
    for (i, category) in categories.iter().enumerate() {
        check_money(category.budget, || format!("categories[{}]: budget", i))?;
    }
    Ok(())
}

fn check_money(value: f64, field: impl FnOnce() -> String) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid_input(format!(
            "{} must be a finite number",
            field()
        )));
    }
    if value < 0.0 {
        return Err(Error::invalid_input(format!(
            "{} must not be negative (got {})",
            field(),
            value
        )));
    }
    Ok(())
}

/// Single pass over expenses; unknown categories are summed too but never looked up
fn sum_by_category(expenses: &[Expense]) -> HashMap<&CategoryId, f64> {
    let mut sums: HashMap<&CategoryId, f64> = HashMap::new();
    for expense in expenses {
        *sums.entry(&expense.category_id).or_insert(0.0) += expense.amount;
    }
    sums
}

/// Per-month totals, ordered by (year, month) rather than by label
fn monthly_trend(expenses: &[Expense]) -> Vec<MonthlyAmount> {
    let mut months: BTreeMap<(i32, u32), (NaiveDate, f64)> = BTreeMap::new();
    for expense in expenses {
        let key = (expense.date.year(), expense.date.month());
        months.entry(key).or_insert((expense.date, 0.0)).1 += expense.amount;
    }

    months
        .into_values()
        .map(|(date, amount)| MonthlyAmount {
            month: date.format("%b %Y").to_string(),
            amount,
        })
        .collect()
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
