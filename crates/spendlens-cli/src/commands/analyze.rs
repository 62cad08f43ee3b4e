//! Analyze command implementation

use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use spendlens_core::{read_categories_csv, read_expenses_csv, AnalysisRequest, AnalysisResult};
use tracing::info;

use super::truncate;

/// Where an expense batch comes from
#[derive(Debug, Clone, Copy)]
pub enum AnalysisSource<'a> {
    /// A JSON request body: {"expenses": [...], "categories": [...]}
    Json(&'a Path),
    /// CSV exports; categories are optional
    Csv {
        expenses: &'a Path,
        categories: Option<&'a Path>,
    },
}

/// Read and validate an expense batch
pub fn load_request(source: &AnalysisSource) -> Result<AnalysisRequest> {
    match *source {
        AnalysisSource::Json(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            AnalysisRequest::from_json_slice(&bytes)
                .with_context(|| format!("Invalid expense batch in {}", path.display()))
        }
        AnalysisSource::Csv {
            expenses,
            categories,
        } => {
            let file = File::open(expenses)
                .with_context(|| format!("Failed to open {}", expenses.display()))?;
            let expenses_list = read_expenses_csv(file)
                .with_context(|| format!("Invalid expenses in {}", expenses.display()))?;

            let categories_list = match categories {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    read_categories_csv(file)
                        .with_context(|| format!("Invalid categories in {}", path.display()))?
                }
                None => Vec::new(),
            };

            Ok(AnalysisRequest::new(expenses_list, categories_list))
        }
    }
}

pub fn cmd_analyze(source: &AnalysisSource, json: bool, output: Option<&Path>) -> Result<()> {
    let request = load_request(source)?;
    info!(
        expenses = request.expenses.len(),
        categories = request.categories.len(),
        "Loaded expense batch"
    );

    let result = request.analyze().context("Analysis failed")?;

    if let Some(path) = output {
        let pretty = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, pretty)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote analysis to {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_report(&result));
    }

    Ok(())
}

/// Render the terminal report for an analysis result
pub fn render_report(result: &AnalysisResult) -> String {
    // Writing into a String cannot fail
    let mut out = String::new();
    let rule = "   ─────────────────────────────────────────────────────────────";

    let _ = writeln!(out);
    let _ = writeln!(out, "📊 Expense Analysis");
    let _ = writeln!(out, "{}", rule);

    if result.stats.count == 0 {
        let _ = writeln!(out, "   No expenses to analyze.");
        return out;
    }

    let stats = &result.stats;
    let _ = writeln!(out, "   Total spent: ${:.2}", result.total_spent);
    let _ = writeln!(
        out,
        "   Expenses:    {} (min ${:.2}, max ${:.2}, avg ${:.2}, median ${:.2})",
        stats.count, stats.min, stats.max, stats.avg, stats.median
    );

    if !result.category_breakdown.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "   {:20} │ {:>10} │ {:>6}", "Category", "Amount", "%");
        let _ = writeln!(out, "   ─────────────────────┼────────────┼───────");
        for entry in &result.category_breakdown {
            let _ = writeln!(
                out,
                "   {:20} │ {:>10.2} │ {:>5.1}%",
                truncate(&entry.category_id.to_string(), 20),
                entry.total_amount,
                entry.percentage
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "   📈 Monthly trend");
    for point in &result.monthly_trend {
        let _ = writeln!(out, "   {:10} │ {:>10.2}", point.month, point.amount);
    }

    if !result.budget_status.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "   {:20} │ {:>10} │ {:>10} │ {:>7}",
            "Budget", "Spent", "Limit", "Used"
        );
        let _ = writeln!(out, "   ─────────────────────┼────────────┼────────────┼─────────");
        for status in &result.budget_status {
            let marker = if status.is_over_budget() { " ⚠️" } else { "" };
            let _ = writeln!(
                out,
                "   {:20} │ {:>10.2} │ {:>10.2} │ {:>6.1}%{}",
                truncate(&status.category_id.to_string(), 20),
                status.spent,
                status.budget,
                status.percentage,
                marker
            );
        }
    }

    let over = result
        .budget_status
        .iter()
        .filter(|s| s.is_over_budget())
        .count();
    if over > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "   ⚠️  {} categor{} over budget", over, if over == 1 { "y" } else { "ies" });
    }

    out
}
