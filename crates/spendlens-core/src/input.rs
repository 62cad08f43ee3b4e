//! Input boundary
//!
//! Converts loosely-typed records (a JSON request body or CSV exports) into
//! [`Expense`] and [`Category`] values. Validation happens once, here, and any
//! malformed record rejects the whole batch with [`Error::InvalidInput`]
//! naming the record and field.
//!
//! Unknown fields are ignored. Accepted date formats:
//! - `2024-01-15`
//! - RFC 3339 timestamps (`2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+02:00`),
//!   using the calendar date in the timestamp's own offset
//! - naive timestamps (`2024-01-15T10:30:00`, `2024-01-15 10:30:00.250`)

use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::analyzer::analyze;
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, Category, CategoryId, Expense};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A validated analysis batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRequest {
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
}

impl AnalysisRequest {
    pub fn new(expenses: Vec<Expense>, categories: Vec<Category>) -> Self {
        Self {
            expenses,
            categories,
        }
    }

    /// Parse a raw request body of the form `{"expenses": [...], "categories": [...]}`
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::invalid_input(format!("request body is not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Validate an already-parsed JSON document
    ///
    /// A missing or null `expenses`/`categories` key is treated as an empty list.
    pub fn from_value(value: &Value) -> Result<Self> {
        let body = value
            .as_object()
            .ok_or_else(|| Error::invalid_input("request body must be a JSON object"))?;

        let expenses = records(body, "expenses")?
            .iter()
            .enumerate()
            .map(|(i, record)| expense_from_value(i, record))
            .collect::<Result<Vec<_>>>()?;

        let categories = records(body, "categories")?
            .iter()
            .enumerate()
            .map(|(i, record)| category_from_value(i, record))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(expenses, categories))
    }

    pub fn analyze(&self) -> Result<AnalysisResult> {
        analyze(&self.expenses, &self.categories)
    }
}

fn records<'a>(body: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(Error::invalid_input(format!("'{}' must be an array", key))),
    }
}

fn expense_from_value(index: usize, record: &Value) -> Result<Expense> {
    let ctx = format!("expenses[{}]", index);
    let fields = as_record(&ctx, record)?;

    let category_id = id_from_value(&ctx, "categoryId", required(&ctx, fields, "categoryId")?)?;
    let amount = number_from_value(&ctx, "amount", required(&ctx, fields, "amount")?)?;
    let date = match required(&ctx, fields, "date")? {
        Value::String(raw) => parse_date(raw).ok_or_else(|| {
            Error::invalid_input(format!("{}: unparseable date '{}'", ctx, raw))
        })?,
        _ => {
            return Err(Error::invalid_input(format!(
                "{}: field 'date' must be a string",
                ctx
            )))
        }
    };

    Ok(Expense {
        category_id,
        amount,
        date,
    })
}

fn category_from_value(index: usize, record: &Value) -> Result<Category> {
    let ctx = format!("categories[{}]", index);
    let fields = as_record(&ctx, record)?;

    Ok(Category {
        id: id_from_value(&ctx, "id", required(&ctx, fields, "id")?)?,
        budget: number_from_value(&ctx, "budget", required(&ctx, fields, "budget")?)?,
    })
}

fn as_record<'a>(ctx: &str, record: &'a Value) -> Result<&'a Map<String, Value>> {
    record
        .as_object()
        .ok_or_else(|| Error::invalid_input(format!("{}: expected an object", ctx)))
}

fn required<'a>(ctx: &str, fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(Error::invalid_input(format!(
            "{}: missing field '{}'",
            ctx, name
        ))),
        Some(value) => Ok(value),
    }
}

fn id_from_value(ctx: &str, name: &str, value: &Value) -> Result<CategoryId> {
    match value {
        Value::String(s) => Ok(CategoryId::Text(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64))
            .map(CategoryId::Number)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "{}: field '{}' must be an integer or string",
                    ctx, name
                ))
            }),
        _ => Err(Error::invalid_input(format!(
            "{}: field '{}' must be an integer or string",
            ctx, name
        ))),
    }
}

/// `1.0` is the same identifier as `1`
fn integral_f64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn number_from_value(ctx: &str, name: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        Error::invalid_input(format!("{}: field '{}' must be numeric", ctx, name))
    })
}

/// Parse a calendar date from any of the accepted formats
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ts| ts.date())
}

// ============================================================================
// CSV input
// ============================================================================

/// Read expenses from CSV with header columns `categoryId,amount,date`
///
/// Column order is free and extra columns are ignored.
pub fn read_expenses_csv<R: Read>(reader: R) -> Result<Vec<Expense>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let category_col = column(&headers, "expenses", "categoryId")?;
    let amount_col = column(&headers, "expenses", "amount")?;
    let date_col = column(&headers, "expenses", "date")?;

    let mut expenses = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let ctx = format!("expenses[{}]", i);

        let category_id = id_from_str(cell(&ctx, &row, category_col, "categoryId")?);
        let amount = number_from_str(&ctx, "amount", cell(&ctx, &row, amount_col, "amount")?)?;
        let raw_date = cell(&ctx, &row, date_col, "date")?;
        let date = parse_date(raw_date).ok_or_else(|| {
            Error::invalid_input(format!("{}: unparseable date '{}'", ctx, raw_date))
        })?;

        expenses.push(Expense {
            category_id,
            amount,
            date,
        });
    }

    Ok(expenses)
}

/// Read categories from CSV with header columns `id,budget`
pub fn read_categories_csv<R: Read>(reader: R) -> Result<Vec<Category>> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let id_col = column(&headers, "categories", "id")?;
    let budget_col = column(&headers, "categories", "budget")?;

    let mut categories = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let ctx = format!("categories[{}]", i);

        categories.push(Category {
            id: id_from_str(cell(&ctx, &row, id_col, "id")?),
            budget: number_from_str(&ctx, "budget", cell(&ctx, &row, budget_col, "budget")?)?,
        });
    }

    Ok(categories)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn column(headers: &csv::StringRecord, what: &str, name: &str) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        Error::invalid_input(format!("{} CSV: missing column '{}'", what, name))
    })
}

fn cell<'a>(ctx: &str, row: &'a csv::StringRecord, idx: usize, name: &str) -> Result<&'a str> {
    match row.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::invalid_input(format!(
            "{}: missing field '{}'",
            ctx, name
        ))),
    }
}

/// Only canonical integers become numeric ids; "007" and "+7" stay text
fn id_from_str(raw: &str) -> CategoryId {
    match raw.parse::<i64>() {
        Ok(n) if n.to_string() == raw => CategoryId::Number(n),
        _ => CategoryId::Text(raw.to_string()),
    }
}

fn number_from_str(ctx: &str, name: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| {
        Error::invalid_input(format!(
            "{}: field '{}' must be numeric (got '{}')",
            ctx, name, raw
        ))
    })
}
