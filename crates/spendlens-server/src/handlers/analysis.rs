//! Expense analysis handler

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use tracing::{debug, warn};

use crate::{AppError, AppState};
use spendlens_core::{AnalysisRequest, AnalysisResult};

/// POST /analyze-expenses (also POST /api/analyze) - Analyze an expense batch
///
/// Body: `{"expenses": [...], "categories": [...]}`. The body is read as raw
/// bytes so that malformed JSON gets the same 400 response shape as a
/// malformed record.
pub async fn analyze_expenses(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = AnalysisRequest::from_json_slice(&body).and_then(|request| {
        state
            .analyzer
            .analyze(&request.expenses, &request.categories)
    });

    match result {
        Ok(result) => {
            debug!(
                months = result.monthly_trend.len(),
                count = result.stats.count,
                "Expense batch analyzed"
            );
            Ok(Json(result))
        }
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "Rejected expense batch");
            Err(e.into())
        }
    }
}
