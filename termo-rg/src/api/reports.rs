//! Report generation endpoint

use axum::{extract::State, Json};
use chrono::Local;
use serde::Serialize;
use termo_common::diagnostics::DeltaResult;
use termo_common::reading::ReportSubmission;
use termo_common::render::{AssembledDocument, MapOutcome};
use termo_common::report::ReportOutput;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::AppState;

/// Successful build response
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_id: Uuid,
    pub object_count: usize,
    pub diagnostics: Vec<ObjectDiagnostics>,
    pub map: MapOutcome,
    pub document: DocumentLocation,
}

/// Per-object diagnostics as returned to the client
#[derive(Debug, Serialize)]
pub struct ObjectDiagnostics {
    pub object_index: usize,
    pub deltas: Vec<DeltaEntry>,
}

/// One classified delta, flattened for the wire
#[derive(Debug, Serialize)]
pub struct DeltaEntry {
    /// Phase pair name ("R-S", "S-T", "T-R")
    pub pair: String,
    pub signed: f64,
    pub magnitude: f64,
    pub label: String,
    pub action: String,
    pub display: String,
}

/// Where the assembled bundle landed
#[derive(Debug, Serialize)]
pub struct DocumentLocation {
    pub bundle_dir: String,
    pub context_file: String,
    pub template: String,
}

impl ReportResponse {
    fn from_output(output: ReportOutput) -> Self {
        Self {
            report_id: output.report_id,
            object_count: output.object_count,
            diagnostics: output
                .diagnostics
                .iter()
                .map(ObjectDiagnostics::from_result)
                .collect(),
            map: output.map,
            document: DocumentLocation::from_document(&output.document),
        }
    }
}

impl ObjectDiagnostics {
    fn from_result(result: &DeltaResult) -> Self {
        Self {
            object_index: result.object_index,
            deltas: result
                .deltas
                .iter()
                .map(|d| DeltaEntry {
                    pair: d.pair.display_name().to_string(),
                    signed: d.signed,
                    magnitude: d.magnitude,
                    label: d.severity.label().to_string(),
                    action: d.severity.action().to_string(),
                    display: d.display_string(),
                })
                .collect(),
        }
    }
}

impl DocumentLocation {
    fn from_document(document: &AssembledDocument) -> Self {
        Self {
            bundle_dir: document.bundle_dir.to_string_lossy().to_string(),
            context_file: document.context_file.to_string_lossy().to_string(),
            template: document.template.clone(),
        }
    }
}

/// POST /api/reports
///
/// Runs the full pipeline for one submission and returns the derived
/// diagnostics, the map outcome, and the bundle location. Validation
/// and pipeline errors surface through `ApiError` with the object and
/// field that stopped the build.
pub async fn create_report(
    State(state): State<AppState>,
    Json(submission): Json<ReportSubmission>,
) -> ApiResult<Json<ReportResponse>> {
    let generation_date = Local::now().date_naive();
    let output = state.builder.build(submission, generation_date).await?;
    Ok(Json(ReportResponse::from_output(output)))
}
