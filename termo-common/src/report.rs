//! Report build orchestration
//!
//! `ReportBuilder` drives one submission through the whole pipeline:
//! validation, template resolution, image decoding, delta diagnostics,
//! context assembly, the map collaborator, and finally the document
//! collaborator. Everything up to the collaborators is all-or-nothing;
//! no collaborator runs until the full report has validated and every
//! object's diagnostics exist.
//!
//! The map is the one graceful degradation: absent, zeroed, or invalid
//! coordinates and map-service failures all downgrade to a map-less
//! report with a recorded skip reason. A document-collaborator failure
//! fails the build.

use crate::context::assemble_context;
use crate::diagnostics::{build_report_diagnostics, normalize_number, DeltaResult, NormalizeError};
use crate::error::{Error, Result};
use crate::reading::{ProjectInfo, ReportSubmission};
use crate::render::{
    AssembledDocument, DocumentAssembler, ImageSlot, MapOutcome, MapRenderer, MapSpec,
    ReportBundle,
};
use crate::template::resolve_template;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates report builds against the configured collaborators
pub struct ReportBuilder {
    templates_dir: PathBuf,
    template_pattern: String,
    map_renderer: Arc<dyn MapRenderer>,
    assembler: Arc<dyn DocumentAssembler>,
}

/// Result of one successful build
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub report_id: Uuid,
    pub object_count: usize,
    pub diagnostics: Vec<DeltaResult>,
    pub map: MapOutcome,
    pub document: AssembledDocument,
}

impl ReportBuilder {
    pub fn new(
        templates_dir: impl Into<PathBuf>,
        template_pattern: impl Into<String>,
        map_renderer: Arc<dyn MapRenderer>,
        assembler: Arc<dyn DocumentAssembler>,
    ) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            template_pattern: template_pattern.into(),
            map_renderer,
            assembler,
        }
    }

    /// Build one report
    ///
    /// `generation_date` feeds the report's date line; callers pass the
    /// current local date. Returns the first validation error without
    /// producing any output.
    pub async fn build(
        &self,
        submission: ReportSubmission,
        generation_date: NaiveDate,
    ) -> Result<ReportOutput> {
        let submission = submission.with_object_indices();
        submission.validate()?;

        let report_id = Uuid::new_v4();
        let object_count = submission.object_count();
        info!(
            "Building report {} with {} object(s)",
            report_id, object_count
        );

        let template = resolve_template(&self.templates_dir, &self.template_pattern, object_count)?;

        let mut images = Vec::with_capacity(object_count * 2);
        for object in &submission.objects {
            let decoded = object.decode_images()?;
            images.push(ImageSlot::object(
                format!("thermal_image_{}", object.index),
                decoded.thermal,
            ));
            images.push(ImageSlot::object(
                format!("context_image_{}", object.index),
                decoded.context,
            ));
        }

        let diagnostics = build_report_diagnostics(&submission.objects)?;
        let context = assemble_context(
            &submission.project,
            &submission.objects,
            &diagnostics,
            generation_date,
        );

        let (map_image, map_outcome) = self.render_map(report_id, &submission.project).await;

        let bundle = ReportBundle {
            report_id,
            template,
            context,
            images,
            map: map_image,
        };
        let document = self.assembler.assemble(&bundle).await?;

        info!(
            "Report {} assembled at {}",
            report_id,
            document.bundle_dir.display()
        );
        Ok(ReportOutput {
            report_id,
            object_count,
            diagnostics,
            map: map_outcome,
            document,
        })
    }

    async fn render_map(
        &self,
        report_id: Uuid,
        project: &ProjectInfo,
    ) -> (Option<ImageSlot>, MapOutcome) {
        let spec = match map_spec(project) {
            Ok(Some(spec)) => spec,
            Ok(None) => {
                let reason = "missing latitude/longitude";
                warn!("Map skipped for report {}: {}", report_id, reason);
                return (None, MapOutcome::skipped(reason));
            }
            Err(reason) => {
                warn!("Map skipped for report {}: {}", report_id, reason);
                return (None, MapOutcome::skipped(reason));
            }
        };

        match self.map_renderer.render(&spec).await {
            Ok(bytes) => (Some(ImageSlot::map(bytes)), MapOutcome::Rendered),
            Err(e) => {
                let reason = match e {
                    Error::MapRendering(inner) => format!("map rendering failed: {}", inner),
                    other => format!("map rendering failed: {}", other),
                };
                warn!("Map skipped for report {}: {}", report_id, reason);
                (None, MapOutcome::skipped(reason))
            }
        }
    }
}

/// Derive the map spec from project coordinates, if usable
///
/// `Ok(None)` means no map for an unremarkable reason (coordinates never
/// entered, or left at the widget's zero resting value). `Err` carries
/// the skip reason for coordinates that were entered but do not parse.
/// Neither case fails the build.
fn map_spec(project: &ProjectInfo) -> std::result::Result<Option<MapSpec>, String> {
    let latitude = coordinate(project.latitude.as_ref(), "latitude")?;
    let longitude = coordinate(project.longitude.as_ref(), "longitude")?;
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Ok(Some(MapSpec {
            latitude,
            longitude,
            mode: project.coordinate_mode,
        })),
        _ => Ok(None),
    }
}

fn coordinate(
    value: Option<&crate::fields::RawValue>,
    name: &str,
) -> std::result::Result<Option<f64>, String> {
    match normalize_number(value) {
        // Zero is the coordinate widget's resting value, meaning unset
        Ok(v) if v == 0.0 => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(NormalizeError::Missing) => Ok(None),
        Err(NormalizeError::Malformed(raw)) => Err(format!("invalid {} '{}'", name, raw)),
    }
}
