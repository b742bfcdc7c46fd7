//! Render bundle writer
//!
//! Persists everything the document templating engine needs for one
//! report under `<output_dir>/<report_id>/`:
//!
//! - `context.json`: the populated template context
//! - `images/<slot>`: decoded image payloads, one file per slot
//! - `map.png`: the rendered site map, when one exists
//! - `manifest.json`: file listing with embed sizes and the template
//!   filename the bundle was built against
//!
//! Any filesystem or serialization failure fails the build as a
//! `DocumentAssembly` error.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use termo_common::render::{AssembledDocument, DocumentAssembler, ReportBundle};
use termo_common::{Error, Result};
use tracing::debug;

/// Writes render bundles under a fixed output directory
pub struct BundleAssembler {
    output_dir: PathBuf,
}

/// `manifest.json` contents
#[derive(Debug, Serialize)]
struct BundleManifest {
    report_id: String,
    template: String,
    generated_at: String,
    context_file: String,
    images: Vec<ManifestImage>,
    map: Option<ManifestImage>,
}

/// One image reference within the manifest
#[derive(Debug, Serialize)]
struct ManifestImage {
    slot: String,
    file: String,
    width_cm: f64,
    height_cm: f64,
}

impl BundleAssembler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl DocumentAssembler for BundleAssembler {
    async fn assemble(&self, bundle: &ReportBundle) -> Result<AssembledDocument> {
        let bundle_dir = self.output_dir.join(bundle.report_id.to_string());
        let images_dir = bundle_dir.join("images");
        tokio::fs::create_dir_all(&images_dir)
            .await
            .map_err(|e| write_error("create", &images_dir, e))?;

        let context_file = bundle_dir.join("context.json");
        let context_json = serde_json::to_vec_pretty(&bundle.context)
            .map_err(|e| Error::DocumentAssembly(format!("serialize context: {}", e)))?;
        tokio::fs::write(&context_file, context_json)
            .await
            .map_err(|e| write_error("write", &context_file, e))?;

        let mut images = Vec::with_capacity(bundle.images.len());
        for slot in &bundle.images {
            let file = images_dir.join(&slot.name);
            tokio::fs::write(&file, &slot.bytes)
                .await
                .map_err(|e| write_error("write", &file, e))?;
            images.push(ManifestImage {
                slot: slot.name.clone(),
                file: format!("images/{}", slot.name),
                width_cm: slot.width_cm,
                height_cm: slot.height_cm,
            });
        }

        let map = match &bundle.map {
            Some(slot) => {
                let file = bundle_dir.join("map.png");
                tokio::fs::write(&file, &slot.bytes)
                    .await
                    .map_err(|e| write_error("write", &file, e))?;
                Some(ManifestImage {
                    slot: slot.name.clone(),
                    file: "map.png".to_string(),
                    width_cm: slot.width_cm,
                    height_cm: slot.height_cm,
                })
            }
            None => None,
        };

        let template = template_filename(&bundle.template)?;
        let manifest = BundleManifest {
            report_id: bundle.report_id.to_string(),
            template: template.clone(),
            generated_at: Utc::now().to_rfc3339(),
            context_file: "context.json".to_string(),
            images,
            map,
        };
        let manifest_file = bundle_dir.join("manifest.json");
        let manifest_json = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| Error::DocumentAssembly(format!("serialize manifest: {}", e)))?;
        tokio::fs::write(&manifest_file, manifest_json)
            .await
            .map_err(|e| write_error("write", &manifest_file, e))?;

        debug!("Bundle written to {}", bundle_dir.display());
        Ok(AssembledDocument {
            bundle_dir,
            context_file,
            template,
        })
    }
}

fn template_filename(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            Error::DocumentAssembly(format!("template path {} has no filename", path.display()))
        })
}

fn write_error(action: &str, path: &Path, err: std::io::Error) -> Error {
    Error::DocumentAssembly(format!("{} {}: {}", action, path.display(), err))
}
