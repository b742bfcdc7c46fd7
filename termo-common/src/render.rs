//! Collaborator seams for map rendering and document assembly
//!
//! The service does not rasterize maps or fill docx templates itself;
//! both jobs cross a trait boundary. `MapRenderer` is typically an HTTP
//! client for the map service, `DocumentAssembler` writes the render
//! bundle the templating engine consumes. Tests substitute in-process
//! fakes at the same seams.

use crate::context::ReportContext;
use crate::error::{Error, Result};
use crate::reading::CoordinateMode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Embed size for per-object photos, in centimeters (width, height)
pub const OBJECT_IMAGE_CM: (f64, f64) = (7.5, 6.5);
/// Embed size for the site map, in centimeters (width, height)
pub const MAP_IMAGE_CM: (f64, f64) = (15.0, 10.0);

/// Location and framing for one site map request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub latitude: f64,
    pub longitude: f64,
    pub mode: CoordinateMode,
}

impl MapSpec {
    /// Concrete rendering parameters for this spec's mode
    pub fn params(&self) -> MapRenderParams {
        match self.mode {
            CoordinateMode::Urban => MapRenderParams {
                width: 600,
                height: 400,
                style: MapStyle::Marker {
                    color: "red",
                    radius: 12,
                },
            },
            CoordinateMode::Rural => MapRenderParams {
                width: 900,
                height: 700,
                style: MapStyle::Satellite {
                    buffer_m: 300,
                    zoom: 17,
                },
            },
        }
    }
}

/// Pixel dimensions and style of one rendered map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapRenderParams {
    pub width: u32,
    pub height: u32,
    pub style: MapStyle,
}

/// Rendering style per coordinate mode
///
/// Urban sites get a street map with a point marker; rural sites a wide
/// satellite frame with a buffered area around the coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapStyle {
    Marker { color: &'static str, radius: u32 },
    Satellite { buffer_m: u32, zoom: u8 },
}

/// What happened to the map during a build
///
/// Map failures never fail a report; a skipped map records why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapOutcome {
    Rendered,
    Skipped { reason: String },
}

impl MapOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        MapOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, MapOutcome::Rendered)
    }
}

/// Renders a site map for a coordinate pair
#[async_trait]
pub trait MapRenderer: Send + Sync {
    /// Produce PNG bytes for the given spec
    ///
    /// Failures surface as `Error::MapRendering`; the caller degrades to
    /// a map-less report.
    async fn render(&self, spec: &MapSpec) -> Result<Vec<u8>>;
}

/// Placeholder renderer wired when no map service is configured
///
/// Every request fails with a fixed reason, which the build turns into a
/// skipped-map outcome. Keeps the builder free of an optional-renderer
/// special case.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMapRenderer;

#[async_trait]
impl MapRenderer for DisabledMapRenderer {
    async fn render(&self, _spec: &MapSpec) -> Result<Vec<u8>> {
        Err(Error::MapRendering(
            "map rendering is not configured".to_string(),
        ))
    }
}

/// One image payload destined for the document, with its embed size
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot {
    /// Slot name the template references (`thermal_image_3`, `map`)
    pub name: String,
    pub bytes: Vec<u8>,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl ImageSlot {
    /// Slot for a per-object photo at the standard object embed size
    pub fn object(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            width_cm: OBJECT_IMAGE_CM.0,
            height_cm: OBJECT_IMAGE_CM.1,
        }
    }

    /// Slot for the site map at the standard map embed size
    pub fn map(bytes: Vec<u8>) -> Self {
        Self {
            name: "map".to_string(),
            bytes,
            width_cm: MAP_IMAGE_CM.0,
            height_cm: MAP_IMAGE_CM.1,
        }
    }
}

/// Everything the document collaborator needs to produce one report
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub report_id: Uuid,
    /// Resolved template path, verified to exist
    pub template: PathBuf,
    pub context: ReportContext,
    /// Thermal and context photos, two per object, in object order
    pub images: Vec<ImageSlot>,
    /// Present only when the map collaborator succeeded
    pub map: Option<ImageSlot>,
}

/// Location of an assembled document bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledDocument {
    pub bundle_dir: PathBuf,
    pub context_file: PathBuf,
    /// Template filename the bundle references
    pub template: String,
}

/// Produces the final document artifact from a populated bundle
#[async_trait]
pub trait DocumentAssembler: Send + Sync {
    /// Failures surface as `Error::DocumentAssembly` and fail the build.
    async fn assemble(&self, bundle: &ReportBundle) -> Result<AssembledDocument>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urban_params() {
        let spec = MapSpec {
            latitude: 3.45,
            longitude: -76.53,
            mode: CoordinateMode::Urban,
        };
        let params = spec.params();
        assert_eq!(params.width, 600);
        assert_eq!(params.height, 400);
        assert_eq!(
            params.style,
            MapStyle::Marker {
                color: "red",
                radius: 12
            }
        );
    }

    #[test]
    fn test_rural_params() {
        let spec = MapSpec {
            latitude: 4.2,
            longitude: -75.1,
            mode: CoordinateMode::Rural,
        };
        let params = spec.params();
        assert_eq!(params.width, 900);
        assert_eq!(params.height, 700);
        assert_eq!(
            params.style,
            MapStyle::Satellite {
                buffer_m: 300,
                zoom: 17
            }
        );
    }

    #[test]
    fn test_map_outcome_wire_shape() {
        let rendered = serde_json::to_value(MapOutcome::Rendered).unwrap();
        assert_eq!(rendered, serde_json::json!({ "status": "rendered" }));

        let skipped = serde_json::to_value(MapOutcome::skipped("missing latitude/longitude")).unwrap();
        assert_eq!(
            skipped,
            serde_json::json!({
                "status": "skipped",
                "reason": "missing latitude/longitude"
            })
        );
    }

    #[tokio::test]
    async fn test_disabled_renderer_always_fails() {
        let renderer = DisabledMapRenderer;
        let spec = MapSpec {
            latitude: 3.45,
            longitude: -76.53,
            mode: CoordinateMode::Urban,
        };
        match renderer.render(&spec).await {
            Err(Error::MapRendering(reason)) => {
                assert_eq!(reason, "map rendering is not configured");
            }
            other => panic!("expected MapRendering error, got {:?}", other),
        }
    }

    #[test]
    fn test_image_slot_embed_sizes() {
        let object = ImageSlot::object("thermal_image_1", vec![1, 2, 3]);
        assert_eq!(object.width_cm, 7.5);
        assert_eq!(object.height_cm, 6.5);

        let map = ImageSlot::map(vec![4, 5]);
        assert_eq!(map.name, "map");
        assert_eq!(map.width_cm, 15.0);
        assert_eq!(map.height_cm, 10.0);
    }
}
