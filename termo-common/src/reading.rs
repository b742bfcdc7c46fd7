//! Inspection submission data model
//!
//! A `ReportSubmission` is the complete payload captured by the inspection
//! form: project-level metadata plus one `ObjectReading` per inspected
//! object. Project text fields and the two dates are hard requirements;
//! per-object fields stay optional at intake so the diagnostics engine can
//! report exactly which object and field blocks the report.

use crate::error::{Error, Result};
use crate::fields::RawValue;
use crate::template::{MAX_OBJECTS, MIN_OBJECTS};
use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Map framing selected for the project location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// Street-level frame with a point marker
    #[default]
    Urban,
    /// Wide satellite frame with a buffered area
    Rural,
}

impl CoordinateMode {
    /// Human-readable mode name as printed in the report
    pub fn display_name(&self) -> &'static str {
        match self {
            CoordinateMode::Urban => "Urban",
            CoordinateMode::Rural => "Rural",
        }
    }
}

impl std::fmt::Display for CoordinateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Project-level metadata shared by every page of the report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub project_name: String,
    pub city: String,
    pub department: String,
    pub address: String,
    pub coordinate_mode: CoordinateMode,
    /// Location for the site map. Optional: a report without usable
    /// coordinates is still produced, only the map is skipped.
    pub latitude: Option<RawValue>,
    pub longitude: Option<RawValue>,
    pub engineer_name: String,
    pub license_number: String,
    pub job_title: String,
    pub creation_date: Option<NaiveDate>,
    pub image_date: Option<NaiveDate>,
}

impl ProjectInfo {
    /// Check that every required project field was filled in
    ///
    /// Mirrors the capture form's first-page gate: report generation never
    /// starts while any of these is blank.
    pub fn validate(&self) -> Result<()> {
        required_text("project_name", &self.project_name)?;
        required_text("city", &self.city)?;
        required_text("department", &self.department)?;
        required_text("address", &self.address)?;
        required_text("engineer_name", &self.engineer_name)?;
        required_text("license_number", &self.license_number)?;
        required_text("job_title", &self.job_title)?;
        if self.creation_date.is_none() {
            return Err(Error::MissingField {
                field: "creation_date".to_string(),
            });
        }
        if self.image_date.is_none() {
            return Err(Error::MissingField {
                field: "image_date".to_string(),
            });
        }
        Ok(())
    }
}

fn required_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// All data captured for one inspected object
///
/// `index` is the 1-based position within the submission, assigned at
/// intake; it keys the object's entries in the rendering context and
/// identifies the object in validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectReading {
    #[serde(skip)]
    pub index: usize,
    pub equipment_name: String,
    pub brand: String,
    pub evaluated_object: String,
    /// Thermal camera capture, base64-encoded
    pub thermal_image: Option<String>,
    /// Visible-light context photo, base64-encoded
    pub context_image: Option<String>,
    pub max_temp: Option<RawValue>,
    pub min_temp: Option<RawValue>,
    pub avg_thermal_temp: Option<RawValue>,
    pub emissivity: Option<RawValue>,
    pub background_object_temp: Option<RawValue>,
    pub background_temp: Option<RawValue>,
    pub std_deviation: Option<RawValue>,
    pub delta_t: Option<RawValue>,
    pub phase_temp_r: Option<RawValue>,
    pub phase_temp_s: Option<RawValue>,
    pub phase_temp_t: Option<RawValue>,
    pub conclusions: String,
}

/// Decoded image pair for one object
#[derive(Debug, Clone)]
pub struct DecodedImages {
    pub thermal: Vec<u8>,
    pub context: Vec<u8>,
}

impl ObjectReading {
    /// Decode both object images from their base64 payloads
    ///
    /// A missing or blank payload is reported as a missing critical field;
    /// payload that is present but not valid base64 is reported separately
    /// so the form can distinguish "not uploaded" from "upload corrupted".
    pub fn decode_images(&self) -> Result<DecodedImages> {
        let thermal =
            decode_image_field(self.index, "thermal_image", self.thermal_image.as_deref())?;
        let context =
            decode_image_field(self.index, "context_image", self.context_image.as_deref())?;
        Ok(DecodedImages { thermal, context })
    }
}

fn decode_image_field(
    object_index: usize,
    field: &'static str,
    payload: Option<&str>,
) -> Result<Vec<u8>> {
    let payload = match payload {
        Some(p) if !p.trim().is_empty() => p.trim(),
        _ => {
            return Err(Error::MissingCriticalField {
                object_index,
                field,
            })
        }
    };
    general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| Error::InvalidImagePayload {
            object_index,
            field,
        })
}

/// Complete inspection submission from the capture form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSubmission {
    pub project: ProjectInfo,
    pub objects: Vec<ObjectReading>,
}

impl ReportSubmission {
    /// Number of inspected objects in this submission
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Assign 1-based object indices from submission order
    ///
    /// Called once at intake; every later stage relies on `index` being set.
    pub fn with_object_indices(mut self) -> Self {
        for (i, object) in self.objects.iter_mut().enumerate() {
            object.index = i + 1;
        }
        self
    }

    /// Validate project fields and the object count bounds
    pub fn validate(&self) -> Result<()> {
        self.project.validate()?;
        let count = self.objects.len();
        if !(MIN_OBJECTS..=MAX_OBJECTS).contains(&count) {
            return Err(Error::UnsupportedObjectCount(count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_project() -> ProjectInfo {
        ProjectInfo {
            project_name: "Substation North".to_string(),
            city: "Bogota".to_string(),
            department: "Cundinamarca".to_string(),
            address: "Cra 7 # 12-34".to_string(),
            coordinate_mode: CoordinateMode::Urban,
            latitude: Some(RawValue::from(4.6097)),
            longitude: Some(RawValue::from(-74.0817)),
            engineer_name: "Ada Robledo".to_string(),
            license_number: "CN205-55430".to_string(),
            job_title: "Electrical Engineer".to_string(),
            creation_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            image_date: NaiveDate::from_ymd_opt(2024, 3, 10),
        }
    }

    fn minimal_object() -> ObjectReading {
        ObjectReading {
            index: 1,
            equipment_name: "Main breaker".to_string(),
            thermal_image: Some(general_purpose::STANDARD.encode(b"thermal-bytes")),
            context_image: Some(general_purpose::STANDARD.encode(b"context-bytes")),
            avg_thermal_temp: Some(RawValue::from(28.0)),
            phase_temp_r: Some(RawValue::from(30.0)),
            phase_temp_s: Some(RawValue::from(25.0)),
            phase_temp_t: Some(RawValue::from(22.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_submission_deserializes_with_sparse_objects() {
        let payload = serde_json::json!({
            "project": {
                "project_name": "Substation North",
                "city": "Bogota",
                "coordinate_mode": "rural"
            },
            "objects": [
                { "equipment_name": "Main breaker", "phase_temp_r": 30.0 },
                { "phase_temp_s": "25,1" }
            ]
        });

        let submission: ReportSubmission = serde_json::from_value(payload).unwrap();
        assert_eq!(submission.object_count(), 2);
        assert_eq!(submission.project.coordinate_mode, CoordinateMode::Rural);
        assert!(submission.project.latitude.is_none());
        assert_eq!(
            submission.objects[1].phase_temp_s,
            Some(RawValue::from("25,1"))
        );
        assert!(submission.objects[0].thermal_image.is_none());
    }

    #[test]
    fn test_with_object_indices_is_one_based() {
        let submission = ReportSubmission {
            project: filled_project(),
            objects: vec![ObjectReading::default(), ObjectReading::default()],
        }
        .with_object_indices();

        assert_eq!(submission.objects[0].index, 1);
        assert_eq!(submission.objects[1].index, 2);
    }

    #[test]
    fn test_project_validation_names_blank_field() {
        let mut project = filled_project();
        project.city = "   ".to_string();

        match project.validate() {
            Err(Error::MissingField { field }) => assert_eq!(field, "city"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_project_validation_requires_dates() {
        let mut project = filled_project();
        project.image_date = None;

        match project.validate() {
            Err(Error::MissingField { field }) => assert_eq!(field, "image_date"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_project_without_coordinates_still_validates() {
        let mut project = filled_project();
        project.latitude = None;
        project.longitude = None;
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_submission_validation_bounds_object_count() {
        let empty = ReportSubmission {
            project: filled_project(),
            objects: Vec::new(),
        };
        match empty.validate() {
            Err(Error::UnsupportedObjectCount(0)) => {}
            other => panic!("expected UnsupportedObjectCount(0), got {:?}", other),
        }

        let oversized = ReportSubmission {
            project: filled_project(),
            objects: vec![ObjectReading::default(); MAX_OBJECTS + 1],
        };
        match oversized.validate() {
            Err(Error::UnsupportedObjectCount(n)) => assert_eq!(n, MAX_OBJECTS + 1),
            other => panic!("expected UnsupportedObjectCount, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_images_round_trips_base64() {
        let object = minimal_object();
        let images = object.decode_images().unwrap();
        assert_eq!(images.thermal, b"thermal-bytes");
        assert_eq!(images.context, b"context-bytes");
    }

    #[test]
    fn test_decode_images_missing_payload() {
        let mut object = minimal_object();
        object.index = 3;
        object.context_image = None;

        match object.decode_images() {
            Err(Error::MissingCriticalField {
                object_index,
                field,
            }) => {
                assert_eq!(object_index, 3);
                assert_eq!(field, "context_image");
            }
            other => panic!("expected MissingCriticalField, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_images_rejects_invalid_base64() {
        let mut object = minimal_object();
        object.index = 2;
        object.thermal_image = Some("not%%base64".to_string());

        match object.decode_images() {
            Err(Error::InvalidImagePayload {
                object_index,
                field,
            }) => {
                assert_eq!(object_index, 2);
                assert_eq!(field, "thermal_image");
            }
            other => panic!("expected InvalidImagePayload, got {:?}", other),
        }
    }
}
