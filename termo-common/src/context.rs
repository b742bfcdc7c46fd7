//! Rendering-context assembly
//!
//! The document template is populated from a flat key/value map. This
//! module builds that map from a validated submission and its derived
//! diagnostics: project fields once, object fields suffixed with the
//! 1-based ordinal (`equipment_name_3`), plus the date parts of the
//! generation date.
//!
//! Two presentation rules apply throughout. User-entered text is
//! uppercased, because that is how the printed report renders it.
//! Classifier output (labels, actions, display strings) keeps its
//! canonical casing; it never passes through the uppercase transform.

use crate::diagnostics::DeltaResult;
use crate::fields::RawValue;
use crate::reading::{ObjectReading, ProjectInfo};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Month names as printed in the report header, indexed by `month0`
pub const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Uppercase month name for a date
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Flat key/value map handed to the document templating collaborator
///
/// Serializes as a plain JSON object so the bundle's `context.json` is
/// directly consumable by the templating engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportContext {
    values: Map<String, Value>,
}

impl ReportContext {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// Build the full rendering context for a report
///
/// `objects` and `diagnostics` are parallel: both carry one entry per
/// inspected object, in submission order, and both use the object's
/// 1-based index. `generation_date` is injected rather than read from
/// the clock so callers control the report's date line.
pub fn assemble_context(
    project: &ProjectInfo,
    objects: &[ObjectReading],
    diagnostics: &[DeltaResult],
    generation_date: NaiveDate,
) -> ReportContext {
    let mut ctx = ReportContext::default();

    insert_project(&mut ctx, project, generation_date);
    for object in objects {
        insert_object(&mut ctx, object);
    }
    for result in diagnostics {
        insert_diagnostics(&mut ctx, result);
    }

    ctx
}

fn insert_project(ctx: &mut ReportContext, project: &ProjectInfo, generation_date: NaiveDate) {
    ctx.insert("project_name", upper(&project.project_name));
    ctx.insert("city", upper(&project.city));
    ctx.insert("department", upper(&project.department));
    ctx.insert("address", upper(&project.address));
    ctx.insert(
        "coordinate_mode",
        Value::String(project.coordinate_mode.display_name().to_uppercase()),
    );
    ctx.insert("latitude", pass_through(project.latitude.as_ref()));
    ctx.insert("longitude", pass_through(project.longitude.as_ref()));
    ctx.insert("engineer_name", upper(&project.engineer_name));
    ctx.insert("license_number", upper(&project.license_number));
    ctx.insert("job_title", upper(&project.job_title));
    ctx.insert("creation_date", date_value(project.creation_date));
    ctx.insert("image_date", date_value(project.image_date));

    ctx.insert("day", Value::from(generation_date.day()));
    ctx.insert(
        "month_name",
        Value::String(month_name(generation_date).to_string()),
    );
    ctx.insert("year", Value::from(generation_date.year()));
}

fn insert_object(ctx: &mut ReportContext, object: &ObjectReading) {
    let i = object.index;

    ctx.insert(format!("equipment_name_{}", i), upper(&object.equipment_name));
    ctx.insert(format!("brand_{}", i), upper_or_na(&object.brand));
    ctx.insert(
        format!("evaluated_object_{}", i),
        upper(&object.evaluated_object),
    );

    ctx.insert(format!("max_temp_{}", i), pass_through(object.max_temp.as_ref()));
    ctx.insert(format!("min_temp_{}", i), pass_through(object.min_temp.as_ref()));
    ctx.insert(
        format!("avg_thermal_temp_{}", i),
        pass_through(object.avg_thermal_temp.as_ref()),
    );
    ctx.insert(
        format!("emissivity_{}", i),
        pass_through(object.emissivity.as_ref()),
    );
    ctx.insert(
        format!("background_object_temp_{}", i),
        pass_through(object.background_object_temp.as_ref()),
    );

    // Unfilled-sensor placeholders: zero is the capture widget's resting
    // value for these three, so zero reads as "not measured"
    ctx.insert(
        format!("background_temp_{}", i),
        na_when_unset(object.background_temp.as_ref()),
    );
    ctx.insert(
        format!("std_deviation_{}", i),
        na_when_unset(object.std_deviation.as_ref()),
    );
    ctx.insert(format!("delta_t_{}", i), na_when_unset(object.delta_t.as_ref()));

    ctx.insert(
        format!("phase_temp_r_{}", i),
        pass_through(object.phase_temp_r.as_ref()),
    );
    ctx.insert(
        format!("phase_temp_s_{}", i),
        pass_through(object.phase_temp_s.as_ref()),
    );
    ctx.insert(
        format!("phase_temp_t_{}", i),
        pass_through(object.phase_temp_t.as_ref()),
    );

    ctx.insert(format!("conclusions_{}", i), upper(&object.conclusions));
}

fn insert_diagnostics(ctx: &mut ReportContext, result: &DeltaResult) {
    let i = result.object_index;
    for delta in &result.deltas {
        let pair = delta.pair.key_fragment();
        ctx.insert(
            format!("delta_{}_{}", pair, i),
            Value::String(delta.display_string()),
        );
        ctx.insert(
            format!("delta_{}_magnitude_{}", pair, i),
            Value::from(delta.magnitude),
        );
        ctx.insert(
            format!("delta_{}_label_{}", pair, i),
            Value::String(delta.severity.label().to_string()),
        );
        ctx.insert(
            format!("delta_{}_action_{}", pair, i),
            Value::String(delta.severity.action().to_string()),
        );
    }
}

fn upper(text: &str) -> Value {
    Value::String(text.to_uppercase())
}

fn upper_or_na(text: &str) -> Value {
    if text.trim().is_empty() {
        Value::String("N/A".to_string())
    } else {
        upper(text)
    }
}

fn pass_through(value: Option<&RawValue>) -> Value {
    match value {
        Some(v) => v.to_context_value(),
        None => Value::Null,
    }
}

fn na_when_unset(value: Option<&RawValue>) -> Value {
    match value {
        Some(v) if !v.is_blank_or_zero() => v.to_context_value(),
        _ => Value::String("N/A".to_string()),
    }
}

fn date_value(date: Option<NaiveDate>) -> Value {
    match date {
        Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::build_object_diagnostics;

    fn sample_project() -> ProjectInfo {
        ProjectInfo {
            project_name: "Substation upgrade".to_string(),
            city: "Cali".to_string(),
            department: "Valle".to_string(),
            address: "Km 4 via norte".to_string(),
            latitude: Some(RawValue::from(3.451647)),
            longitude: Some(RawValue::from(-76.531985)),
            engineer_name: "Ana Diaz".to_string(),
            license_number: "VL-2041".to_string(),
            job_title: "Electrical engineer".to_string(),
            creation_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            image_date: NaiveDate::from_ymd_opt(2025, 3, 8),
            ..Default::default()
        }
    }

    fn sample_object(index: usize) -> ObjectReading {
        ObjectReading {
            index,
            equipment_name: "Main transformer".to_string(),
            brand: "Siemens".to_string(),
            evaluated_object: "Low voltage bushing".to_string(),
            max_temp: Some(RawValue::from(41.2)),
            min_temp: Some(RawValue::from(19.0)),
            avg_thermal_temp: Some(RawValue::from(28.0)),
            emissivity: Some(RawValue::from(0.95)),
            background_object_temp: Some(RawValue::from(22.0)),
            background_temp: Some(RawValue::from(21.0)),
            std_deviation: Some(RawValue::from(1.4)),
            delta_t: Some(RawValue::from(3.2)),
            phase_temp_r: Some(RawValue::from(30.0)),
            phase_temp_s: Some(RawValue::from(25.0)),
            phase_temp_t: Some(RawValue::from(22.0)),
            conclusions: "No action needed".to_string(),
            ..Default::default()
        }
    }

    fn generation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_project_fields_uppercased() {
        let ctx = assemble_context(&sample_project(), &[], &[], generation_date());
        assert_eq!(
            ctx.get("project_name").unwrap(),
            &Value::String("SUBSTATION UPGRADE".to_string())
        );
        assert_eq!(
            ctx.get("engineer_name").unwrap(),
            &Value::String("ANA DIAZ".to_string())
        );
        assert_eq!(
            ctx.get("coordinate_mode").unwrap(),
            &Value::String("URBAN".to_string())
        );
    }

    #[test]
    fn test_dates_and_generation_date_parts() {
        let ctx = assemble_context(&sample_project(), &[], &[], generation_date());
        assert_eq!(
            ctx.get("creation_date").unwrap(),
            &Value::String("2025-03-10".to_string())
        );
        assert_eq!(
            ctx.get("image_date").unwrap(),
            &Value::String("2025-03-08".to_string())
        );
        assert_eq!(ctx.get("day").unwrap(), &Value::from(15u32));
        assert_eq!(
            ctx.get("month_name").unwrap(),
            &Value::String("MARCH".to_string())
        );
        assert_eq!(ctx.get("year").unwrap(), &Value::from(2025));
    }

    #[test]
    fn test_coordinates_pass_through_numeric() {
        let ctx = assemble_context(&sample_project(), &[], &[], generation_date());
        assert_eq!(ctx.get("latitude").unwrap(), &Value::from(3.451647));
        assert_eq!(ctx.get("longitude").unwrap(), &Value::from(-76.531985));

        let mut project = sample_project();
        project.latitude = None;
        project.longitude = None;
        let ctx = assemble_context(&project, &[], &[], generation_date());
        assert_eq!(ctx.get("latitude").unwrap(), &Value::Null);
    }

    #[test]
    fn test_object_keys_use_one_based_suffix() {
        let objects = vec![sample_object(1), sample_object(2)];
        let ctx = assemble_context(&sample_project(), &objects, &[], generation_date());

        assert_eq!(
            ctx.get("equipment_name_1").unwrap(),
            &Value::String("MAIN TRANSFORMER".to_string())
        );
        assert_eq!(
            ctx.get("equipment_name_2").unwrap(),
            &Value::String("MAIN TRANSFORMER".to_string())
        );
        assert!(ctx.get("equipment_name_0").is_none());
        assert!(ctx.get("equipment_name_3").is_none());
        assert_eq!(ctx.get("max_temp_1").unwrap(), &Value::from(41.2));
        assert_eq!(
            ctx.get("conclusions_2").unwrap(),
            &Value::String("NO ACTION NEEDED".to_string())
        );
    }

    #[test]
    fn test_blank_brand_becomes_na() {
        let mut object = sample_object(1);
        object.brand = "  ".to_string();
        let ctx = assemble_context(&sample_project(), &[object], &[], generation_date());
        assert_eq!(
            ctx.get("brand_1").unwrap(),
            &Value::String("N/A".to_string())
        );
    }

    #[test]
    fn test_unset_sensor_fields_become_na() {
        let mut object = sample_object(1);
        object.background_temp = Some(RawValue::from(0.0));
        object.std_deviation = None;
        object.delta_t = Some(RawValue::from(""));
        let ctx = assemble_context(&sample_project(), &[object], &[], generation_date());

        for key in ["background_temp_1", "std_deviation_1", "delta_t_1"] {
            assert_eq!(
                ctx.get(key).unwrap(),
                &Value::String("N/A".to_string()),
                "{} should read N/A",
                key
            );
        }
    }

    #[test]
    fn test_nonzero_sensor_fields_kept() {
        let ctx =
            assemble_context(&sample_project(), &[sample_object(1)], &[], generation_date());
        assert_eq!(ctx.get("background_temp_1").unwrap(), &Value::from(21.0));
        assert_eq!(ctx.get("std_deviation_1").unwrap(), &Value::from(1.4));
        assert_eq!(ctx.get("delta_t_1").unwrap(), &Value::from(3.2));
    }

    #[test]
    fn test_text_numerics_uppercased_not_na() {
        // Comma-decimal text entries survive as text, uppercased like all
        // user input; only blank or zero reads as unfilled
        let mut object = sample_object(1);
        object.background_temp = Some(RawValue::from("21,4"));
        let ctx = assemble_context(&sample_project(), &[object], &[], generation_date());
        assert_eq!(
            ctx.get("background_temp_1").unwrap(),
            &Value::String("21,4".to_string())
        );
    }

    #[test]
    fn test_delta_keys_keep_canonical_casing() {
        let object = sample_object(1);
        let diagnostics = vec![build_object_diagnostics(&object).unwrap()];
        let ctx = assemble_context(
            &sample_project(),
            std::slice::from_ref(&object),
            &diagnostics,
            generation_date(),
        );

        assert_eq!(
            ctx.get("delta_rs_1").unwrap(),
            &Value::String(
                "5.00 °C (Probable deficiency - Repair at next available downtime)".to_string()
            )
        );
        assert_eq!(ctx.get("delta_rs_magnitude_1").unwrap(), &Value::from(5.0));
        assert_eq!(
            ctx.get("delta_rs_label_1").unwrap(),
            &Value::String("Probable deficiency".to_string())
        );
        assert_eq!(
            ctx.get("delta_st_action_1").unwrap(),
            &Value::String("More information required".to_string())
        );
        assert_eq!(ctx.get("delta_tr_magnitude_1").unwrap(), &Value::from(8.0));
    }

    #[test]
    fn test_context_serializes_flat() {
        let object = sample_object(1);
        let diagnostics = vec![build_object_diagnostics(&object).unwrap()];
        let ctx = assemble_context(
            &sample_project(),
            std::slice::from_ref(&object),
            &diagnostics,
            generation_date(),
        );

        let json = serde_json::to_value(&ctx).unwrap();
        let map = json.as_object().expect("flat object");
        assert_eq!(map.len(), ctx.len());
        assert_eq!(
            map.get("month_name").unwrap(),
            &Value::String("MARCH".to_string())
        );
    }

    #[test]
    fn test_month_names_cover_the_year() {
        assert_eq!(
            month_name(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            "JANUARY"
        );
        assert_eq!(
            month_name(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
            "DECEMBER"
        );
    }
}
