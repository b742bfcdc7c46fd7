//! Phase delta diagnostics engine
//!
//! The one genuinely rule-bound part of report generation: take the three
//! phase temperatures and the average thermal image temperature of one
//! inspected object, form the pairwise differences R-S, S-T and T-R,
//! round their magnitudes, classify each against the severity table, and
//! format the report line for each pair.
//!
//! All functions here are pure. Validation of the four critical fields
//! happens at this boundary, per object, immediately before that
//! object's arithmetic; the report-level driver stops at the first
//! object that fails.

use crate::classify::{classify_delta, Severity};
use crate::error::{Error, Result};
use crate::fields::RawValue;
use crate::reading::ObjectReading;
use serde::{Deserialize, Serialize};

/// Outcome of normalizing one raw field value
///
/// `Missing` and `Malformed` are deliberately distinct signals: an absent
/// critical field means the form let the operator skip it, while a
/// malformed one means the operator typed something unparseable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// No value supplied (absent, null, or blank text)
    #[error("value is missing")]
    Missing,
    /// Text that does not parse as a number after comma normalization
    #[error("'{0}' is not a number")]
    Malformed(String),
}

/// Normalize a raw form value to a float
///
/// Numbers pass through unchanged. Text has any comma decimal separator
/// replaced by a period before parsing, so `"21,5"` and `"21.5"` both
/// yield 21.5. Blank text counts as missing, not malformed.
pub fn normalize_number(value: Option<&RawValue>) -> std::result::Result<f64, NormalizeError> {
    let value = value.ok_or(NormalizeError::Missing)?;
    match value {
        RawValue::Number(n) => Ok(*n),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(NormalizeError::Missing);
            }
            trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| NormalizeError::Malformed(s.clone()))
        }
    }
}

/// The three phase pairings a delta is computed over, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhasePair {
    Rs,
    St,
    Tr,
}

impl PhasePair {
    /// Pair name as printed in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            PhasePair::Rs => "R-S",
            PhasePair::St => "S-T",
            PhasePair::Tr => "T-R",
        }
    }

    /// Fragment used to build rendering-context keys (`delta_rs_3`)
    pub fn key_fragment(&self) -> &'static str {
        match self {
            PhasePair::Rs => "rs",
            PhasePair::St => "st",
            PhasePair::Tr => "tr",
        }
    }
}

impl std::fmt::Display for PhasePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Signed pairwise deltas for one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDeltas {
    pub rs: f64,
    pub st: f64,
    pub tr: f64,
}

/// Compute the three signed phase-to-phase differences
///
/// Pure arithmetic, no failure mode. The three results always sum to
/// zero algebraically: (r-s) + (s-t) + (t-r) = 0.
pub fn compute_deltas(phase_r: f64, phase_s: f64, phase_t: f64) -> PhaseDeltas {
    PhaseDeltas {
        rs: phase_r - phase_s,
        st: phase_s - phase_t,
        tr: phase_t - phase_r,
    }
}

/// Round a signed delta to its reported magnitude
///
/// Absolute value rounded to two decimals, half away from zero
/// (`f64::round` semantics): 0.005 rounds to 0.01, 0.125 to 0.13.
pub fn round_magnitude(signed: f64) -> f64 {
    (signed.abs() * 100.0).round() / 100.0
}

/// One classified delta between two phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaDiagnostic {
    pub pair: PhasePair,
    /// Signed difference before rounding
    pub signed: f64,
    /// Rounded absolute value; this is the classified quantity
    pub magnitude: f64,
    pub severity: Severity,
}

impl DeltaDiagnostic {
    fn derive(pair: PhasePair, signed: f64, avg_temp: f64) -> Self {
        let magnitude = round_magnitude(signed);
        let severity = classify_delta(magnitude, avg_temp);
        Self {
            pair,
            signed,
            magnitude,
            severity,
        }
    }

    /// Report display string for this delta
    ///
    /// The magnitude is always printed with two decimals:
    /// `"5.00 °C (Probable deficiency - Repair at next available downtime)"`.
    pub fn display_string(&self) -> String {
        format!(
            "{:.2} °C ({} - {})",
            self.magnitude,
            self.severity.label(),
            self.severity.action()
        )
    }
}

/// Diagnostics derived for one inspected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaResult {
    /// 1-based position of the object within the report
    pub object_index: usize,
    /// R-S, S-T, T-R in order
    pub deltas: [DeltaDiagnostic; 3],
}

/// Derive the delta diagnostics for one object
///
/// The four critical fields are validated here, immediately before the
/// arithmetic: a missing one aborts with the object index and field
/// name, a malformed one additionally carries the offending text. Given
/// valid input the derivation is pure; running it twice on the same
/// reading yields identical results.
pub fn build_object_diagnostics(reading: &ObjectReading) -> Result<DeltaResult> {
    let phase_r = normalize_critical(reading.index, "phase_temp_r", reading.phase_temp_r.as_ref())?;
    let phase_s = normalize_critical(reading.index, "phase_temp_s", reading.phase_temp_s.as_ref())?;
    let phase_t = normalize_critical(reading.index, "phase_temp_t", reading.phase_temp_t.as_ref())?;
    let avg_temp = normalize_critical(
        reading.index,
        "avg_thermal_temp",
        reading.avg_thermal_temp.as_ref(),
    )?;

    let deltas = compute_deltas(phase_r, phase_s, phase_t);
    Ok(DeltaResult {
        object_index: reading.index,
        deltas: [
            DeltaDiagnostic::derive(PhasePair::Rs, deltas.rs, avg_temp),
            DeltaDiagnostic::derive(PhasePair::St, deltas.st, avg_temp),
            DeltaDiagnostic::derive(PhasePair::Tr, deltas.tr, avg_temp),
        ],
    })
}

fn normalize_critical(
    object_index: usize,
    field: &'static str,
    value: Option<&RawValue>,
) -> Result<f64> {
    normalize_number(value).map_err(|e| match e {
        NormalizeError::Missing => Error::MissingCriticalField {
            object_index,
            field,
        },
        NormalizeError::Malformed(value) => Error::InvalidNumericInput {
            object_index,
            field,
            value,
        },
    })
}

/// Derive diagnostics for every object of a report, in submission order
///
/// All-or-nothing: the first object with a missing or malformed critical
/// field aborts the whole derivation, and nothing is returned for the
/// objects already processed. A report is never partially diagnosed.
pub fn build_report_diagnostics(readings: &[ObjectReading]) -> Result<Vec<DeltaResult>> {
    let mut results = Vec::with_capacity(readings.len());
    for reading in readings {
        results.push(build_object_diagnostics(reading)?);
    }
    Ok(results)
}
