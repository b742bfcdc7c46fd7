//! Severity classification for phase delta magnitudes
//!
//! Classifies the absolute temperature difference between two phases,
//! using the object's average thermal temperature as context once the
//! delta exceeds the moderate band. The rule table is evaluated strictly
//! in order and the first matching rule wins; magnitude and temperature
//! combinations covered by no rule are reported as `Unclassified` rather
//! than forced into the nearest band.

use serde::{Deserialize, Serialize};

/// Classification thresholds (degrees Celsius)
const MINOR_DELTA_MAX: f64 = 4.0; // below this: possible deficiency
const MODERATE_DELTA_MAX: f64 = 15.0; // 4..=15: probable deficiency
const AVG_TEMP_DEFICIENCY_MIN: f64 = 21.0; // severe band lower bound
const AVG_TEMP_DEFICIENCY_MAX: f64 = 40.0; // severe band upper bound; above: major

/// Severity bands for a classified phase delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Small delta, worth watching but not yet actionable
    PossibleDeficiency,
    /// Moderate delta, schedule repair at the next downtime window
    ProbableDeficiency,
    /// Large delta at normal operating temperature
    Deficiency,
    /// Large delta on overheated equipment
    MajorDeficiency,
    /// No rule matched; the reading itself is suspect
    Unclassified,
}

impl Severity {
    /// Human-readable severity label as printed in the report
    pub fn label(&self) -> &'static str {
        match self {
            Severity::PossibleDeficiency => "Possible deficiency",
            Severity::ProbableDeficiency => "Probable deficiency",
            Severity::Deficiency => "Deficiency",
            Severity::MajorDeficiency => "Major deficiency",
            Severity::Unclassified => "Unclassified",
        }
    }

    /// Recommended corrective action paired with the severity label
    pub fn action(&self) -> &'static str {
        match self {
            Severity::PossibleDeficiency => "More information required",
            Severity::ProbableDeficiency => "Repair at next available downtime",
            Severity::Deficiency => "Repair as soon as possible",
            Severity::MajorDeficiency => "Repair immediately",
            Severity::Unclassified => "Verify entered data",
        }
    }

    /// All severity variants
    ///
    /// Useful for exhaustive table checks and UI legends
    pub fn all_variants() -> &'static [Severity] {
        &[
            Severity::PossibleDeficiency,
            Severity::ProbableDeficiency,
            Severity::Deficiency,
            Severity::MajorDeficiency,
            Severity::Unclassified,
        ]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify one phase delta magnitude
///
/// `magnitude` is the absolute delta between two phase temperatures;
/// `avg_temp` is the object's average thermal temperature. Rules are
/// checked in declaration order and the first match wins:
///
/// 1. `0 < magnitude < 4` is a possible deficiency regardless of `avg_temp`
/// 2. `4 <= magnitude <= 15` is a probable deficiency regardless of `avg_temp`
/// 3. `magnitude > 15` with `avg_temp` in `21..=40` is a deficiency
/// 4. `magnitude > 15` with `avg_temp > 40` is a major deficiency
/// 5. anything else is unclassified
///
/// A magnitude above 15 with `avg_temp` below 21 deliberately falls through
/// to `Unclassified`: a large phase imbalance on cold equipment points at
/// a measurement or data entry problem, not a gradable fault.
pub fn classify_delta(magnitude: f64, avg_temp: f64) -> Severity {
    if magnitude > 0.0 && magnitude < MINOR_DELTA_MAX {
        return Severity::PossibleDeficiency;
    }
    if magnitude >= MINOR_DELTA_MAX && magnitude <= MODERATE_DELTA_MAX {
        return Severity::ProbableDeficiency;
    }
    if magnitude > MODERATE_DELTA_MAX
        && avg_temp >= AVG_TEMP_DEFICIENCY_MIN
        && avg_temp <= AVG_TEMP_DEFICIENCY_MAX
    {
        return Severity::Deficiency;
    }
    if magnitude > MODERATE_DELTA_MAX && avg_temp > AVG_TEMP_DEFICIENCY_MAX {
        return Severity::MajorDeficiency;
    }
    Severity::Unclassified
}
