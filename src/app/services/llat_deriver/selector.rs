//! Priority-based raw sensor selection.
//!
//! For each logical role (time, pressure, depth) the glider may carry
//! several raw sensors of varying quality and availability. Selection is a
//! pure decision: an optional caller override, then the first present
//! candidate of an ordered priority list.

use crate::app::diagnostics::Reporter;
use crate::app::models::GliderData;

/// Logical roles a raw sensor can be selected for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorRole {
    Time,
    Pressure,
    Depth,
}

impl SensorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorRole::Time => "time",
            SensorRole::Pressure => "pressure",
            SensorRole::Depth => "depth",
        }
    }
}

/// Choose the raw sensor for a role.
///
/// An override that exists in the container wins outright. An override that
/// does not exist is reported and selection falls through to the automatic
/// scan, which returns the first present candidate in priority order. No
/// candidate present is reported and yields `None`.
pub fn select_sensor(
    dba: &GliderData,
    role: SensorRole,
    candidates: &[String],
    override_name: Option<&str>,
    reporter: &mut Reporter,
) -> Option<String> {
    if let Some(name) = override_name {
        if dba.has_sensor(name) {
            return Some(name.to_string());
        }
        reporter.warn_sensor(
            dba.source_file(),
            name,
            format!(
                "specified {} sensor {} not found, auto-choosing one instead",
                role.as_str(),
                name
            ),
        );
    }
    autochoose(dba, role, candidates, reporter)
}

fn autochoose(
    dba: &GliderData,
    role: SensorRole,
    candidates: &[String],
    reporter: &mut Reporter,
) -> Option<String> {
    for candidate in candidates {
        if dba.has_sensor(candidate) {
            reporter.note(
                dba.source_file(),
                format!("auto-chose {} sensor: {}", role.as_str(), candidate),
            );
            return Some(candidate.clone());
        }
    }
    reporter.warn(
        dba.source_file(),
        format!("no {} sensor found", role.as_str()),
    );
    None
}
