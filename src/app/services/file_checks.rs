//! Per-file goodness checks.
//!
//! A segment file is worth processing when it carries the required
//! navigation sensors and at least one science sensor with enough finite
//! samples. The checks never fail the pipeline; they produce a verdict the
//! orchestrator gates on, with every shortfall reported.

use crate::app::diagnostics::Reporter;
use crate::app::models::GliderData;
use crate::app::series;
use crate::config::SlocumConfig;
use crate::constants::DAV_SENSOR_PAIRS;

/// Verdict of the goodness checks for one file
#[derive(Debug, Clone, Default)]
pub struct FileCheck {
    /// All configured required sensors are present
    pub required_sensors: bool,
    /// At least one science sensor has usable data
    pub any_science_data: bool,
    /// Science sensors with more than the minimum finite samples
    pub avail_sci_data: Vec<String>,
    /// At least one depth-averaged-velocity sensor pair is present
    pub dav_sensors: bool,
    /// The available velocity pairs, most authoritative first
    pub dav_pairs: Vec<(String, String)>,
    /// Overall verdict: required sensors present and science data usable
    pub file_good: bool,
}

/// Run all goodness checks on a parsed segment
pub fn check_file_goodness(
    dba: &GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> FileCheck {
    let mut check = FileCheck {
        required_sensors: check_required_sensors(dba, config, reporter),
        avail_sci_data: sci_data_available(dba, config, reporter),
        ..FileCheck::default()
    };
    let (dav_sensors, dav_pairs) = check_for_dav_sensors(dba);
    check.dav_sensors = dav_sensors;
    check.dav_pairs = dav_pairs;
    check.any_science_data = !check.avail_sci_data.is_empty();
    check.file_good = check.required_sensors && check.any_science_data;
    check
}

/// All configured required sensors present?
pub fn check_required_sensors(
    dba: &GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> bool {
    let mut present = true;
    for sensor in &config.required_sensors {
        if !dba.has_sensor(sensor) {
            present = false;
            reporter.warn_sensor(
                dba.source_file(),
                sensor,
                format!("required sensor {sensor} not present"),
            );
        }
    }
    present
}

/// Configured science sensors with more than the minimum finite samples
pub fn sci_data_available(
    dba: &GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> Vec<String> {
    let mut available = Vec::new();
    for sensor in &config.science_sensors {
        match dba.data(sensor) {
            Some(data) if series::finite_count(data) > config.min_data_vals => {
                available.push(sensor.clone());
            }
            Some(_) => {
                reporter.warn_sensor(
                    dba.source_file(),
                    sensor,
                    format!(
                        "science sensor {sensor} has fewer than {} finite values",
                        config.min_data_vals
                    ),
                );
            }
            None => {
                reporter.warn_sensor(
                    dba.source_file(),
                    sensor,
                    format!("science sensor {sensor} configured but not in the file"),
                );
            }
        }
    }
    available
}

/// Which depth-averaged-velocity pairs does the file carry?
pub fn check_for_dav_sensors(dba: &GliderData) -> (bool, Vec<(String, String)>) {
    let pairs: Vec<(String, String)> = DAV_SENSOR_PAIRS
        .iter()
        .filter(|(vx, vy)| dba.has_sensor(vx) && dba.has_sensor(vy))
        .map(|(vx, vy)| (vx.to_string(), vy.to_string()))
        .collect();
    (!pairs.is_empty(), pairs)
}

/// Did the vehicle actually dive in this segment?
pub fn check_if_dive(dba: &GliderData, min_dive_depth: f64) -> bool {
    dba.data("m_depth")
        .map(|depth| series::nan_max(depth) > min_dive_depth)
        .unwrap_or(false)
}
