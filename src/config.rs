//! Configuration management for Slocum processing.
//!
//! Provides the processing configuration: sensor priority lists, required
//! sensor sets, data-sufficiency thresholds and the attribute metadata
//! attached to newly created derived records. Defaults mirror the standard
//! Slocum deployment; a JSON file can override any field.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants;
use crate::{Error, Result};

/// Attribute metadata for records created from scratch (salinity, density).
///
/// These attributes end up verbatim on the derived records; units and long
/// names follow the IOOS glider DAC conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorDefs {
    /// Attributes for the derived `salinity` record
    pub salinity: BTreeMap<String, String>,
    /// Attributes for the derived `density` record
    pub density: BTreeMap<String, String>,
}

impl Default for SensorDefs {
    fn default() -> Self {
        let mut salinity = BTreeMap::new();
        salinity.insert("units".to_string(), "1".to_string());
        salinity.insert("long_name".to_string(), "Practical Salinity".to_string());
        salinity.insert(
            "comment".to_string(),
            "Calculated from conductivity, temperature and pressure (PSS-78)".to_string(),
        );

        let mut density = BTreeMap::new();
        density.insert("units".to_string(), "kg m-3".to_string());
        density.insert("long_name".to_string(), "Density".to_string());
        density.insert(
            "comment".to_string(),
            "Calculated from temperature, pressure and salinity at the mean segment position"
                .to_string(),
        );

        Self { salinity, density }
    }
}

/// Fill strategy for sparsely sampled attitude series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Hold the last finite sample forward
    FwdFill,
    /// Linear interpolation in time
    Interp,
    /// Leave gaps as NaN
    None,
}

/// Global configuration for Slocum processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlocumConfig {
    /// Timestamp sensor candidates in descending preference order
    pub timestamp_sensors: Vec<String>,

    /// Pressure sensor candidates in descending preference order
    pub pressure_sensors: Vec<String>,

    /// Depth sensor candidates in descending preference order
    pub depth_sensors: Vec<String>,

    /// Explicit time sensor override; must exist in the file to take effect
    pub time_sensor: Option<String>,

    /// Explicit pressure sensor override
    pub pressure_sensor: Option<String>,

    /// Explicit depth sensor override
    pub depth_sensor: Option<String>,

    /// Always derive depth from pressure, even when a depth sensor exists
    pub z_from_p: bool,

    /// Sensors that must be present for a file to be processable at all
    pub required_sensors: Vec<String>,

    /// Science sensors considered for the any-science-data goodness check
    pub science_sensors: Vec<String>,

    /// Sensors that must be present before CTD derivation is attempted
    pub required_ctd_sensors: Vec<String>,

    /// Minimum finite samples for a science sensor to count as available
    pub min_data_vals: usize,

    /// Depth in meters separating surface drift from a diving segment
    pub min_dive_depth: f64,

    /// Fill strategy for derived pitch/roll
    pub attitude_fill: FillMethod,

    /// Attribute metadata for created records
    pub sensor_defs: SensorDefs,
}

impl Default for SlocumConfig {
    fn default() -> Self {
        Self {
            timestamp_sensors: to_strings(constants::TIMESTAMP_SENSORS),
            pressure_sensors: to_strings(constants::PRESSURE_SENSORS),
            depth_sensors: to_strings(constants::DEPTH_SENSORS),
            time_sensor: None,
            pressure_sensor: None,
            depth_sensor: None,
            z_from_p: true,
            required_sensors: to_strings(&[
                "m_present_time",
                constants::GPS_LATITUDE_SENSOR,
                constants::GPS_LONGITUDE_SENSOR,
            ]),
            science_sensors: to_strings(&[
                "sci_water_cond",
                "sci_water_temp",
                "sci_water_pressure",
                constants::OXYGEN_SENSOR,
            ]),
            required_ctd_sensors: to_strings(&[
                "llat_latitude",
                "llat_longitude",
                "llat_pressure",
                "sci_water_cond",
                "sci_water_temp",
            ]),
            min_data_vals: constants::MIN_DATA_VALS,
            min_dive_depth: constants::MIN_DIVE_DEPTH,
            attitude_fill: FillMethod::FwdFill,
            sensor_defs: SensorDefs::default(),
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl SlocumConfig {
    /// Load configuration from a JSON file, with defaults for absent fields
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read config {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::configuration(format!("invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.timestamp_sensors.is_empty() {
            return Err(Error::configuration(
                "timestamp_sensors must name at least one candidate",
            ));
        }
        if self.min_dive_depth < 0.0 {
            return Err(Error::configuration("min_dive_depth must be non-negative"));
        }
        Ok(())
    }

    /// Override the time sensor choice
    pub fn with_time_sensor(mut self, sensor: impl Into<String>) -> Self {
        self.time_sensor = Some(sensor.into());
        self
    }

    /// Override the pressure sensor choice
    pub fn with_pressure_sensor(mut self, sensor: impl Into<String>) -> Self {
        self.pressure_sensor = Some(sensor.into());
        self
    }

    /// Override the depth sensor choice
    pub fn with_depth_sensor(mut self, sensor: impl Into<String>) -> Self {
        self.depth_sensor = Some(sensor.into());
        self
    }

    /// Control whether depth is always recomputed from pressure
    pub fn with_z_from_p(mut self, z_from_p: bool) -> Self {
        self.z_from_p = z_from_p;
        self
    }
}
