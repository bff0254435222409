//! Application constants for the Slocum processor
//!
//! This module contains the sensor name priority lists, instrument sentinel
//! thresholds and data-sufficiency limits used throughout the application.

// =============================================================================
// Sensor Priority Lists
// =============================================================================

/// Timestamp sensors in descending order of preference
pub const TIMESTAMP_SENSORS: &[&str] = &["m_present_time", "sci_m_present_time"];

/// Pressure sensors in descending order of preference (all report bar)
pub const PRESSURE_SENSORS: &[&str] = &["sci_water_pressure", "m_water_pressure", "m_pressure"];

/// Depth sensors in descending order of preference
pub const DEPTH_SENSORS: &[&str] = &["m_depth", "m_water_depth"];

/// Depth-averaged velocity sensor pairs, most authoritative first
pub const DAV_SENSOR_PAIRS: &[(&str, &str)] = &[
    ("m_final_water_vx", "m_final_water_vy"),
    ("m_water_vx", "m_water_vy"),
    ("m_initial_water_vx", "m_initial_water_vy"),
];

/// Raw GPS sensors (iso-format degree-minutes)
pub const GPS_LATITUDE_SENSOR: &str = "m_gps_lat";
pub const GPS_LONGITUDE_SENSOR: &str = "m_gps_lon";

/// Raw oxygen concentration sensor (volume units, uncompensated)
pub const OXYGEN_SENSOR: &str = "sci_oxy4_oxygen";

// =============================================================================
// Sentinel Values
// =============================================================================

/// Instrument placeholder thresholds for GPS fixes in the raw iso encoding.
///
/// A fix magnitude above these limits (the instrument emits 69696969-style
/// fill values when it has no fix) must be nulled before conversion to
/// decimal degrees.
pub mod sentinels {
    /// Latitude samples with |value| above this are "no fix"
    pub const LATITUDE_MAX: f64 = 9000.0;

    /// Longitude samples with |value| above this are "no fix"
    pub const LONGITUDE_MAX: f64 = 18000.0;
}

// =============================================================================
// Data Sufficiency Thresholds
// =============================================================================

/// Minimum finite samples for a science sensor to count as available
pub const MIN_DATA_VALS: usize = 5;

/// Depth in meters above which a segment counts as a diving segment, and a
/// sample counts as underwater for segment-summary purposes
pub const MIN_DIVE_DEPTH: f64 = 1.0;

// =============================================================================
// File Types
// =============================================================================

/// Segment file extensions carrying the full flight sensor set.
///
/// Only these files are eligible for final-velocity lookahead; the decimated
/// `sbd`/`tbd` telemetry files are not.
pub const FLIGHT_FULL_EXTENSION: &str = "dbd";

/// Segment file extensions recognized by directory discovery
pub const SEGMENT_EXTENSIONS: &[&str] = &["dbd", "sbd", "ebd", "tbd"];

/// Maximum number of segments ahead the final-velocity lookahead may reach
pub const LOOKAHEAD_MAX_SEGMENTS: u32 = 2;

// =============================================================================
// Unit Conversions
// =============================================================================

/// Multiplier from bar (raw pressure sensors) to decibar
pub const BAR_TO_DBAR: f64 = 10.0;

/// Multiplier from S/m (raw conductivity sensors) to mS/cm
pub const SPM_TO_MSPCM: f64 = 10.0;
