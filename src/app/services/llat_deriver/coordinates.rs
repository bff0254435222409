//! GPS coordinate conversion and interpolation.
//!
//! Raw Slocum GPS fixes arrive in the NMEA-style "iso" encoding
//! (DDMM.mmmm) with large fill values standing in for "no fix". Conversion
//! nulls the fill values, converts the remaining fixes to decimal degrees
//! and interpolates both coordinates onto the segment's time samples.

use crate::app::diagnostics::Reporter;
use crate::app::models::{GliderData, SensorData, SensorRecord};
use crate::app::series;
use crate::constants::{sentinels, GPS_LATITUDE_SENSOR, GPS_LONGITUDE_SENSOR};

/// Convert one iso-encoded angle (DDMM.mmmm) to decimal degrees
pub fn iso2deg(value: f64) -> f64 {
    if !value.is_finite() {
        return f64::NAN;
    }
    let sign = if value < 0.0 { -1.0 } else { 1.0 };
    let magnitude = value.abs();
    let degrees = (magnitude / 100.0).trunc();
    let minutes = magnitude - degrees * 100.0;
    sign * (degrees + minutes / 60.0)
}

/// Derive interpolated decimal-degree latitude/longitude records.
///
/// Returns `None`, after reporting, when either raw GPS sensor is absent;
/// every later geospatial derivation depends on this output.
pub fn derive_coordinates(
    dba: &GliderData,
    time_data: &[f64],
    reporter: &mut Reporter,
) -> Option<(SensorRecord, SensorRecord)> {
    if !dba.has_sensor(GPS_LATITUDE_SENSOR) || !dba.has_sensor(GPS_LONGITUDE_SENSOR) {
        reporter.warn(
            dba.source_file(),
            format!("missing {GPS_LATITUDE_SENSOR} and/or {GPS_LONGITUDE_SENSOR}"),
        );
        return None;
    }

    let lat = convert_coordinate(
        dba.get(GPS_LATITUDE_SENSOR).expect("presence checked"),
        "llat_latitude",
        GPS_LATITUDE_SENSOR,
        sentinels::LATITUDE_MAX,
        time_data,
    );
    let lon = convert_coordinate(
        dba.get(GPS_LONGITUDE_SENSOR).expect("presence checked"),
        "llat_longitude",
        GPS_LONGITUDE_SENSOR,
        sentinels::LONGITUDE_MAX,
        time_data,
    );
    Some((lat, lon))
}

fn convert_coordinate(
    source: &SensorRecord,
    name: &str,
    source_sensor: &str,
    sentinel_max: f64,
    time_data: &[f64],
) -> SensorRecord {
    let mut record = SensorRecord::derived_from(
        source,
        name,
        source_sensor,
        format!("{source_sensor} converted to decimal degrees and interpolated"),
    );
    record.set_attr("units", "degrees");

    let raw = source.data.as_series().unwrap_or(&[]);
    // Null the no-fix fill values before conversion so they can never reach
    // the interpolation sources
    let decimal: Vec<f64> = raw
        .iter()
        .map(|&v| {
            if v.abs() > sentinel_max {
                f64::NAN
            } else {
                iso2deg(v)
            }
        })
        .collect();
    record.data = SensorData::Series(series::interp_onto(time_data, &decimal));
    record
}
