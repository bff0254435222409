//! LLAT sensor derivation.
//!
//! Produces the normalized `llat_time`, `llat_pressure`, `llat_depth`,
//! `llat_latitude` and `llat_longitude` records from whichever raw sensors
//! the segment carries. Selection of the raw sensors follows a priority
//! fallback policy with optional caller overrides; coordinates are converted
//! to decimal degrees and interpolated; depth is aliased from a depth sensor
//! or computed from pressure and latitude through the equation of state.

pub mod coordinates;
pub mod selector;

#[cfg(test)]
mod tests;

pub use selector::{select_sensor, SensorRole};

use tracing::debug;

use crate::app::diagnostics::Reporter;
use crate::app::models::{GliderData, SensorData, SensorRecord};
use crate::config::SlocumConfig;
use crate::constants::BAR_TO_DBAR;
use crate::seawater;
use crate::Result;

/// Derive the full LLAT sensor set on `dba`.
///
/// Returns `Ok(false)` when a hard precondition is missing (no resolvable
/// time sensor, neither pressure nor depth, no GPS pair); the container is
/// left untouched in that case and the failure has been reported. `Err` is
/// reserved for container invariant violations.
pub fn create_llat_sensors(
    dba: &mut GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> Result<bool> {
    // Time first: nothing else is meaningful without it
    let Some(time_record) = select_time_sensor(dba, config, reporter) else {
        return Ok(false);
    };

    let pressure_record = select_pressure_sensor(dba, config, reporter);
    let depth_alias = select_depth_sensor(dba, config, reporter);
    if pressure_record.is_none() && depth_alias.is_none() {
        reporter.warn(
            dba.source_file(),
            "no pressure sensor and no depth sensor found",
        );
        return Ok(false);
    }

    let time_data = time_record.data.as_series().expect("time is a series").to_vec();
    let Some((lat_record, lon_record)) =
        coordinates::derive_coordinates(dba, &time_data, reporter)
    else {
        return Ok(false);
    };

    // Depth: alias the chosen sensor, unless there is none or the caller
    // prefers recomputing from pressure
    let depth_record = if depth_alias.is_none() || config.z_from_p {
        match &pressure_record {
            Some(pressure) => {
                debug!(
                    "{}: calculating depth from pressure sensor {}",
                    dba.source_file().display(),
                    pressure.attr("source_sensor").unwrap_or("?")
                );
                Some(depth_from_pressure(pressure, &lat_record))
            }
            None => {
                reporter.warn(
                    dba.source_file(),
                    "no pressure sensor found for calculating depth",
                );
                depth_alias
            }
        }
    } else {
        depth_alias
    };

    dba.add(time_record)?;
    if let Some(pressure) = pressure_record {
        dba.add(pressure)?;
    }
    if let Some(depth) = depth_record {
        dba.add(depth)?;
    }
    dba.add(lat_record)?;
    dba.add(lon_record)?;

    Ok(true)
}

/// Select the time sensor and alias it as `llat_time`
fn select_time_sensor(
    dba: &GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> Option<SensorRecord> {
    let name = select_sensor(
        dba,
        SensorRole::Time,
        &config.timestamp_sensors,
        config.time_sensor.as_deref(),
        reporter,
    )?;
    let source = dba.get(&name)?;
    let mut record =
        SensorRecord::derived_from(source, "llat_time", &name, format!("alias for {name}"));
    record.set_attr("units", "seconds since 1970-01-01 00:00:00Z");
    Some(record)
}

/// Select the pressure sensor and convert it to `llat_pressure` in dbar
fn select_pressure_sensor(
    dba: &GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> Option<SensorRecord> {
    let name = select_sensor(
        dba,
        SensorRole::Pressure,
        &config.pressure_sensors,
        config.pressure_sensor.as_deref(),
        reporter,
    )?;
    let source = dba.get(&name)?;
    let mut record = SensorRecord::derived_from(
        source,
        "llat_pressure",
        &name,
        format!("alias for {name}, multiplied by 10 to convert from bar to dbar"),
    );
    if let Some(raw) = source.data.as_series() {
        record.data = SensorData::Series(raw.iter().map(|v| v * BAR_TO_DBAR).collect());
    }
    record.set_attr("units", "dbar");
    Some(record)
}

/// Select the depth sensor and alias it as `llat_depth`
fn select_depth_sensor(
    dba: &GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> Option<SensorRecord> {
    let name = select_sensor(
        dba,
        SensorRole::Depth,
        &config.depth_sensors,
        config.depth_sensor.as_deref(),
        reporter,
    )?;
    let source = dba.get(&name)?;
    let mut record =
        SensorRecord::derived_from(source, "llat_depth", &name, format!("alias for {name}"));
    record.set_attr("units", "m");
    Some(record)
}

/// Compute positive-down depth from pressure and interpolated latitude
fn depth_from_pressure(pressure: &SensorRecord, latitude: &SensorRecord) -> SensorRecord {
    let p = pressure.data.as_series().unwrap_or(&[]);
    let lat = latitude.data.as_series().unwrap_or(&[]);
    // the equation of state reports height (positive up); depth is its negation
    let depth: Vec<f64> = p
        .iter()
        .zip(lat.iter())
        .map(|(&p, &lat)| -seawater::z_from_p(p, lat))
        .collect();

    let mut record = SensorRecord::series("llat_depth", depth);
    record.set_attr("source_sensor", "llat_pressure,llat_latitude");
    record.set_attr(
        "comment",
        "calculated from llat_pressure and llat_latitude via the equation of state",
    );
    record.set_attr("units", "m");
    record
}
