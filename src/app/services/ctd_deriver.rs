//! Practical salinity and density derivation.
//!
//! Runs after LLAT derivation: consumes `llat_pressure`, the interpolated
//! coordinates and the CTD instrument sensors, and adds `salinity` and
//! `density` time series computed through the reference equation of state.

use tracing::debug;

use crate::app::diagnostics::Reporter;
use crate::app::models::{GliderData, SensorRecord};
use crate::app::series;
use crate::config::SlocumConfig;
use crate::constants::SPM_TO_MSPCM;
use crate::seawater;
use crate::{Error, Result};

/// Derive `salinity` and `density` on `dba`.
///
/// Missing preconditions are reported and yield `Ok(false)` with the
/// container unmodified. A salinity computation that produces no finite
/// sample at all is the unrecoverable CTD state and raises
/// [`Error::CtdProcessing`], so callers can tell it apart from a benign
/// skip.
pub fn derive_ctd(
    dba: &mut GliderData,
    config: &SlocumConfig,
    reporter: &mut Reporter,
) -> Result<bool> {
    // Presence gate over the configured sensor list
    for sensor in &config.required_ctd_sensors {
        if !dba.has_sensor(sensor) {
            reporter.warn_sensor(
                dba.source_file(),
                sensor,
                format!("sensor {sensor} for processing CTD data not found"),
            );
            return Ok(false);
        }
    }

    let Some(pressure) = dba.get("llat_pressure") else {
        reporter.warn_sensor(dba.source_file(), "llat_pressure", "no derived pressure");
        return Ok(false);
    };
    let Some(latitude) = dba.get("llat_latitude") else {
        reporter.warn_sensor(dba.source_file(), "llat_latitude", "no derived latitude");
        return Ok(false);
    };
    let Some(longitude) = dba.get("llat_longitude") else {
        reporter.warn_sensor(dba.source_file(), "llat_longitude", "no derived longitude");
        return Ok(false);
    };
    // Prefer the science instrument, fall back to the flight sensor
    let Some(temperature) = dba.get_or("sci_water_temp", "m_water_temp") else {
        reporter.warn_sensor(dba.source_file(), "sci_water_temp", "no temperature sensor");
        return Ok(false);
    };
    let Some(conductivity) = dba.get_or("sci_water_cond", "m_water_cond") else {
        reporter.warn_sensor(dba.source_file(), "sci_water_cond", "no conductivity sensor");
        return Ok(false);
    };

    // None of the inputs may be entirely empty of data
    for record in [pressure, latitude, longitude, temperature, conductivity] {
        let empty = record
            .data
            .as_series()
            .map(series::all_nan)
            .unwrap_or(true);
        if empty {
            reporter.warn_sensor(
                dba.source_file(),
                &record.name,
                format!("contains no valid {} values", record.name),
            );
            return Ok(false);
        }
    }

    let pres = pressure.data.as_series().expect("checked").to_vec();
    let temp = temperature.data.as_series().expect("checked").to_vec();
    let cond = conductivity.data.as_series().expect("checked").to_vec();
    let temp_name = temperature.name.clone();
    let cond_name = conductivity.name.clone();

    // Fixed reference position for the density calculation
    let mean_lat = series::nan_mean(latitude.data.as_series().expect("checked"));
    let mean_lon = series::nan_mean(longitude.data.as_series().expect("checked"));

    let salinity: Vec<f64> = cond
        .iter()
        .zip(temp.iter())
        .zip(pres.iter())
        .map(|((&c, &t), &p)| seawater::practical_salinity(c * SPM_TO_MSPCM, t, p))
        .collect();

    if series::all_nan(&salinity) {
        return Err(Error::ctd_processing(
            dba.file_metadata.source_display(),
            "practical salinity could not be computed from any sample",
        ));
    }

    let density: Vec<f64> = temp
        .iter()
        .zip(pres.iter())
        .zip(salinity.iter())
        .map(|((&t, &p), &s)| seawater::density_at(s, t, p, mean_lat, mean_lon))
        .collect();

    let mut salinity_record = SensorRecord::series("salinity", salinity);
    for (key, value) in &config.sensor_defs.salinity {
        salinity_record.set_attr(key.clone(), value.clone());
    }
    salinity_record.set_attr(
        "source_sensor",
        format!("{cond_name},{temp_name},llat_pressure"),
    );

    let mut density_record = SensorRecord::series("density", density);
    for (key, value) in &config.sensor_defs.density {
        density_record.set_attr(key.clone(), value.clone());
    }
    density_record.set_attr(
        "source_sensor",
        format!("salinity,{temp_name},llat_pressure,llat_latitude,llat_longitude"),
    );
    density_record.set_attr(
        "reference_position",
        format!("{mean_lat:.5},{mean_lon:.5}"),
    );

    dba.add(salinity_record)?;
    dba.add(density_record)?;
    debug!("{}: derived salinity and density", dba.source_file().display());
    Ok(true)
}
