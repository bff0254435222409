//! Oxygen salinity and pressure compensation.
//!
//! Optode oxygen readings assume fresh water at the surface. Compensation
//! interpolates the CTD-derived companions onto the oxygen sample times,
//! converts from volume to mass units via potential density, then applies
//! the pressure term and the Garcia and Gordon (1992) combined-fit salinity
//! term.

use crate::app::diagnostics::Reporter;
use crate::app::models::{GliderData, SensorData, SensorRecord};
use crate::app::series;
use crate::constants::OXYGEN_SENSOR;
use crate::seawater;
use crate::Result;

/// Garcia and Gordon (1992) combined-fit salinity coefficients
const B0: f64 = -6.24097e-3;
const B1: f64 = -6.93498e-3;
const B2: f64 = -6.90358e-3;
const B3: f64 = -4.29155e-3;
const C0: f64 = -3.11680e-7;

/// Pressure term: linear in pressure with a positive coefficient, so the
/// factor grows monotonically with depth
pub fn pressure_correction(p_dbar: f64) -> f64 {
    1.0 + (0.032 * p_dbar) / 1000.0
}

/// Salinity term of the combined fit, at reference salinity zero
pub fn salinity_correction(sp: f64, t: f64) -> f64 {
    let ts = ((298.15 - t) / (273.15 + t)).ln();
    let bts = B0 + B1 * ts + B2 * ts.powi(2) + B3 * ts.powi(3);
    (sp * bts + C0 * sp.powi(2)).exp()
}

/// Compensate raw oxygen for salinity and pressure, adding an `oxygen`
/// record in mass units.
///
/// A file without the oxygen sensor is not an error; the pipeline simply
/// continues without oxygen. Missing CTD-derived companions are reported
/// and skip the step the same way.
pub fn compensate_oxygen(dba: &mut GliderData, reporter: &mut Reporter) -> Result<bool> {
    if !dba.has_sensor(OXYGEN_SENSOR) {
        reporter.warn_sensor(dba.source_file(), OXYGEN_SENSOR, "oxygen data not found");
        return Ok(false);
    }
    for companion in [
        "salinity",
        "llat_pressure",
        "sci_water_temp",
        "llat_latitude",
        "llat_longitude",
    ] {
        if !dba.has_sensor(companion) {
            reporter.warn_sensor(
                dba.source_file(),
                companion,
                format!("{companion} required for oxygen compensation not found"),
            );
            return Ok(false);
        }
    }

    let oxygen_record = dba.get(OXYGEN_SENSOR).expect("presence checked").clone();
    let oxy = oxygen_record.data.as_series().unwrap_or(&[]).to_vec();
    // science timestamps when the optode has its own clock line, else the
    // flight time base
    let timestamps = dba
        .data("sci_m_present_time")
        .map(<[f64]>::to_vec)
        .unwrap_or_else(|| dba.ts.clone());

    let oxy_ii = series::finite_indices(&oxy);
    if oxy_ii.is_empty() {
        reporter.warn_sensor(
            dba.source_file(),
            OXYGEN_SENSOR,
            "oxygen sensor holds no finite samples",
        );
        return Ok(false);
    }
    let oxy_ts: Vec<f64> = oxy_ii.iter().map(|&i| timestamps[i]).collect();

    let sp = series::interp_at(&oxy_ts, &timestamps, dba.data("salinity").expect("checked"));
    let p = series::interp_at(
        &oxy_ts,
        &timestamps,
        dba.data("llat_pressure").expect("checked"),
    );
    let t = series::interp_at(
        &oxy_ts,
        &timestamps,
        dba.data("sci_water_temp").expect("checked"),
    );

    // coordinates were densely interpolated upstream; index, don't interpolate
    let lon_full = dba.data("llat_longitude").expect("checked");
    let lat_full = dba.data("llat_latitude").expect("checked");
    let lon: Vec<f64> = oxy_ii.iter().map(|&i| lon_full[i]).collect();
    let lat: Vec<f64> = oxy_ii.iter().map(|&i| lat_full[i]).collect();

    let mut corrected = vec![f64::NAN; oxy.len()];
    for (k, &i) in oxy_ii.iter().enumerate() {
        let sa = seawater::absolute_salinity_at(sp[k], p[k], lon[k], lat[k]);
        let ct = seawater::conservative_temperature(sp[k], t[k], p[k]);
        let pdens = seawater::potential_density_from_ct(sa, ct);

        // volume to mass units
        let mut do_umol = 1000.0 * oxy[i] / pdens;
        do_umol *= pressure_correction(p[k]);
        do_umol *= salinity_correction(sp[k], t[k]);
        corrected[i] = do_umol;
    }

    let mut record = SensorRecord::derived_from(
        &oxygen_record,
        "oxygen",
        OXYGEN_SENSOR,
        "Oxygen concentration has been compensated for salinity and pressure, \
         but has not been corrected for the depth offset due to pitch of the \
         glider and sensor offset from the CTD.",
    );
    record.data = SensorData::Series(corrected);
    record.set_attr("units", "umol kg-1");
    dba.add(record)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testutil::container;

    const NAN: f64 = f64::NAN;

    fn oxygen_ready() -> GliderData {
        container(
            "01470001",
            "dbd",
            &[
                ("m_present_time", vec![0.0, 10.0, 20.0, 30.0]),
                ("sci_m_present_time", vec![0.0, 10.0, 20.0, 30.0]),
                ("sci_oxy4_oxygen", vec![NAN, 220.0, NAN, 240.0]),
                ("salinity", vec![35.0, 35.0, 35.1, 35.1]),
                ("llat_pressure", vec![0.0, 20.0, 40.0, 60.0]),
                ("sci_water_temp", vec![15.0, 14.5, 14.0, 13.5]),
                ("llat_latitude", vec![44.5, 44.5, 44.5, 44.5]),
                ("llat_longitude", vec![-73.5, -73.5, -73.5, -73.5]),
            ],
        )
    }

    #[test]
    fn corrected_record_keeps_shape_and_gaps() {
        let mut dba = oxygen_ready();
        let mut reporter = Reporter::new();
        assert!(compensate_oxygen(&mut dba, &mut reporter).unwrap());

        let oxygen = dba.data("oxygen").unwrap();
        assert_eq!(oxygen.len(), 4);
        assert!(oxygen[0].is_nan());
        assert!(oxygen[2].is_nan());
        assert!(oxygen[1].is_finite());
        assert!(oxygen[3].is_finite());

        let record = dba.get("oxygen").unwrap();
        assert_eq!(record.attr("units"), Some("umol kg-1"));
        assert_eq!(record.attr("source_sensor"), Some("sci_oxy4_oxygen"));
    }

    #[test]
    fn corrected_values_are_plausible_mass_units() {
        let mut dba = oxygen_ready();
        let mut reporter = Reporter::new();
        compensate_oxygen(&mut dba, &mut reporter).unwrap();

        // 220 umol/L of seawater is a bit over 214 umol/kg before the
        // (downward) salinity correction; expect the same order of magnitude
        let oxygen = dba.data("oxygen").unwrap();
        assert!(oxygen[1] > 150.0 && oxygen[1] < 230.0, "got {}", oxygen[1]);
    }

    #[test]
    fn pressure_correction_is_monotonic_in_pressure() {
        let mut last = pressure_correction(0.0);
        assert_eq!(last, 1.0);
        for p in [10.0, 100.0, 500.0, 1000.0] {
            let factor = pressure_correction(p);
            assert!(factor > last);
            last = factor;
        }
    }

    #[test]
    fn salinity_correction_shrinks_with_salinity() {
        // the combined-fit coefficients are negative, so saltier water
        // means a smaller factor
        let fresh = salinity_correction(0.0, 15.0);
        let salty = salinity_correction(35.0, 15.0);
        assert_eq!(fresh, 1.0);
        assert!(salty < fresh);
        assert!(salty > 0.5);
    }

    #[test]
    fn missing_oxygen_sensor_is_benign() {
        let mut dba = container("01470001", "dbd", &[("m_present_time", vec![0.0])]);
        let mut reporter = Reporter::new();
        let produced = compensate_oxygen(&mut dba, &mut reporter).unwrap();
        assert!(!produced);
        assert_eq!(reporter.warning_count(), 1);
        assert!(!dba.has_sensor("oxygen"));
    }

    #[test]
    fn missing_companion_skips_compensation() {
        let mut dba = container(
            "01470001",
            "dbd",
            &[
                ("m_present_time", vec![0.0, 10.0]),
                ("sci_oxy4_oxygen", vec![210.0, 215.0]),
            ],
        );
        let mut reporter = Reporter::new();
        assert!(!compensate_oxygen(&mut dba, &mut reporter).unwrap());
        let warning = reporter.warnings().next().unwrap();
        assert_eq!(warning.sensor.as_deref(), Some("salinity"));
    }
}
