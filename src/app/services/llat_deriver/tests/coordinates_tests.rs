//! GPS conversion and interpolation tests

use crate::app::diagnostics::Reporter;
use crate::app::services::llat_deriver::coordinates::{derive_coordinates, iso2deg};
use crate::app::testutil::container;

const NAN: f64 = f64::NAN;

#[test]
fn iso2deg_converts_degree_minutes() {
    // 4430.0 is 44 degrees 30 minutes
    assert!((iso2deg(4430.0) - 44.5).abs() < 1e-12);
    assert!((iso2deg(-4430.0) + 44.5).abs() < 1e-12);
    assert!(iso2deg(NAN).is_nan());
}

#[test]
fn sentinel_fixes_are_nulled_before_conversion() {
    // 9169.123 is in the no-fix range and must never reach the output
    let dba = container(
        "01470001",
        "dbd",
        &[
            ("m_present_time", vec![0.0, 10.0, 20.0]),
            ("m_gps_lat", vec![4430.0, 9169.123, 4431.0]),
            ("m_gps_lon", vec![-7330.0, NAN, -7331.0]),
        ],
    );
    let mut reporter = Reporter::new();
    let (lat, _lon) = derive_coordinates(&dba, &dba.ts, &mut reporter).unwrap();
    let lat = lat.data.as_series().unwrap();

    // interpolated midpoint of the two valid fixes, not the sentinel
    assert!((lat[0] - 44.5).abs() < 1e-9);
    let mid = (44.5 + (44.0 + 31.0 / 60.0)) / 2.0;
    assert!((lat[1] - mid).abs() < 1e-9);
    assert!(lat.iter().all(|v| v.abs() < 90.0), "sentinel leaked: {lat:?}");
}

#[test]
fn coordinates_interpolate_in_time_not_index() {
    let dba = container(
        "01470001",
        "dbd",
        &[
            ("m_present_time", vec![0.0, 1.0, 10.0]),
            ("m_gps_lat", vec![4400.0, NAN, 4430.0]),
            ("m_gps_lon", vec![-7300.0, NAN, -7330.0]),
        ],
    );
    let mut reporter = Reporter::new();
    let (lat, lon) = derive_coordinates(&dba, &dba.ts, &mut reporter).unwrap();
    let lat = lat.data.as_series().unwrap();
    let lon = lon.data.as_series().unwrap();

    // one tenth of the way through the gap, not half
    assert!((lat[1] - (44.0 + 0.05)).abs() < 1e-9);
    assert!((lon[1] - (-73.0 - 0.05)).abs() < 1e-9);
}

#[test]
fn missing_gps_sensor_reports_and_yields_none() {
    let dba = container(
        "01470001",
        "dbd",
        &[
            ("m_present_time", vec![0.0]),
            ("m_gps_lat", vec![4430.0]),
        ],
    );
    let mut reporter = Reporter::new();
    assert!(derive_coordinates(&dba, &dba.ts, &mut reporter).is_none());
    assert_eq!(reporter.warning_count(), 1);
}

#[test]
fn provenance_names_the_raw_sensor() {
    let dba = container(
        "01470001",
        "dbd",
        &[
            ("m_present_time", vec![0.0]),
            ("m_gps_lat", vec![4430.0]),
            ("m_gps_lon", vec![-7330.0]),
        ],
    );
    let mut reporter = Reporter::new();
    let (lat, lon) = derive_coordinates(&dba, &dba.ts, &mut reporter).unwrap();
    assert_eq!(lat.attr("source_sensor"), Some("m_gps_lat"));
    assert_eq!(lon.attr("source_sensor"), Some("m_gps_lon"));
    assert!(lat.attr("comment").unwrap().contains("decimal degrees"));
}
