//! Full-file parsing tests

use tempfile::TempDir;

use crate::app::services::dba_parser::parse_dba;
use crate::app::testutil::write_dba;

const NAN: f64 = f64::NAN;

#[test]
fn parser_builds_container_with_time_base() {
    let dir = TempDir::new().unwrap();
    let path = write_dba(
        dir.path(),
        "01470012",
        "dbd",
        &[("m_present_time", "timestamp"), ("m_depth", "m")],
        &[
            vec![1000.0, 0.2],
            vec![1010.0, 5.0],
            vec![1020.0, 12.0],
            vec![1030.0, 0.3],
        ],
    );

    let dba = parse_dba(&path, 1.0).unwrap();
    assert_eq!(dba.ts, vec![1000.0, 1010.0, 1020.0, 1030.0]);
    assert_eq!(dba.data("m_depth").unwrap()[2], 12.0);
    // only the two samples deeper than a meter count as underwater
    assert_eq!(dba.underwater_indices, vec![1, 2]);
    assert_eq!(dba.get("m_depth").unwrap().attr("units"), Some("m"));
    assert_eq!(dba.file_metadata.mission_number, 147);
}

#[test]
fn parser_reads_nan_samples() {
    let dir = TempDir::new().unwrap();
    let path = write_dba(
        dir.path(),
        "01470012",
        "dbd",
        &[("m_present_time", "timestamp"), ("m_roll", "rad")],
        &[vec![1000.0, NAN], vec![1010.0, 0.12]],
    );

    let dba = parse_dba(&path, 1.0).unwrap();
    let roll = dba.data("m_roll").unwrap();
    assert!(roll[0].is_nan());
    assert_eq!(roll[1], 0.12);
}

#[test]
fn parser_skips_truncated_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_dba(
        dir.path(),
        "01470012",
        "dbd",
        &[("m_present_time", "timestamp"), ("m_depth", "m")],
        &[vec![1000.0, 1.5], vec![1010.0, 2.5]],
    );
    // simulate an interrupted final cycle
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("1020.0\n");
    std::fs::write(&path, content).unwrap();

    let dba = parse_dba(&path, 1.0).unwrap();
    assert_eq!(dba.ts.len(), 2);
}

#[test]
fn parser_requires_time_sensor() {
    let dir = TempDir::new().unwrap();
    let path = write_dba(
        dir.path(),
        "01470012",
        "dbd",
        &[("m_depth", "m")],
        &[vec![1.0]],
    );
    assert!(parse_dba(&path, 1.0).is_err());
}

#[test]
fn parser_rejects_empty_data_section() {
    let dir = TempDir::new().unwrap();
    let path = write_dba(
        dir.path(),
        "01470012",
        "dbd",
        &[("m_present_time", "timestamp")],
        &[],
    );
    assert!(parse_dba(&path, 1.0).is_err());
}

#[test]
fn underwater_indices_fall_back_to_pressure() {
    let dir = TempDir::new().unwrap();
    let path = write_dba(
        dir.path(),
        "01470012",
        "sbd",
        &[
            ("m_present_time", "timestamp"),
            ("sci_water_pressure", "bar"),
        ],
        &[vec![1000.0, 0.05], vec![1010.0, 0.5], vec![1020.0, 1.2]],
    );

    // 0.5 bar = 5 dbar, 1.2 bar = 12 dbar; both beyond the 1 m gate
    let dba = parse_dba(&path, 1.0).unwrap();
    assert_eq!(dba.underwater_indices, vec![1, 2]);
}
