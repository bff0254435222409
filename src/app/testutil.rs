//! Shared fixtures for unit tests: synthetic dba files and in-memory
//! containers.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::models::{FileMetadata, GliderData, SensorRecord};

/// Render one sample the way dbd2asc does
fn format_sample(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value}")
    }
}

/// Write a synthetic dba segment file.
///
/// `sensors` pairs sensor names with units; `rows` is the data matrix in
/// cycle order. Returns the path of the written file.
pub fn write_dba(
    dir: &Path,
    file_code: &str,
    extension: &str,
    sensors: &[(&str, &str)],
    rows: &[Vec<f64>],
) -> PathBuf {
    let filename = format!("unit_595-2020-042-{}-{}", &file_code[..4], &file_code[4..]);
    let mut content = String::new();
    writeln!(content, "dbd_label:    DBD_ASC(dinkum_binary_data_ascii)file").unwrap();
    writeln!(content, "encoding_ver: 2").unwrap();
    writeln!(content, "num_ascii_tags: 12").unwrap();
    writeln!(content, "all_sensors:  0").unwrap();
    writeln!(content, "filename:     {filename}").unwrap();
    writeln!(content, "the8x3_filename: {file_code}").unwrap();
    writeln!(content, "filename_extension: {extension}").unwrap();
    writeln!(content, "mission_name: TRANS.MI").unwrap();
    writeln!(content, "fileopen_time: Thu_Feb_13_14:08:57_2020").unwrap();
    writeln!(content, "sensors_per_cycle: {}", sensors.len()).unwrap();
    writeln!(content, "num_label_lines: 3").unwrap();
    writeln!(content, "num_segments: 1").unwrap();

    let names: Vec<&str> = sensors.iter().map(|(name, _)| *name).collect();
    let units: Vec<&str> = sensors.iter().map(|(_, unit)| *unit).collect();
    writeln!(content, "{}", names.join(" ")).unwrap();
    writeln!(content, "{}", units.join(" ")).unwrap();
    writeln!(content, "{}", vec!["4"; sensors.len()].join(" ")).unwrap();

    for row in rows {
        assert_eq!(row.len(), sensors.len(), "row width must match sensor count");
        let fields: Vec<String> = row.iter().map(|v| format_sample(*v)).collect();
        writeln!(content, "{}", fields.join(" ")).unwrap();
    }

    let path = dir.join(format!("{filename}.{extension}.dba"));
    fs::write(&path, content).unwrap();
    path
}

/// Metadata for an in-memory container without a backing file
pub fn metadata(file_code: &str, extension: &str) -> FileMetadata {
    FileMetadata {
        source_file: PathBuf::from(format!("/data/test-{file_code}.{extension}")),
        filename_extension: extension.to_string(),
        file_code: file_code.to_string(),
        mission_number: file_code[..4].parse().unwrap(),
        segment_number: file_code[4..].parse().unwrap(),
        filename: format!("unit_595-2020-042-{}-{}", &file_code[..4], &file_code[4..]),
        mission_name: "TRANS.MI".to_string(),
        fileopen_time: None,
    }
}

/// Build an in-memory container from named series.
///
/// `m_present_time` must be among the sensors.
pub fn container(file_code: &str, extension: &str, sensors: &[(&str, Vec<f64>)]) -> GliderData {
    let records = sensors
        .iter()
        .map(|(name, values)| SensorRecord::series(*name, values.clone()))
        .collect();
    GliderData::new(records, metadata(file_code, extension)).unwrap()
}
