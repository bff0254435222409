//! Full dba file parsing into a sensor container.
//!
//! Reads the header block, the label lines (sensor names, units, byte
//! widths) and the whitespace-delimited data matrix, producing a
//! [`GliderData`] container with its time base and underwater indices set.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use super::header::{read_header, DbaHeader};
use crate::app::models::{FileMetadata, GliderData, SensorRecord};
use crate::app::series;
use crate::constants::BAR_TO_DBAR;
use crate::{Error, Result};

/// Parse a complete dba file.
///
/// `min_dive_depth` is the depth in meters above which a sample counts as
/// underwater; it feeds the container's underwater index set.
pub fn parse_dba(path: &Path, min_dive_depth: f64) -> Result<GliderData> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("failed to open {}", path.display()), e))?;
    let mut reader = BufReader::new(file);

    let header = read_header(&mut reader, path)?;
    let (names, units) = read_label_lines(&mut reader, &header, path)?;
    let columns = read_data_matrix(&mut reader, header.sensors_per_cycle, path)?;

    let records: Vec<SensorRecord> = names
        .iter()
        .zip(columns)
        .zip(units.iter())
        .map(|((name, column), unit)| {
            let mut record = SensorRecord::series(name.clone(), column);
            record.set_attr("units", unit.clone());
            record
        })
        .collect();

    let metadata = FileMetadata {
        source_file: path.to_path_buf(),
        filename_extension: header.filename_extension.clone(),
        file_code: header.file_code.clone(),
        mission_number: header.mission_number,
        segment_number: header.segment_number,
        filename: header.filename.clone(),
        mission_name: header.mission_name.clone(),
        fileopen_time: header.fileopen_time,
    };

    let mut dba = GliderData::new(records, metadata)?;
    dba.underwater_indices = underwater_indices(&dba, min_dive_depth);
    debug!(
        "Parsed {}: {} sensors, {} cycles, {} underwater",
        path.display(),
        dba.len(),
        dba.ts.len(),
        dba.underwater_indices.len()
    );
    Ok(dba)
}

/// Read the label lines following the header block.
///
/// The first label line carries sensor names, the second units; any further
/// label lines (byte widths) are validated for column count and discarded.
fn read_label_lines<R: BufRead>(
    reader: &mut R,
    header: &DbaHeader,
    path: &Path,
) -> Result<(Vec<String>, Vec<String>)> {
    let mut lines = Vec::with_capacity(header.num_label_lines);
    let mut line = String::new();
    for i in 0..header.num_label_lines {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
        if bytes == 0 {
            return Err(Error::dba_format(
                path.display().to_string(),
                format!("file ended at label line {}", i + 1),
            ));
        }
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if fields.len() != header.sensors_per_cycle {
            return Err(Error::dba_format(
                path.display().to_string(),
                format!(
                    "label line {} has {} fields, expected {}",
                    i + 1,
                    fields.len(),
                    header.sensors_per_cycle
                ),
            ));
        }
        lines.push(fields);
    }

    let mut iter = lines.into_iter();
    let names = iter.next().ok_or_else(|| {
        Error::dba_format(path.display().to_string(), "no sensor name label line")
    })?;
    let units = iter
        .next()
        .unwrap_or_else(|| vec![String::new(); names.len()]);
    Ok((names, units))
}

/// Read the data matrix into per-sensor columns.
///
/// Rows with the wrong field count or unparseable numbers are skipped, not
/// fatal; the instrument truncates the final row of a segment often enough
/// that rejecting the file for it would discard good data.
fn read_data_matrix<R: BufRead>(
    reader: &mut R,
    sensors_per_cycle: usize,
    path: &Path,
) -> Result<Vec<Vec<f64>>> {
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); sensors_per_cycle];
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line.map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != sensors_per_cycle {
            skipped += 1;
            continue;
        }
        let mut row = Vec::with_capacity(sensors_per_cycle);
        let mut ok = true;
        for field in &fields {
            match field.parse::<f64>() {
                Ok(value) => row.push(value),
                Err(_) => {
                    ok = false;
                    break;
                }
            }
        }
        if !ok {
            skipped += 1;
            continue;
        }
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    if skipped > 0 {
        warn!("{}: skipped {} malformed data rows", path.display(), skipped);
    }
    if columns[0].is_empty() {
        return Err(Error::dba_format(
            path.display().to_string(),
            "no data rows",
        ));
    }
    Ok(columns)
}

/// Indices of samples where the vehicle is below `min_dive_depth`.
///
/// Prefers a direct depth reading; falls back to pressure scaled bar to
/// dbar, which is numerically close enough to meters for this gate.
fn underwater_indices(dba: &GliderData, min_dive_depth: f64) -> Vec<usize> {
    let depth: Option<Vec<f64>> = dba
        .data("m_depth")
        .or_else(|| dba.data("m_water_depth"))
        .map(<[f64]>::to_vec)
        .or_else(|| {
            dba.data("sci_water_pressure")
                .or_else(|| dba.data("m_water_pressure"))
                .map(|p| p.iter().map(|v| v * BAR_TO_DBAR).collect())
        });

    match depth {
        Some(depth) => series::finite_indices(&depth)
            .into_iter()
            .filter(|&i| depth[i] > min_dive_depth)
            .collect(),
        None => Vec::new(),
    }
}
