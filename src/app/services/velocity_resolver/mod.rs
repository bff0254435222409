//! Depth-averaged water velocity resolution.
//!
//! The vehicle estimates the water column's depth-averaged current while
//! diving (`m_initial_water_vx/vy`, refined into `m_water_vx/vy`) and
//! publishes an authoritative value (`m_final_water_vx/vy`) only after it
//! surfaces and completes post-dive processing. The catch: the "final" value
//! recorded in a segment file applies to the *previous* dive, and the
//! current segment's own final value appears one or two segment files later.
//! Until it is recomputed the vehicle republishes the stale number, so only
//! a value that differs from the current file's trailing placeholder can be
//! trusted.
//!
//! Resolution therefore runs one of two strategies:
//!
//! - **initial**: take the most recent finite `m_initial_water_vx/vy` (or
//!   `m_water_vx/vy`) fix from the current file
//! - **final lookahead**: probe the caller-supplied list of later files,
//!   bounded to the same mission and at most two segments ahead, for the
//!   first `m_final_water_vx` sample that differs from the placeholder
//!
//! Candidate files that fail to parse or lack the sensor are skipped; an
//! exhausted scan degrades to the initial strategy on the original file.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::diagnostics::Reporter;
use crate::app::models::{GliderData, SensorData, SensorRecord};
use crate::app::series;
use crate::app::services::dba_parser::SegmentSource;
use crate::constants::{FLIGHT_FULL_EXTENSION, LOOKAHEAD_MAX_SEGMENTS};

/// Final-velocity sensor pair
const FINAL_VX: &str = "m_final_water_vx";
const FINAL_VY: &str = "m_final_water_vy";

/// Resolve eastward (`u`) and northward (`v`) water velocity for a segment.
///
/// `check_files` is the caller's sorted list of segment files following the
/// current one; it is only consulted when the current file is a full flight
/// (`dbd`) segment that carries the final-velocity sensor. Returns `None`
/// when no velocity information exists at all.
pub fn resolve_velocity(
    dba: &GliderData,
    check_files: &[PathBuf],
    source: &dyn SegmentSource,
    reporter: &mut Reporter,
) -> Option<(SensorRecord, SensorRecord)> {
    let eligible = dba.file_metadata.filename_extension == FLIGHT_FULL_EXTENSION
        && !check_files.is_empty()
        && dba.has_sensor(FINAL_VX);

    if eligible {
        final_velocity(dba, check_files, source, reporter)
    } else {
        initial_velocity(dba, reporter)
    }
}

/// Most recent on-board estimate from the current file.
fn initial_velocity(
    dba: &GliderData,
    reporter: &mut Reporter,
) -> Option<(SensorRecord, SensorRecord)> {
    let (vx_name, vy_name) = if dba.has_sensor("m_initial_water_vx") {
        ("m_initial_water_vx", "m_initial_water_vy")
    } else if dba.has_sensor("m_water_vx") {
        ("m_water_vx", "m_water_vy")
    } else {
        reporter.note(dba.source_file(), "no water velocity sensors available");
        return None;
    };
    debug!("attempting to get u & v from {vx_name}/vy");

    let vx_record = dba.get(vx_name)?;
    let Some(vy_record) = dba.get(vy_name) else {
        reporter.warn_sensor(
            dba.source_file(),
            vy_name,
            format!("{vx_name} present without its {vy_name} pair"),
        );
        return None;
    };

    let vx = vx_record.data.as_series()?;
    let vy = vy_record.data.as_series()?;
    // the x-component's most recent fix indexes both components
    let Some(last) = series::last_finite_index(vx) else {
        reporter.warn_sensor(
            dba.source_file(),
            vx_name,
            format!("{vx_name} holds no finite samples"),
        );
        return None;
    };

    let u = tag_component(vx_record, "u", vx_name, vx[last], dba.source_file());
    let v = tag_component(vy_record, "v", vy_name, vy[last], dba.source_file());
    Some((u, v))
}

/// Finalized value retrieved from the next one or two segment files.
fn final_velocity(
    dba: &GliderData,
    check_files: &[PathBuf],
    source: &dyn SegmentSource,
    reporter: &mut Reporter,
) -> Option<(SensorRecord, SensorRecord)> {
    // The trailing finite pair in the current file is the stale placeholder
    // the later files keep republishing until the true value lands.
    let vx = dba.data(FINAL_VX)?;
    let Some(vy) = dba.data(FINAL_VY) else {
        reporter.warn_sensor(
            dba.source_file(),
            FINAL_VY,
            format!("{FINAL_VX} present without its {FINAL_VY} pair"),
        );
        return initial_velocity(dba, reporter);
    };
    let finite = series::finite_indices(vx);
    let Some(&last) = finite.last() else {
        return initial_velocity(dba, reporter);
    };
    let placeholder_x = vx[last];
    let placeholder_y = vy[last];

    let mission = dba.file_metadata.mission_number;
    let segment = dba.file_metadata.segment_number;

    for candidate in check_files {
        debug!(
            "attempting to find final vx & vy in the next data file {}",
            candidate.display()
        );
        let header = match source.peek_header(candidate) {
            Ok(header) => header,
            Err(error) => {
                reporter.note(
                    dba.source_file(),
                    format!("skipping unreadable candidate {}: {error}", candidate.display()),
                );
                continue;
            }
        };
        let ahead = header.segment_number.wrapping_sub(segment);
        if header.mission_number != mission || !(1..=LOOKAHEAD_MAX_SEGMENTS).contains(&ahead) {
            debug!(
                "next data file {} is not the same mission or next {} segments",
                candidate.display(),
                LOOKAHEAD_MAX_SEGMENTS
            );
            continue;
        }

        let next_dba = match source.load(candidate) {
            Ok(next_dba) => next_dba,
            Err(error) => {
                reporter.note(
                    dba.source_file(),
                    format!("skipping unparsable candidate {}: {error}", candidate.display()),
                );
                continue;
            }
        };
        if !next_dba.has_sensor(FINAL_VX) {
            continue;
        }
        let Some(next_vx) = next_dba.data(FINAL_VX) else {
            continue;
        };
        let next_vy = next_dba.data(FINAL_VY).unwrap_or(&[]);

        // Walk the finite x samples for the first one that differs from the
        // placeholder; when several differ, the first wins.
        let next_finite = series::finite_indices(next_vx);
        let changed = next_finite
            .iter()
            .find(|&&i| next_vx[i] != placeholder_x)
            .copied();
        let Some(index) = changed else {
            continue;
        };
        let x = next_vx[index];
        let y = next_vy.get(index).copied().unwrap_or(f64::NAN);
        if (x, y) == (placeholder_x, placeholder_y) {
            continue;
        }

        let vx_record = next_dba.get(FINAL_VX).expect("presence checked");
        let vy_record = next_dba.get(FINAL_VY).unwrap_or(vx_record);
        let u = tag_component(vx_record, "u", FINAL_VX, x, candidate);
        let v = tag_component(vy_record, "v", FINAL_VY, y, candidate);
        return Some((u, v));
    }

    // lookahead exhausted without a changed value
    initial_velocity(dba, reporter)
}

/// Re-tag one velocity component as a scalar `u`/`v` record with provenance
fn tag_component(
    source: &SensorRecord,
    name: &str,
    source_sensor: &str,
    value: f64,
    source_file: &Path,
) -> SensorRecord {
    let mut record = SensorRecord::derived_from(
        source,
        name,
        source_sensor,
        format!("most recent {source_sensor} value"),
    );
    record.data = SensorData::Scalar(value);
    record.set_attr("source_file", source_file.display().to_string());
    record
}
