//! Segment file discovery and loading.
//!
//! Walks a deployment directory for dba segment files, orders them
//! ascending by mission and segment number (the order the velocity
//! lookahead's "next one or two segments" rule assumes), and provides the
//! filesystem-backed [`SegmentSource`] used by that lookahead.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::app::models::GliderData;
use crate::app::services::dba_parser::{self, DbaHeader, SegmentSource};
use crate::constants::SEGMENT_EXTENSIONS;
use crate::Result;

/// A discovered segment file with its already-parsed header
#[derive(Debug, Clone)]
pub struct SegmentFile {
    pub path: PathBuf,
    pub header: DbaHeader,
}

/// Filesystem-backed segment access for the velocity lookahead
#[derive(Debug, Clone, Copy)]
pub struct FilesystemSource {
    min_dive_depth: f64,
}

impl FilesystemSource {
    pub fn new(min_dive_depth: f64) -> Self {
        Self { min_dive_depth }
    }
}

impl SegmentSource for FilesystemSource {
    fn peek_header(&self, path: &Path) -> Result<DbaHeader> {
        dba_parser::parse_dba_header(path)
    }

    fn load(&self, path: &Path) -> Result<GliderData> {
        dba_parser::parse_dba(path, self.min_dive_depth)
    }
}

/// Does this filename look like an ASCII dba segment file?
///
/// Converted files keep the on-vehicle extension somewhere in the dotted
/// name (`unit_595-...-12.dbd.dba`, `...-12.sbd.asc` or a bare `...-12.dbd`).
fn is_segment_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            name.split('.')
                .skip(1)
                .any(|part| SEGMENT_EXTENSIONS.contains(&part))
        })
        .unwrap_or(false)
}

/// Discover all segment files under `dir`, ordered ascending by mission and
/// segment number.
///
/// Files whose header cannot be parsed are reported and left out rather
/// than aborting the scan.
pub fn discover_segments(dir: &Path) -> Result<Vec<SegmentFile>> {
    let mut segments = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("skipping unreadable directory entry: {error}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_segment_file(entry.path()) {
            continue;
        }
        match dba_parser::parse_dba_header(entry.path()) {
            Ok(header) => segments.push(SegmentFile {
                path: entry.path().to_path_buf(),
                header,
            }),
            Err(error) => {
                warn!("{}: not a parseable dba file: {error}", entry.path().display());
            }
        }
    }

    segments.sort_by_key(|segment| {
        (
            segment.header.mission_number,
            segment.header.segment_number,
        )
    });
    debug!("discovered {} segment files under {}", segments.len(), dir.display());
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testutil::write_dba;
    use tempfile::TempDir;

    fn minimal(dir: &Path, code: &str, extension: &str) -> PathBuf {
        write_dba(
            dir,
            code,
            extension,
            &[("m_present_time", "timestamp"), ("m_depth", "m")],
            &[vec![1000.0, 2.0]],
        )
    }

    #[test]
    fn discovery_orders_by_mission_then_segment() {
        let dir = TempDir::new().unwrap();
        minimal(dir.path(), "01470012", "dbd");
        minimal(dir.path(), "01470002", "dbd");
        minimal(dir.path(), "01460099", "dbd");

        let segments = discover_segments(dir.path()).unwrap();
        let codes: Vec<&str> = segments
            .iter()
            .map(|s| s.header.file_code.as_str())
            .collect();
        assert_eq!(codes, vec!["01460099", "01470002", "01470012"]);
    }

    #[test]
    fn discovery_ignores_unrelated_and_broken_files() {
        let dir = TempDir::new().unwrap();
        minimal(dir.path(), "01470001", "sbd");
        std::fs::write(dir.path().join("notes.txt"), "not telemetry").unwrap();
        std::fs::write(dir.path().join("broken.dbd.dba"), "garbage: header\n").unwrap();

        let segments = discover_segments(dir.path()).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].header.file_code, "01470001");
    }

    #[test]
    fn filesystem_source_round_trips_header_and_data() {
        let dir = TempDir::new().unwrap();
        let path = minimal(dir.path(), "01470005", "dbd");

        let source = FilesystemSource::new(1.0);
        let header = source.peek_header(&path).unwrap();
        assert_eq!(header.segment_number, 5);

        let dba = source.load(&path).unwrap();
        assert_eq!(dba.ts.len(), 1);
        assert_eq!(dba.file_metadata.mission_number, 147);
    }
}
