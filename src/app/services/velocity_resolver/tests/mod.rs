//! Tests for water velocity resolution


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::app::models::GliderData;
use crate::app::services::dba_parser::{DbaHeader, SegmentSource};
use crate::{Error, Result};

/// In-memory stand-in for the segment file store
pub struct StubSource {
    segments: Vec<(PathBuf, GliderData)>,
    broken: Vec<PathBuf>,
}

impl StubSource {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            broken: Vec::new(),
        }
    }

    pub fn with_segment(mut self, dba: GliderData) -> Self {
        self.segments
            .push((dba.file_metadata.source_file.clone(), dba));
        self
    }

    /// Register a path that fails both header probe and full load
    pub fn with_broken(mut self, path: impl Into<PathBuf>) -> Self {
        self.broken.push(path.into());
        self
    }

    fn find(&self, path: &Path) -> Result<&GliderData> {
        if self.broken.iter().any(|p| p == path) {
            return Err(Error::dba_header(
                path.display().to_string(),
                "synthetic parse failure",
            ));
        }
        self.segments
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, dba)| dba)
            .ok_or_else(|| Error::dba_header(path.display().to_string(), "no such segment"))
    }
}

impl SegmentSource for StubSource {
    fn peek_header(&self, path: &Path) -> Result<DbaHeader> {
        let dba = self.find(path)?;
        let meta = &dba.file_metadata;
        Ok(DbaHeader {
            tags: BTreeMap::new(),
            file_code: meta.file_code.clone(),
            mission_number: meta.mission_number,
            segment_number: meta.segment_number,
            filename_extension: meta.filename_extension.clone(),
            filename: meta.filename.clone(),
            mission_name: meta.mission_name.clone(),
            fileopen_time: meta.fileopen_time,
            sensors_per_cycle: dba.len(),
            num_label_lines: 3,
        })
    }

    fn load(&self, path: &Path) -> Result<GliderData> {
        self.find(path).cloned()
    }
}
