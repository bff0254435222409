//! Data models for Slocum glider processing
//!
//! This module contains the core data structures for representing glider
//! sensor records and the per-segment sensor container, following the Slocum
//! dba file conventions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result};

// =============================================================================
// Sensor Record
// =============================================================================

/// Data payload of a sensor record.
///
/// Almost all records are time series sharing the container's time base.
/// Segment-summary records (mean segment time, nearest position) and resolved
/// velocity components are deliberately scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorData {
    /// Full-length time series aligned with [`GliderData::ts`]
    Series(Vec<f64>),
    /// A single representative value
    Scalar(f64),
}

impl SensorData {
    /// Series samples, or `None` for scalar records
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            SensorData::Series(values) => Some(values),
            SensorData::Scalar(_) => None,
        }
    }

    /// Scalar value, or `None` for series records
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SensorData::Series(_) => None,
            SensorData::Scalar(value) => Some(*value),
        }
    }

    /// Number of samples (1 for scalars)
    pub fn len(&self) -> usize {
        match self {
            SensorData::Series(values) => values.len(),
            SensorData::Scalar(_) => 1,
        }
    }

    /// True when the record holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single named sensor with its attribute metadata and data.
///
/// Records are value objects: derivation always copies a source record before
/// mutating it, never aliases one already stored in a container. Every
/// derived record names the raw sensor(s) it came from in
/// `attrs["source_sensor"]` and documents the applied transform in
/// `attrs["comment"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    /// Sensor name; identity within a container
    pub name: String,
    /// Attribute metadata (units, comment, source_sensor, source_file, ...)
    pub attrs: BTreeMap<String, String>,
    /// Sample data
    pub data: SensorData,
}

impl SensorRecord {
    /// Create a series record with no attributes
    pub fn series(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
            data: SensorData::Series(values),
        }
    }

    /// Create a scalar record with no attributes
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
            data: SensorData::Scalar(value),
        }
    }

    /// Copy a source record into a derived record, stamping provenance.
    ///
    /// The returned record keeps the source data and attributes; callers
    /// transform the data afterwards as needed.
    pub fn derived_from(
        source: &SensorRecord,
        name: impl Into<String>,
        source_sensor: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        let mut record = source.clone();
        record.name = name.into();
        record
            .attrs
            .insert("source_sensor".to_string(), source_sensor.into());
        record.attrs.insert("comment".to_string(), comment.into());
        record
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Attribute lookup
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

// =============================================================================
// File Metadata
// =============================================================================

/// Per-file metadata extracted from a dba header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    /// Path the segment was read from
    pub source_file: PathBuf,
    /// Extension of the original on-vehicle file (`dbd`, `sbd`, ...)
    pub filename_extension: String,
    /// Fixed-width 8-character mission+segment code (e.g. `01470012`)
    pub file_code: String,
    /// Mission number, first four digits of the file code
    pub mission_number: u32,
    /// Segment number, remaining digits of the file code
    pub segment_number: u32,
    /// Long segment filename (e.g. `unit_595-2020-042-1-12`)
    pub filename: String,
    /// Mission name as recorded by the vehicle
    pub mission_name: String,
    /// Time the vehicle opened the file, when parseable
    pub fileopen_time: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Display form of the source path for diagnostics
    pub fn source_display(&self) -> String {
        self.source_file.display().to_string()
    }
}

// =============================================================================
// Glider Data Container
// =============================================================================

/// In-memory sensor container for one segment file.
///
/// Maps sensor name to the most recently added record with that name; adding
/// a record under an existing name replaces it. Holds the primary time base
/// `ts` (always `m_present_time`) and the ordered indices at which the
/// vehicle was submerged.
#[derive(Debug, Clone)]
pub struct GliderData {
    sensors: BTreeMap<String, SensorRecord>,
    /// Primary time base, seconds since the epoch, monotonic non-decreasing
    pub ts: Vec<f64>,
    /// Ordered `ts` indices where the vehicle is underwater
    pub underwater_indices: Vec<usize>,
    /// Source file metadata
    pub file_metadata: FileMetadata,
}

impl GliderData {
    /// Create a container from parsed records.
    ///
    /// `ts` must be present among `records` as `m_present_time`; the
    /// container refuses to exist without its time base.
    pub fn new(records: Vec<SensorRecord>, file_metadata: FileMetadata) -> Result<Self> {
        let mut sensors = BTreeMap::new();
        for record in records {
            sensors.insert(record.name.clone(), record);
        }

        let ts = sensors
            .get("m_present_time")
            .and_then(|r| r.data.as_series())
            .map(<[f64]>::to_vec)
            .ok_or_else(|| {
                Error::container(format!(
                    "no m_present_time series in {}",
                    file_metadata.source_display()
                ))
            })?;

        Ok(Self {
            sensors,
            ts,
            underwater_indices: Vec::new(),
            file_metadata,
        })
    }

    /// Names of all sensors currently in the container
    pub fn sensor_names(&self) -> impl Iterator<Item = &str> {
        self.sensors.keys().map(String::as_str)
    }

    /// Existence test by name
    pub fn has_sensor(&self, name: &str) -> bool {
        self.sensors.contains_key(name)
    }

    /// Record lookup by name
    pub fn get(&self, name: &str) -> Option<&SensorRecord> {
        self.sensors.get(name)
    }

    /// Record lookup with a fallback name, preferring the first
    pub fn get_or(&self, name: &str, fallback: &str) -> Option<&SensorRecord> {
        self.get(name).or_else(|| self.get(fallback))
    }

    /// Series samples by name; `None` for absent or scalar records
    pub fn data(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(|r| r.data.as_series())
    }

    /// Add a record, replacing any record with the same name.
    ///
    /// Series records must match the time base length; scalar records carry
    /// no length constraint.
    pub fn add(&mut self, record: SensorRecord) -> Result<()> {
        if let SensorData::Series(values) = &record.data {
            if values.len() != self.ts.len() {
                return Err(Error::container(format!(
                    "sensor {} has {} samples but the time base has {} in {}",
                    record.name,
                    values.len(),
                    self.ts.len(),
                    self.file_metadata.source_display()
                )));
            }
        }
        self.sensors.insert(record.name.clone(), record);
        Ok(())
    }

    /// Number of sensors in the container
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// True when the container holds no sensors
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Source path shorthand used in diagnostics
    pub fn source_file(&self) -> &Path {
        &self.file_metadata.source_file
    }
}
