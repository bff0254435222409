//! dba header parsing and segment identification.
//!
//! A dba file opens with a self-describing block of `key: value` tag lines
//! (the tag count is itself one of the tags). Header parsing reads only that
//! block, which makes it cheap enough for the velocity lookahead to probe
//! candidate files without loading their sample data.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::{Error, Result};

/// Number of tag lines to accept before concluding a file is not a dba
const MAX_PROBE_LINES: usize = 32;

fn file_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{8}$").expect("static pattern"))
}

/// Parsed dba header block
#[derive(Debug, Clone)]
pub struct DbaHeader {
    /// All tag lines as written
    pub tags: BTreeMap<String, String>,
    /// Fixed-width 8-character mission+segment code
    pub file_code: String,
    /// Mission number, first four digits of the code
    pub mission_number: u32,
    /// Segment number, remaining digits of the code
    pub segment_number: u32,
    /// Extension of the on-vehicle file (`dbd`, `sbd`, ...)
    pub filename_extension: String,
    /// Long segment filename
    pub filename: String,
    /// Mission name as recorded by the vehicle
    pub mission_name: String,
    /// File open time, when parseable
    pub fileopen_time: Option<DateTime<Utc>>,
    /// Number of sensor columns per data cycle
    pub sensors_per_cycle: usize,
    /// Number of label lines between tags and data
    pub num_label_lines: usize,
}

impl DbaHeader {
    fn require<'a>(tags: &'a BTreeMap<String, String>, key: &str, path: &Path) -> Result<&'a str> {
        tags.get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::dba_header(path.display().to_string(), format!("missing {key} tag")))
    }

    /// Build a typed header from raw tag lines
    pub fn from_tags(tags: BTreeMap<String, String>, path: &Path) -> Result<Self> {
        let file_code = Self::require(&tags, "the8x3_filename", path)?.to_string();
        if !file_code_pattern().is_match(&file_code) {
            return Err(Error::dba_header(
                path.display().to_string(),
                format!("the8x3_filename '{file_code}' is not an 8-digit code"),
            ));
        }
        // First four digits are the mission, the rest the segment
        let mission_number: u32 = file_code[..4].parse().expect("digits checked");
        let segment_number: u32 = file_code[4..].parse().expect("digits checked");

        let filename_extension = Self::require(&tags, "filename_extension", path)?.to_string();
        let filename = Self::require(&tags, "filename", path)?.to_string();
        let mission_name = tags
            .get("mission_name")
            .cloned()
            .unwrap_or_default();

        let sensors_per_cycle: usize = Self::require(&tags, "sensors_per_cycle", path)?
            .parse()
            .map_err(|_| {
                Error::dba_header(path.display().to_string(), "sensors_per_cycle is not a number")
            })?;
        let num_label_lines: usize = Self::require(&tags, "num_label_lines", path)?
            .parse()
            .map_err(|_| {
                Error::dba_header(path.display().to_string(), "num_label_lines is not a number")
            })?;
        if sensors_per_cycle == 0 {
            return Err(Error::dba_header(
                path.display().to_string(),
                "sensors_per_cycle is zero",
            ));
        }

        let fileopen_time = tags.get("fileopen_time").and_then(|v| parse_fileopen_time(v));

        Ok(Self {
            tags,
            file_code,
            mission_number,
            segment_number,
            filename_extension,
            filename,
            mission_name,
            fileopen_time,
            sensors_per_cycle,
            num_label_lines,
        })
    }
}

/// Parse the dba header block from an open reader.
///
/// Leaves the reader positioned at the first label line, so the full parser
/// can continue where the header stopped.
pub fn read_header<R: BufRead>(reader: &mut R, path: &Path) -> Result<DbaHeader> {
    let mut tags = BTreeMap::new();
    let mut num_ascii_tags: Option<usize> = None;
    let mut line = String::new();
    let mut lines_read = 0usize;

    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
        if bytes == 0 {
            return Err(Error::dba_header(
                path.display().to_string(),
                "file ended inside the header block",
            ));
        }
        lines_read += 1;

        let (key, value) = line.split_once(':').ok_or_else(|| {
            Error::dba_header(
                path.display().to_string(),
                format!("malformed tag line {lines_read}: {}", line.trim_end()),
            )
        })?;
        let key = key.trim().to_string();
        let value = value.trim().to_string();

        if key == "num_ascii_tags" {
            let count: usize = value.parse().map_err(|_| {
                Error::dba_header(path.display().to_string(), "num_ascii_tags is not a number")
            })?;
            num_ascii_tags = Some(count);
        }
        tags.insert(key, value);

        if let Some(count) = num_ascii_tags {
            if lines_read >= count {
                break;
            }
        }
        if lines_read >= MAX_PROBE_LINES {
            return Err(Error::dba_header(
                path.display().to_string(),
                "no num_ascii_tags tag within the probe window",
            ));
        }
    }

    DbaHeader::from_tags(tags, path)
}

/// Parse only the header block of a dba file.
///
/// This is the cheap entry point used by the velocity lookahead to decide
/// whether a candidate file belongs to the same mission and the next one or
/// two segments, without paying for its sample data.
pub fn parse_dba_header(path: &Path) -> Result<DbaHeader> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("failed to open {}", path.display()), e))?;
    let mut reader = BufReader::new(file);
    let header = read_header(&mut reader, path)?;
    debug!(
        "Parsed header for {}: code={}, extension={}",
        path.display(),
        header.file_code,
        header.filename_extension
    );
    Ok(header)
}

/// Parse the vehicle's `fileopen_time` stamp (`Thu_Feb_13_14:08:57_2020`,
/// single-digit days doubled-underscore). Unparseable stamps become `None`.
fn parse_fileopen_time(value: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = value.split('_').filter(|p| !p.is_empty()).collect();
    if parts.len() != 5 {
        return None;
    }
    let normalized = format!("{} {} {} {}", parts[1], parts[2], parts[3], parts[4]);
    NaiveDateTime::parse_from_str(&normalized, "%b %e %H:%M:%S %Y")
        .ok()
        .map(|naive| naive.and_utc())
}
