//! dba segment file parsing.
//!
//! Slocum gliders deliver telemetry as self-describing ASCII "dba" segment
//! files: a tag header, label lines naming each sensor column, then a
//! whitespace-delimited data matrix with NaN for missing samples. This
//! module provides two deliberately separate entry points:
//!
//! - [`parse_dba_header`] reads only the tag block, cheap enough to probe
//!   many candidate files during velocity lookahead
//! - [`parse_dba`] loads the full sample matrix into a [`GliderData`]
//!
//! The [`SegmentSource`] trait captures that split as a seam, so the bounded
//! lookahead scan can be exercised against synthetic stand-ins.

pub mod header;
pub mod parser;

#[cfg(test)]
mod tests;

pub use header::{parse_dba_header, DbaHeader};
pub use parser::parse_dba;

use std::path::Path;

use crate::app::models::GliderData;
use crate::Result;

/// Access to segment files by path, split into a cheap header probe and a
/// full load.
pub trait SegmentSource {
    /// Read only the header block of a candidate file
    fn peek_header(&self, path: &Path) -> Result<DbaHeader>;

    /// Load the full sensor data of a candidate file
    fn load(&self, path: &Path) -> Result<GliderData>;
}
