//! Slocum Processor Library
//!
//! A Rust library for deriving standardized science variables from Slocum
//! glider dba telemetry segment files.
//!
//! This library provides tools for:
//! - Parsing Slocum dba segment files with proper header/label/data handling
//! - Selecting the best available raw sensor for a logical role under a
//!   priority fallback policy
//! - Converting GPS fixes to decimal degrees and interpolating them in time
//! - Deriving depth, practical salinity and density through a reference
//!   equation of state
//! - Resolving depth-averaged water velocity, including bounded lookahead
//!   into later segment files for the finalized value
//! - Compensating raw oxygen concentration for salinity and pressure

pub mod config;
pub mod constants;
pub mod seawater;

// Core application modules
pub mod app {
    pub mod diagnostics;
    pub mod models;
    pub mod series;
    #[cfg(test)]
    pub mod testutil;
    pub mod services {
        pub mod attitude;
        pub mod ctd_deriver;
        pub mod dba_parser;
        pub mod file_checks;
        pub mod llat_deriver;
        pub mod oxygen;
        pub mod segment_summary;
        pub mod velocity_resolver;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{GliderData, SensorData, SensorRecord};
pub use config::SlocumConfig;

/// Result type alias for the Slocum processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Slocum processing operations
///
/// Missing optional sensors and failed derivation preconditions are *not*
/// represented here; those are reported through
/// [`app::diagnostics::Reporter`] and the affected derivation simply
/// produces no output. `Error` is reserved for states the pipeline cannot
/// continue from: unreadable or malformed input files, broken configuration
/// and the unrecoverable CTD state.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// dba file format error
    #[error("dba format error in file '{file}': {message}")]
    DbaFormat { file: String, message: String },

    /// dba header parsing error
    #[error("dba header error in file '{file}': {message}")]
    DbaHeader { file: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// CTD processing failed in a way no fallback can recover from.
    ///
    /// Distinct from a benign skip (missing sensors, no oxygen data): when
    /// this is raised, salinity/density could not be computed at all and the
    /// segment's science output is unusable.
    #[error("CTD processing error in file '{file}': {message}")]
    CtdProcessing { file: String, message: String },

    /// Container invariant violation (series length, missing time base)
    #[error("Sensor container error: {message}")]
    Container { message: String },

    /// JSON serialization error for summary output
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a dba format error
    pub fn dba_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DbaFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a dba header error
    pub fn dba_header(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DbaHeader {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unrecoverable CTD processing error
    pub fn ctd_processing(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CtdProcessing {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a container error
    pub fn container(message: impl Into<String>) -> Self {
        Self::Container {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
