//! Batch orchestration over a deployment directory.
//!
//! Runs the derivation pipeline file by file in ascending mission/segment
//! order: parse, goodness gate, LLAT derivation, attitude, CTD, velocity
//! resolution (handing the next two files to the lookahead), segment
//! summary and oxygen compensation. Emits one JSON summary line per segment
//! and a colored closing report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, info};

use crate::app::adapters::filesystem::{discover_segments, FilesystemSource, SegmentFile};
use crate::app::diagnostics::{Reporter, Severity};
use crate::app::services::{
    attitude, ctd_deriver, dba_parser, file_checks, llat_deriver, oxygen, segment_summary,
    velocity_resolver,
};
use crate::cli::args::{Args, Commands, ProcessArgs};
use crate::config::SlocumConfig;
use crate::{Error, Result};

/// Totals for the closing report
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
}

/// One JSON summary line per segment
#[derive(Debug, Serialize)]
struct SegmentReport {
    source_file: String,
    file_code: String,
    mission_number: u32,
    segment_number: u32,
    sensors: usize,
    cycles: usize,
    llat_derived: bool,
    ctd_derived: bool,
    oxygen_derived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    u: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    v: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    velocity_source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_uv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lat_uv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lon_uv: Option<f64>,
    warnings: Vec<String>,
}

/// Entry point for all subcommands
pub fn run(args: Args) -> Result<ProcessingStats> {
    match args.command {
        Some(Commands::Process(process_args)) => process(process_args),
        None => Err(Error::configuration("no command given; see --help")),
    }
}

/// The process command: derive science variables for every segment file
pub fn process(args: ProcessArgs) -> Result<ProcessingStats> {
    let config = build_config(&args)?;
    let segments = discover_segments(&args.input_path)?;
    if segments.is_empty() {
        return Err(Error::configuration(format!(
            "no dba segment files found under {}",
            args.input_path.display()
        )));
    }
    info!(
        "processing {} segment files from {}",
        segments.len(),
        args.input_path.display()
    );

    let mut writer: Box<dyn Write> = match &args.output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            Error::io(format!("failed to create {}", path.display()), e)
        })?)),
        None => Box::new(std::io::stdout()),
    };

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(segments.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .expect("static template")
            .progress_chars("=>-"),
        );
        bar
    };

    let source = FilesystemSource::new(config.min_dive_depth);
    let mut stats = ProcessingStats::default();

    for (index, segment) in segments.iter().enumerate() {
        progress.set_message(segment.header.file_code.clone());
        // the lookahead may read one or two files past the current one
        let check_files: Vec<PathBuf> = segments[index + 1..]
            .iter()
            .take(2)
            .map(|s| s.path.clone())
            .collect();

        match process_segment(segment, &check_files, &source, &config, &args) {
            Ok(Some(report)) => {
                stats.processed += 1;
                stats.warnings += report.warnings.len();
                let line = serde_json::to_string(&report)?;
                writeln!(writer, "{line}")?;
            }
            Ok(None) => stats.skipped += 1,
            Err(err) => {
                stats.failed += 1;
                error!("{}: {err}", segment.path.display());
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    writer.flush()?;

    print_summary(&stats);
    Ok(stats)
}

fn build_config(args: &ProcessArgs) -> Result<SlocumConfig> {
    let mut config = match &args.config_path {
        Some(path) => SlocumConfig::from_file(path)?,
        None => SlocumConfig::default(),
    };
    if let Some(sensor) = &args.time_sensor {
        config = config.with_time_sensor(sensor.clone());
    }
    if let Some(sensor) = &args.pressure_sensor {
        config = config.with_pressure_sensor(sensor.clone());
    }
    if let Some(sensor) = &args.depth_sensor {
        config = config.with_depth_sensor(sensor.clone());
    }
    if args.no_z_from_p {
        config = config.with_z_from_p(false);
    }
    config.validate()?;
    Ok(config)
}

/// Run the full derivation pipeline on one segment.
///
/// `Ok(None)` means the file was skipped by the goodness gate.
fn process_segment(
    segment: &SegmentFile,
    check_files: &[PathBuf],
    source: &FilesystemSource,
    config: &SlocumConfig,
    args: &ProcessArgs,
) -> Result<Option<SegmentReport>> {
    let mut reporter = Reporter::new();
    let mut dba = dba_parser::parse_dba(&segment.path, config.min_dive_depth)?;

    let check = file_checks::check_file_goodness(&dba, config, &mut reporter);
    if !check.file_good && !args.keep_bad_files {
        info!("{}: skipped by goodness checks", segment.path.display());
        return Ok(None);
    }

    let llat_derived = llat_deriver::create_llat_sensors(&mut dba, config, &mut reporter)?;
    attitude::derive_pitch_roll(&mut dba, config.attitude_fill, &mut reporter)?;
    let ctd_derived = ctd_deriver::derive_ctd(&mut dba, config, &mut reporter)?;

    let velocity =
        velocity_resolver::resolve_velocity(&dba, check_files, source, &mut reporter);
    let summary = segment_summary::segment_time_and_position(&dba);
    let oxygen_derived = oxygen::compensate_oxygen(&mut dba, &mut reporter)?;

    let (u, v, velocity_source_file) = match &velocity {
        Some((u, v)) => (
            u.data.as_scalar(),
            v.data.as_scalar(),
            u.attr("source_file").map(str::to_string),
        ),
        None => (None, None, None),
    };

    let warnings = reporter
        .take_events()
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.to_string())
        .collect();

    Ok(Some(SegmentReport {
        source_file: segment.path.display().to_string(),
        file_code: dba.file_metadata.file_code.clone(),
        mission_number: dba.file_metadata.mission_number,
        segment_number: dba.file_metadata.segment_number,
        sensors: dba.len(),
        cycles: dba.ts.len(),
        llat_derived,
        ctd_derived,
        oxygen_derived,
        u,
        v,
        velocity_source_file,
        time_uv: summary.as_ref().map(|s| s.time()),
        lat_uv: summary.as_ref().map(|s| s.latitude()),
        lon_uv: summary.as_ref().map(|s| s.longitude()),
        warnings,
    }))
}

fn print_summary(stats: &ProcessingStats) {
    println!();
    println!("{}", "Processing complete".bold());
    println!("  {} {}", "processed:".green(), stats.processed);
    println!("  {} {}", "skipped:".yellow(), stats.skipped);
    if stats.failed > 0 {
        println!("  {} {}", "failed:".red(), stats.failed);
    }
    println!("  {} {}", "warnings:".cyan(), stats.warnings);
}
