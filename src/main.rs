use clap::Parser;
use slocum_processor::cli::{args::Args, commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Respect RUST_LOG, defaulting to warnings from this crate
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("slocum_processor=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(_stats) => {
            // Success - the closing report has already been printed
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {error:#}");
            process::exit(1);
        }
    }
}

/// Show help information when no subcommand is provided
fn show_help_and_commands() {
    println!("Slocum Processor - Glider Telemetry Science Variable Derivation");
    println!("===============================================================");
    println!();
    println!("Derive standardized science variables (position, depth, salinity,");
    println!("density, oxygen, depth-averaged velocity) from Slocum glider dba");
    println!("segment files.");
    println!();
    println!("USAGE:");
    println!("    slocum-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process a directory of dba segment files");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Process a deployment directory:");
    println!("    slocum-processor process --input /data/deployment --output summaries.jsonl");
    println!();
    println!("    # Keep the vehicle's own depth sensor instead of depth-from-pressure:");
    println!("    slocum-processor process --input /data/deployment --no-z-from-p");
    println!();
    println!("For detailed help on any command, use:");
    println!("    slocum-processor <COMMAND> --help");
}
