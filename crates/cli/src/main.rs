//! Scheduling simulator CLI.
//!
//! This binary is the front end for `schedsim-core`. It performs:
//! 1. **Configuration upload:** Parse and range-check the `.cnf` file.
//! 2. **Display:** Optionally show the parsed configuration and program.
//! 3. **Run:** Build the simulation and replay it, with the trace routed to
//!    the monitor, the configured log file, or both.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use schedsim_cli::config_file::FileConfig;
use schedsim_cli::logger::TraceLogger;
use schedsim_cli::metadata::{ProgramDisplay, load_program};
use schedsim_core::Simulation;
use schedsim_core::config::LogDestination;
use schedsim_core::sim::pacing::{NoPacing, Pacer, ThreadPacer};

#[derive(Parser, Debug)]
#[command(
    name = "schedsim",
    version,
    about = "OS process scheduling simulator",
    long_about = "Replay a program of simulated CPU, device, and memory operations under a \
chosen scheduling policy.\n\nExamples:\n  schedsim config.cnf --run\n  schedsim config.cnf \
--show-config --show-program\n  schedsim config.cnf --run --pace --stats"
)]
struct Cli {
    /// Configuration file (.cnf).
    config: PathBuf,

    /// Display the parsed configuration.
    #[arg(short = 'c', long)]
    show_config: bool,

    /// Display the parsed program.
    #[arg(short = 'm', long)]
    show_program: bool,

    /// Run the simulation.
    #[arg(short = 'r', long)]
    run: bool,

    /// Pace each advanced time step in real time (one wall-clock ms per
    /// simulated ms).
    #[arg(long)]
    pace: bool,

    /// Print run statistics after completion.
    #[arg(long)]
    stats: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.show_config && !cli.show_program && !cli.run {
        eprintln!("schedsim — nothing to do");
        eprintln!();
        eprintln!("  schedsim <config.cnf> --run            Run the simulation");
        eprintln!("  schedsim <config.cnf> --show-config    Display the configuration");
        eprintln!("  schedsim <config.cnf> --show-program   Display the program");
        eprintln!();
        eprintln!("  schedsim --help  for full options");
        process::exit(1);
    }

    println!("Simulator Program");
    println!("=================");
    println!();

    let file_config = FileConfig::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });

    if cli.show_config {
        println!("{file_config}");
        println!();
    }

    if !cli.show_program && !cli.run {
        return;
    }

    let program_path = sibling_path(&cli.config, &file_config.program_path);
    let program = load_program(&program_path).unwrap_or_else(|e| {
        eprintln!(
            "\n[!] FATAL: {} ({e})",
            program_path.display()
        );
        process::exit(1);
    });

    if cli.show_program {
        println!("{}", ProgramDisplay(&program));
        println!();
    }

    if !cli.run {
        return;
    }

    let log_path = sibling_path(&cli.config, &file_config.log_path);
    let mut logger = TraceLogger::new(file_config.config.log_to, log_path);
    let mut pacer: Box<dyn Pacer> = if cli.pace {
        Box::new(ThreadPacer)
    } else {
        Box::new(NoPacing)
    };

    if file_config.config.log_to == LogDestination::File {
        println!("Completing logging process, please wait...");
    }

    let mut simulation = Simulation::new(&program, file_config.config.clone());
    let stats = simulation
        .run(&mut logger, pacer.as_mut())
        .unwrap_or_else(|e| {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        });

    logger.finish().unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: could not write log file: {e}");
        process::exit(1);
    });

    if cli.stats {
        println!();
        println!("{stats}");
    }

    println!("-----------------");
    println!();
    println!("Simulator End");
}

/// Resolves a path from the configuration file relative to the file itself.
fn sibling_path(config: &Path, referenced: &str) -> PathBuf {
    let referenced = Path::new(referenced);
    if referenced.is_absolute() {
        referenced.to_path_buf()
    } else {
        config
            .parent()
            .map_or_else(|| referenced.to_path_buf(), |dir| dir.join(referenced))
    }
}
