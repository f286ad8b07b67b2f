//! gangsheet CLI
//!
//! Usage:
//!   gangsheet [OPTIONS] <JOB>
//!
//! Options:
//!   -s, --svg <FILE>  Write an SVG preview of the filled canvases
//!   -p, --plan-only   Print the plan without placing anything
//!   -v, --verbose     Log planner decisions
//!   -h, --help        Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use gangsheet::{render_preview, run, stage_artwork, Job, MemoryHost, RunConfig, SvgConfig};

#[derive(Parser)]
#[command(name = "gangsheet")]
#[command(about = "Tile garment artwork onto print canvases")]
struct Cli {
    /// Job file (TOML format)
    job: PathBuf,

    /// Write an SVG preview of the filled canvases
    #[arg(short, long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Print the plan without placing anything
    #[arg(short, long)]
    plan_only: bool,

    /// Log planner decisions
    #[arg(short, long)]
    verbose: bool,
}

/// `RUST_LOG` wins when set; otherwise warnings, or everything down to
/// debug with `--verbose`
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "warn" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(log_filter(verbose, rust_log.as_deref()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let job = match Job::from_file(&cli.job) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error loading job '{}': {}", cli.job.display(), e);
            std::process::exit(1);
        }
    };

    let mut host = MemoryHost::new();
    let canvas = match stage_artwork(&mut host, &job) {
        Ok(canvas) => canvas,
        Err(e) => {
            eprintln!("Error preparing artwork: {}", e);
            std::process::exit(1);
        }
    };

    let config = RunConfig::new()
        .with_artwork_canvas(canvas.id)
        .with_plan_only(cli.plan_only);
    let summary = match run(&mut host, &job, &config) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    print!("{}", summary);

    if let Some(path) = &cli.svg {
        let svg = match render_preview(&host, &SvgConfig::default()) {
            Ok(svg) => svg,
            Err(e) => {
                eprintln!("Error rendering preview: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = fs::write(path, svg) {
            eprintln!("Error writing '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
