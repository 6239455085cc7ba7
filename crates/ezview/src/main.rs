use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;

use ezview_engine::logging::{init_logging, LoggingConfig};
use ezview_engine::ViewerConfig;

/// View a PPM (P3 or P6) image; arrows zoom/rotate, WASD pans, X/Y shear, Esc quits.
#[derive(Parser, Debug)]
#[command(name = "ezview", version, about)]
struct Args {
    /// Path to the .ppm file to display
    path: PathBuf,
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("ezview: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let image = ezview_ppm::read_file(&args.path)
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    ezview_engine::run(image, ViewerConfig::default())
}
