//! Desktop operator console for the brake-rs bend calculator.
//!
//! Rebuilds every gauge's calibration from the sample log on start-up, then
//! reads commands from stdin. See [`console`] for the command set.
//!
//! ```bash
//! RUST_LOG=info cargo run -p brake-station -- --log-file shop/bending_data.txt
//! cargo run -p brake-station -- --config station.json
//! ```

mod console;
mod file_log;
mod settings;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use brake_core::calculator::BendCalculator;

use crate::console::{Console, Flow, HELP};
use crate::file_log::FileLog;

#[derive(Parser, Debug)]
#[command(name = "brake-station", about = "Press brake BND point calculator")]
struct Args {
    /// JSON config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample log path, overriding the config's `log_file`
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match settings::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let log_path = args
        .log_file
        .unwrap_or_else(|| PathBuf::from(&config.log_file));
    let log = FileLog::new(log_path);
    info!("Using sample log {}", log.path().display());

    let (calculator, report) = match BendCalculator::on_startup(log, &config) {
        Ok(started) => started,
        Err(e) => {
            error!("{}", e);
            eprintln!("cannot start: {e}");
            return ExitCode::FAILURE;
        }
    };

    for skipped in &report.skipped {
        warn!("{}", skipped);
    }
    println!(
        "{} observations loaded, {} of {} gauges calibrated",
        report.records, report.fitted, report.gauges
    );
    if !report.skipped.is_empty() {
        println!("{} unreadable log lines ignored", report.skipped.len());
    }
    println!("{HELP}");

    let mut console = Console::new(calculator, config);
    match run(&mut console) {
        Ok(()) => {
            info!("Station exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Console I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(console: &mut Console<FileLog>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        if console.execute(&line?, &mut stdout)? == Flow::Quit {
            break;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}
