mod args;
mod survey;

use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();
    info!("args: {:?}", args);

    let settings = match survey::Settings::from_args(&args) {
        Ok(s) => s,
        Err(e) => exit_with(e),
    };

    match survey::run_all(&settings) {
        Ok(failures) if failures.is_empty() => {
            info!("all calculations completed");
        }
        Ok(failures) => {
            for (calc, e) in failures.iter() {
                eprintln!("Calculation {} failed: {}", calc, e);
            }
            warn!("{} calculation(s) failed", failures.len());
            std::process::exit(1);
        }
        Err(e) => exit_with(e),
    }
}

fn exit_with(e: survey::SurveyError) -> ! {
    eprintln!("An error occured: {}", e);
    if let Some(bt) = ErrorCompat::backtrace(&e) {
        eprintln!("trace: {}", bt);
    }
    std::process::exit(1)
}
