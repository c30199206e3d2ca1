use clap::Parser;
use log::{info, LevelFilter};
use snafu::ErrorCompat;

mod args;
mod draw;

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    info!("args: {:?}", args);

    let summary = match draw::run_tool(&args) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("An error occured: {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            std::process::exit(1);
        }
    };

    for p in summary.written() {
        println!("{}", p.display());
    }
    let failures = summary.failures();
    if failures > 0 {
        eprintln!(
            "{} of {} sheets could not be produced",
            failures,
            summary.reports.len()
        );
        std::process::exit(1);
    }
}
