mod args;
mod results;

use clap::Parser;
use log::{info, warn};
use snafu::ErrorCompat;

use crate::args::{Args, Command};
use crate::results::*;

fn run(command: Command) -> BResult<()> {
    match command {
        Command::Convert {
            config,
            preset,
            input_dir,
            out,
            reference,
        } => {
            let written = run_conversion(config, preset, input_dir, out, reference)?;
            info!("Wrote {} files: {:?}", written.len(), written);
        }
        Command::Merge { paths } => {
            let n = run_merge(&paths)?;
            info!("Merged {} runs", n);
        }
        Command::UpdateBestScores { paths } => {
            let n = run_update_best_scores(&paths)?;
            info!("Updated {} runs", n);
        }
        Command::Summarize { inputs } => {
            run_summarize(&inputs)?;
        }
        Command::Gantt { input, out_dir } => {
            let written = run_gantt(&input, out_dir)?;
            info!("Wrote {} charts", written.len());
        }
        Command::Roads { input, out } => {
            let written = run_roads(&input, out)?;
            info!("Wrote {}", written);
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log::LevelFilter::Debug).init();
    } else {
        env_logger::init();
    }

    if let Err(e) = run(args.command) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        let mut source = std::error::Error::source(&*e);
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        if let Some(bt) = ErrorCompat::backtrace(&*e) {
            eprintln!("trace: {}", bt);
        } else {
            eprintln!("No trace found");
        }
        std::process::exit(1);
    }
}
