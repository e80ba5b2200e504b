/*!
 * Command-line interface for docdump
 */

use std::io;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use docdump::config::{Args, Config};
use docdump::error::Result;
use docdump::report::{ReportFormat, Reporter};
use docdump::writer::ReportWriter;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "docdump", &mut io::stdout());
        return;
    }

    setup_logging(args.quiet, args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    let quiet = args.quiet;
    let show_progress = !quiet && args.verbose == 0;

    // Create and validate configuration before touching the file system
    let config = Config::from_args(args)?;
    config.validate()?;

    let progress = if show_progress {
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {prefix:.bold.cyan} {pos} files  {wide_msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    } else {
        ProgressBar::hidden()
    };
    progress.set_message(format!("Documenting {}", config.root.display()));

    let writer = ReportWriter::new(config, Arc::new(progress.clone()));
    let result = writer.run();
    progress.finish_and_clear();
    let report = result?;

    if !quiet {
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
        println!(
            "\nProcess completed. Report saved to {}",
            report.output_file.display()
        );
    }

    Ok(())
}
