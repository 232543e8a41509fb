use std::thread;

use clap::{crate_authors, crate_name, crate_version, App, AppSettings, Arg, ArgMatches};
use indicatif::{MultiProgress, ProgressBar};
use rayon::ThreadPoolBuilder;
use tracing::Level;

use minorfreq::cli;
use minorfreq::cli::shared::args::CoreArgs;
use minorfreq::core::error::{MinorError, Result};

const VERBOSE: &str = "verbose";

fn verbosity(matches: &ArgMatches) -> Level {
    let nested = matches.subcommand().map(|(_, x)| x.occurrences_of(VERBOSE)).unwrap_or(0);
    match matches.occurrences_of(VERBOSE).max(nested) {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

// Progress bars are rendered by the main thread while the job runs in the background
fn execute(mbar: &MultiProgress, pbar: ProgressBar, job: impl FnOnce(ProgressBar) -> Result<()> + Send) -> Result<()> {
    thread::scope(|s| {
        let handle = s.spawn(move || {
            let result = job(pbar.clone());
            // Unblock the rendering after a failure
            if !pbar.is_finished() {
                pbar.abandon();
            }
            result
        });
        mbar.join().expect("Failed to render progress bar");
        handle.join().expect("Worker thread panicked")
    })
}

fn launch(matches: &ArgMatches) -> Result<()> {
    let (subcommand, args) = matches.subcommand().ok_or_else(|| MinorError::config("Subcommand is required"))?;

    let mbar = MultiProgress::new();
    let factory = || mbar.add(ProgressBar::new_spinner().with_style(cli::shared::style::parse::with_progress()));

    let core = CoreArgs::new(args, factory)?;
    ThreadPoolBuilder::new()
        .num_threads(core.threads)
        .build_global()
        .map_err(|err| MinorError::config(format!("Failed to initialize thread pool: {}", err)))?;

    match subcommand {
        "minor" => {
            let args = cli::minor::MinorArgs::new(&core, args, &factory)?;
            execute(&mbar, mbar.add(ProgressBar::new(0)), move |pbar| cli::minor::run(core, args, pbar))
        }
        "basecnt" => {
            let args = cli::basecnt::BaseCntArgs::new(&core, args, &factory)?;
            execute(&mbar, mbar.add(ProgressBar::new(0)), move |pbar| cli::basecnt::run(core, args, pbar))
        }
        _ => unreachable!(),
    }
}

fn main() {
    let matches = App::new(crate_name!())
        .author(crate_authors!("\n"))
        .version(crate_version!())
        .max_term_width(120)
        .setting(AppSettings::DeriveDisplayOrder)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::new(VERBOSE)
                .short('v')
                .long(VERBOSE)
                .multiple_occurrences(true)
                .global(true)
                .help("Report skipped and rejected reads (-v for a summary per sample, -vv for every read)"),
        )
        .subcommand(
            App::new("minor")
                .about("Minority symbols and their frequencies across samples aligned to the same reference")
                .args(cli::minor::args()),
        )
        .subcommand(
            App::new("basecnt")
                .about("Symbol counts and coverage at each position of the reference sequences")
                .args(cli::basecnt::args()),
        )
        .get_matches();

    tracing_subscriber::fmt().with_max_level(verbosity(&matches)).with_writer(std::io::stderr).init();

    if let Err(err) = launch(&matches) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
