use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ArgMatches;
use indicatif::ProgressBar;
use itertools::Itertools;

use crate::core::alphabet::Alphabet;
use crate::core::error::Result;

use super::args;

pub type TsvWriter = csv::Writer<BufWriter<File>>;

pub fn tsv(path: &str) -> Result<TsvWriter> {
    let file = BufWriter::new(File::create(path)?);
    Ok(csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(file))
}

pub fn saveto(pbar: ProgressBar, matches: &ArgMatches, key: &str, title: &str) -> Result<Option<TsvWriter>> {
    pbar.set_message(format!("Parsing {} output path...", title));
    match matches.value_of(key) {
        None => {
            pbar.finish_with_message(format!("{} output is disabled", title));
            Ok(None)
        }
        Some(path) => {
            let writer = tsv(path)?;
            pbar.finish_with_message(format!("{} will be saved to {}", title, path));
            Ok(Some(writer))
        }
    }
}

pub fn bamfiles(pbar: ProgressBar, matches: &ArgMatches) -> Vec<PathBuf> {
    pbar.set_message("Parsing paths to the input files...");
    let result: Vec<PathBuf> = matches.values_of(args::core::INPUT).unwrap().map(|x| x.into()).collect();
    if result.len() == 1 {
        pbar.finish_with_message(format!("Input file path: {}", result[0].display()))
    } else {
        let paths = result.iter().map(|x| x.display()).join(" ");
        pbar.finish_with_message(format!("Input files ({} samples): {}", result.len(), paths));
    }
    result
}

pub fn alphabet(pbar: ProgressBar, matches: &ArgMatches) -> Result<Alphabet> {
    pbar.set_message("Parsing the alphabet...");
    let result = Alphabet::from_str(matches.value_of(args::core::ALPHABET).unwrap())?;
    pbar.finish_with_message(format!("Counted symbols: {}", result));
    Ok(result)
}

pub fn threads(pbar: ProgressBar, matches: &ArgMatches) -> usize {
    pbar.set_message("Parsing number of threads allowed to launch...");
    let result = matches.value_of(args::core::THREADS).and_then(|x| x.parse().ok()).unwrap();
    pbar.finish_with_message(format!(
        "Using thread pool with at most {} threads(+ 1 thread to render progress bar)",
        result
    ));
    result
}
