use std::path::{Path, PathBuf};

use bio_types::genome::{AbstractInterval, Interval};
use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::core::error::{MinorError, Result};
use crate::core::io::hts::{self, HTSSource};

use super::args::output;

pub fn bamfile(pbar: ProgressBar, bamfiles: &[PathBuf]) -> Result<PathBuf> {
    pbar.set_message("Checking the number of input files...");
    match bamfiles {
        [single] => {
            pbar.finish_with_message(format!("Counting symbols in {}", single.display()));
            Ok(single.clone())
        }
        _ => Err(MinorError::config(format!("Exactly one alignment file is expected, got {}", bamfiles.len()))),
    }
}

/// Reference sequences to process, in the order of the BAM header. Empty sequences are dropped.
pub fn contigs(pbar: ProgressBar, matches: &ArgMatches, bamfile: &Path) -> Result<Vec<Interval>> {
    pbar.set_message("Parsing reference sequences from the BAM header...");
    let mut result = HTSSource::new(bamfile.to_owned())?.contigs();
    if let Some(contig) = matches.value_of(output::CONTIG) {
        result.retain(|x| x.contig() == contig);
        if result.is_empty() {
            return Err(MinorError::config(format!("Unknown reference {} for {}", contig, bamfile.display())));
        }
    }
    result.retain(|x| !x.range().is_empty());

    let total: u64 = result.iter().map(|x| x.range().end).sum();
    pbar.finish_with_message(format!("Reference sequences: {} ({}bp in total)", result.len(), total));
    Ok(result)
}

pub fn name(pbar: ProgressBar, matches: &ArgMatches, bamfile: &Path) -> String {
    pbar.set_message("Parsing the sample name...");
    let result = matches.value_of(output::NAME).map(|x| x.to_owned()).unwrap_or_else(|| hts::sample_name(bamfile));
    pbar.finish_with_message(format!("Sample name: {}", result));
    result
}

pub fn first(pbar: ProgressBar, matches: &ArgMatches) -> u64 {
    pbar.set_message("Parsing the coordinates offset...");
    let result = matches.value_of(output::FIRST).and_then(|x| x.parse().ok()).unwrap();
    pbar.finish_with_message(format!("Output positions are {}-based", result));
    result
}
