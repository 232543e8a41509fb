use std::ops::Range;
use std::path::{Path, PathBuf};

use bio_types::genome::{AbstractInterval, Interval};
use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::core::error::Result;
use crate::core::io::{fasta, hts};
use crate::core::io::hts::HTSSource;

use super::args::region;

pub fn sources(pbar: ProgressBar, bamfiles: &[PathBuf]) -> Result<Vec<HTSSource>> {
    pbar.set_message("Opening the alignment files...");
    let result = hts::open(bamfiles)?;
    let contigs = hts::contigs(&result)?;
    pbar.finish_with_message(format!(
        "Opened {} alignment file(s) with {} reference sequence(s)",
        result.len(),
        contigs.len()
    ));
    Ok(result)
}

pub fn reference(pbar: ProgressBar, matches: &ArgMatches, sources: &mut [HTSSource]) -> Result<Interval> {
    pbar.set_message("Resolving the reference sequence...");
    let reference = matches.value_of(region::REFERENCE).unwrap();
    let result = fasta::resolve(reference, sources)?;
    // CRAM records are decoded against the FASTA
    let path = Path::new(reference);
    if path.is_file() {
        for source in sources.iter_mut() {
            source.set_reference(path)?;
        }
    }
    pbar.finish_with_message(format!("Reference sequence: {} ({}bp)", result.contig(), result.range().end));
    Ok(result)
}

/// Missing bounds extend to the reference ends
pub fn roi(pbar: ProgressBar, matches: &ArgMatches, reference: &Interval) -> Option<Range<u64>> {
    pbar.set_message("Parsing the region of interest...");
    let parse = |key: &str| matches.value_of(key).map(|x| x.parse::<u64>().unwrap());
    let result = match (parse(region::START), parse(region::END)) {
        (None, None) => None,
        (start, end) => Some(start.unwrap_or(0)..end.unwrap_or(reference.range().end)),
    };
    match &result {
        None => pbar.finish_with_message(format!("Processing the whole {}", reference.contig())),
        Some(x) => pbar.finish_with_message(format!("Region of interest: {}:{}-{}", reference.contig(), x.start, x.end)),
    }
    result
}
