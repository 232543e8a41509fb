use std::ops::Range;

use bio_types::genome::Interval;
use clap::{Arg, ArgMatches};
use indicatif::ProgressBar;

use crate::cli::shared;
use crate::cli::shared::args::CoreArgs;
use crate::cli::shared::parse::TsvWriter;
use crate::cli::shared::validate;
use crate::core::error::{MinorError, Result};
use crate::core::io::hts::HTSSource;

use super::parse;

pub mod region {
    use super::*;

    pub const REFERENCE: &str = "reference";
    pub const START: &str = "start";
    pub const END: &str = "end";

    pub const SECTION_NAME: &str = "Region";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(REFERENCE)
                .short('r')
                .long(REFERENCE)
                .required(true)
                .takes_value(true)
                .long_help("Reference sequence: either an indexed FASTA file with exactly one sequence or the name of a contig from the BAM headers."),
            Arg::new(START)
                .short('s')
                .long(START)
                .takes_value(true)
                .validator(validate::numeric(0u64, u64::MAX))
                .long_help("0-based start of the region of interest (inclusive). Defaults to the reference start."),
            Arg::new(END)
                .short('e')
                .long(END)
                .takes_value(true)
                .validator(validate::numeric(1u64, u64::MAX))
                .long_help("0-based end of the region of interest (exclusive). Defaults to the reference end."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub mod output {
    use super::*;

    pub const SAVETO: &str = "saveto";
    pub const STATS: &str = "stats";

    pub const SECTION_NAME: &str = "Output";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(SAVETO)
                .short('o')
                .long(SAVETO)
                .takes_value(true)
                .validator(validate::writable)
                .default_value("/dev/stdout")
                .long_help("Path to the output TSV file with minority calls. By default, the results are printed to stdout."),
            Arg::new(STATS)
                .long(STATS)
                .takes_value(true)
                .validator(validate::writable)
                .long_help("Path to the TSV file with per-sample read statistics."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub fn args<'a>() -> Vec<Arg<'a>> {
    shared::args::core::args().into_iter().chain(region::args()).chain(output::args()).collect()
}

pub struct MinorArgs {
    pub sources: Vec<HTSSource>,
    pub reference: Interval,
    pub roi: Option<Range<u64>>,
    pub saveto: TsvWriter,
    pub stats: Option<TsvWriter>,
}

impl MinorArgs {
    pub fn new(core: &CoreArgs, args: &ArgMatches, factory: &impl Fn() -> ProgressBar) -> Result<Self> {
        let mut sources = parse::sources(factory(), &core.bamfiles)?;
        let reference = parse::reference(factory(), args, &mut sources)?;
        let roi = parse::roi(factory(), args, &reference);

        let saveto = shared::parse::saveto(factory(), args, output::SAVETO, "Minority calls")?;
        let stats = shared::parse::saveto(factory(), args, output::STATS, "Read statistics")?;
        // SAVETO has a default value
        let saveto = saveto.ok_or_else(|| MinorError::config("Output path is required"))?;

        Ok(Self { sources, reference, roi, saveto, stats })
    }
}
