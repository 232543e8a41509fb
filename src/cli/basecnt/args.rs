use std::path::PathBuf;

use bio_types::genome::Interval;
use clap::{Arg, ArgMatches};
use indicatif::ProgressBar;

use crate::cli::shared;
use crate::cli::shared::args::CoreArgs;
use crate::cli::shared::parse::TsvWriter;
use crate::cli::shared::validate;
use crate::core::error::{MinorError, Result};

use super::parse;

pub mod output {
    use super::*;

    pub const CONTIG: &str = "contig";
    pub const NAME: &str = "name";
    pub const FIRST: &str = "first";
    pub const BASECNT: &str = "basecnt";
    pub const COVERAGE: &str = "coverage";
    pub const STATS: &str = "stats";

    pub const SECTION_NAME: &str = "Output";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(CONTIG)
                .short('c')
                .long(CONTIG)
                .takes_value(true)
                .long_help("Count only the given reference sequence. By default, all sequences from the BAM header are processed."),
            Arg::new(NAME)
                .short('n')
                .long(NAME)
                .takes_value(true)
                .long_help("Sample name used as the coverage column title. Defaults to the input file name without extension."),
            Arg::new(FIRST)
                .long(FIRST)
                .takes_value(true)
                .possible_values(["0", "1"])
                .default_value("0")
                .long_help("Coordinate of the first reference position in the output tables: 0 (0-based) or 1 (1-based)."),
            Arg::new(BASECNT)
                .short('o')
                .long(BASECNT)
                .takes_value(true)
                .validator(validate::writable)
                .default_value("/dev/stdout")
                .long_help("Path to the output TSV file with symbol counts per position. By default, the results are printed to stdout."),
            Arg::new(COVERAGE)
                .long(COVERAGE)
                .takes_value(true)
                .validator(validate::writable)
                .long_help("Path to the output TSV file with coverage per position."),
            Arg::new(STATS)
                .long(STATS)
                .takes_value(true)
                .validator(validate::writable)
                .long_help("Path to the TSV file with per-contig read statistics."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub fn args<'a>() -> Vec<Arg<'a>> {
    shared::args::core::args().into_iter().chain(output::args()).collect()
}

pub struct BaseCntArgs {
    pub bamfile: PathBuf,
    pub contigs: Vec<Interval>,
    pub name: String,
    pub first: u64,
    pub basecnt: TsvWriter,
    pub coverage: Option<TsvWriter>,
    pub stats: Option<TsvWriter>,
}

impl BaseCntArgs {
    pub fn new(core: &CoreArgs, args: &ArgMatches, factory: &impl Fn() -> ProgressBar) -> Result<Self> {
        let bamfile = parse::bamfile(factory(), &core.bamfiles)?;
        let contigs = parse::contigs(factory(), args, &bamfile)?;
        let name = parse::name(factory(), args, &bamfile);
        let first = parse::first(factory(), args);

        let basecnt = shared::parse::saveto(factory(), args, output::BASECNT, "Symbol counts")?;
        let coverage = shared::parse::saveto(factory(), args, output::COVERAGE, "Coverage")?;
        let stats = shared::parse::saveto(factory(), args, output::STATS, "Read statistics")?;
        let basecnt = basecnt.ok_or_else(|| MinorError::config("Output path is required"))?;

        Ok(Self { bamfile, contigs, name, first, basecnt, coverage, stats })
    }
}
