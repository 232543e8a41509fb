use std::path::PathBuf;

use clap::{Arg, ArgMatches};
use indicatif::ProgressBar;

use crate::core::alphabet::Alphabet;
use crate::core::error::Result;

use super::{parse, validate};

pub mod core {
    use super::*;

    pub const INPUT: &str = "input";
    pub const ALPHABET: &str = "alphabet";
    pub const THREADS: &str = "threads";

    pub const SECTION_NAME: &str = "Core";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(INPUT)
                .short('i')
                .long(INPUT)
                .required(true)
                .takes_value(true)
                .multiple_values(true)
                .validator(validate::path)
                .long_help("Path to the input indexed BAM/CRAM file(s). Each file is a separate sample, i.e. a separate column in the output."),
            Arg::new(ALPHABET)
                .short('a')
                .long(ALPHABET)
                .takes_value(true)
                .validator(validate::alphabet)
                .default_value("nt")
                .long_help("Symbols to count: \"nt\" for ACGT-, \"aa\" for the 20 standard amino acids or a literal string of unique symbols (e.g. \"ACGTN-\"). The gap symbol \"-\" stands for deletions. Bases outside of the alphabet are ignored."),
            Arg::new(THREADS)
                .short('t')
                .long(THREADS)
                .takes_value(true)
                .validator(validate::numeric(1, usize::MAX))
                .default_value("1")
                .long_help("Maximum number of threads to spawn at once."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub struct CoreArgs {
    pub threads: usize,
    pub bamfiles: Vec<PathBuf>,
    pub alphabet: Alphabet,
}

impl CoreArgs {
    pub fn new(args: &ArgMatches, factory: impl Fn() -> ProgressBar) -> Result<Self> {
        Ok(Self {
            threads: parse::threads(factory(), args),
            bamfiles: parse::bamfiles(factory(), args),
            alphabet: parse::alphabet(factory(), args)?,
        })
    }
}
