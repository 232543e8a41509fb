use bio_types::genome::AbstractInterval;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::cli::shared;
use crate::cli::shared::args::CoreArgs;
use crate::core::counting::{CountAccumulator, CountMatrix, SampleSummary};
use crate::core::error::Result;
use crate::core::io::hts::HTSSource;

use super::args::BaseCntArgs;
use super::resformat;

pub fn run(core: CoreArgs, args: BaseCntArgs, pbar: ProgressBar) -> Result<()> {
    let BaseCntArgs { bamfile, contigs, name, first, mut basecnt, coverage, stats } = args;

    pbar.set_style(shared::style::run::running());
    pbar.set_length(contigs.len() as u64);
    pbar.set_message(format!("Counting symbols in {}", name));

    // Each worker reads the file through its own handle
    let results = contigs
        .par_iter()
        .map(|contig| -> Result<(CountMatrix, SampleSummary)> {
            let mut sources = vec![HTSSource::new(bamfile.clone())?];
            let mut accumulator =
                CountAccumulator::new(core.alphabet.clone(), contig.contig(), contig.range().end, None, 1)?;
            accumulator.accumulate(&mut sources, |_, _| {})?;
            pbar.inc(1);

            let (matrix, summaries) = accumulator.finish();
            Ok((matrix, summaries[0]))
        })
        .collect::<Result<Vec<_>>>()?;
    let (counts, summaries): (Vec<_>, Vec<_>) = results.into_iter().unzip();

    pbar.set_style(shared::style::run::finished());
    let total = summaries.iter().fold(SampleSummary::default(), |a, b| a + *b);
    pbar.finish_with_message(format!(
        "Finished with {} reference sequences: {} reads, {} counted, {} skipped, {} rejected",
        counts.len(),
        total.reads,
        total.counted,
        total.skipped(),
        total.rejected
    ));

    resformat::basecnt(&mut basecnt, &core.alphabet, first, &counts)?;
    if let Some(mut coverage) = coverage {
        resformat::coverage(&mut coverage, &name, first, &counts)?;
    }
    if let Some(mut stats) = stats {
        let contigs = counts.iter().map(|x| x.contig());
        shared::resformat::stats(&mut stats, "ref", contigs.zip(summaries.iter()))?;
    }
    Ok(())
}
