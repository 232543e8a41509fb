use bio_types::genome::AbstractInterval;
use indicatif::ProgressBar;
use itertools::Itertools;

use crate::cli::shared;
use crate::cli::shared::args::CoreArgs;
use crate::core::calling;
use crate::core::counting::{AlignmentSource, CountAccumulator};
use crate::core::error::Result;
use crate::core::normalize::normalize;

use super::args::MinorArgs;
use super::resformat;

pub fn run(core: CoreArgs, args: MinorArgs, pbar: ProgressBar) -> Result<()> {
    let MinorArgs { mut sources, reference, roi, mut saveto, stats } = args;

    let mut accumulator =
        CountAccumulator::new(core.alphabet, reference.contig(), reference.range().end, roi, sources.len())?;
    let window = accumulator.window();

    pbar.set_style(shared::style::run::running());
    pbar.set_length(sources.len() as u64);
    pbar.set_message(format!("Counting symbols in {}:{}-{}", reference.contig(), window.start, window.end));
    accumulator.accumulate(&mut sources, |source, summary| {
        tracing::info!(
            "{}: {} reads, {} counted, {} skipped, {} rejected",
            source.name(),
            summary.reads,
            summary.counted,
            summary.skipped(),
            summary.rejected
        );
        pbar.inc(1);
    })?;

    let alphabet = accumulator.alphabet().clone();
    let (counts, summaries) = accumulator.finish();
    let normalized = normalize(&counts);
    let calls = calling::call(&alphabet, &normalized);

    pbar.set_style(shared::style::run::finished());
    let loci = calls.iter().map(|x| x.locus).dedup().count();
    pbar.finish_with_message(format!(
        "Finished with {} samples: {} minority symbols at {} loci",
        sources.len(),
        calls.len(),
        loci
    ));

    let names = sources.iter().map(|x| x.name()).collect_vec();
    resformat::calls(&mut saveto, &names, &calls)?;
    if let Some(mut stats) = stats {
        shared::resformat::stats(&mut stats, "sample", names.iter().copied().zip(summaries.iter()))?;
    }
    Ok(())
}
