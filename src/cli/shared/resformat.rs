use std::io::Write;

use serde::Serialize;

use crate::core::counting::SampleSummary;
use crate::core::error::Result;

#[derive(Serialize)]
struct StatsRecord<'a> {
    name: &'a str,
    reads: u64,
    counted: u64,
    skipped: u64,
    rejected: u64,
    template_len: u64,
    aligned_len: u64,
    bases: u64,
}

impl<'a> StatsRecord<'a> {
    fn new(name: &'a str, summary: &SampleSummary) -> Self {
        Self {
            name,
            reads: summary.reads,
            counted: summary.counted,
            skipped: summary.skipped(),
            rejected: summary.rejected,
            template_len: summary.template_len,
            aligned_len: summary.aligned_len,
            bases: summary.bases,
        }
    }
}

/// Record statistics, one row per sample or contig. `key` titles the first column.
pub fn stats<'a, W: Write>(
    saveto: &mut csv::Writer<W>,
    key: &str,
    summaries: impl IntoIterator<Item = (&'a str, &'a SampleSummary)>,
) -> Result<()> {
    saveto.write_record([key, "reads", "counted", "skipped", "rejected", "template_len", "aligned_len", "bases"])?;
    for (name, summary) in summaries {
        saveto.serialize(StatsRecord::new(name, summary))?;
    }
    saveto.flush()?;
    Ok(())
}
