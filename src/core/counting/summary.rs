use derive_more::Add;

/// Bookkeeping of the records pulled from one alignment source.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Add)]
pub struct SampleSummary {
    // All fetched records
    pub reads: u64,
    // Records passed to the count matrix
    pub counted: u64,
    // Zero reference span (e.g. primer dimers)
    pub empty_span: u64,
    pub missing_sequence: u64,
    pub rejected: u64,
    // Σ |template length|
    pub template_len: u64,
    // Σ aligned reference span
    pub aligned_len: u64,
    // Alphabet-valid bases added to the counts
    pub bases: u64,
}

impl SampleSummary {
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.empty_span + self.missing_sequence
    }
}
