use bio_types::genome::{AbstractInterval, Interval};
use derive_getters::{Dissolve, Getters};

use crate::core::counting::CountMatrix;

/// Number of alphabet-valid bases per locus (rows) and sample (columns).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageMatrix {
    columns: Vec<Vec<u32>>,
}

impl CoverageMatrix {
    #[inline]
    pub fn samples(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn get(&self, locus: usize, sample: usize) -> u32 {
        self.columns[sample][locus]
    }

    #[cfg(test)]
    pub fn column(&self, sample: usize) -> &[u32] {
        &self.columns[sample]
    }

    /// Coverage of the locus summed over all samples
    #[inline]
    pub fn total(&self, locus: usize) -> u64 {
        self.columns.iter().map(|x| x[locus] as u64).sum()
    }

    #[inline]
    pub fn is_covered(&self, locus: usize, sample: usize) -> bool {
        self.get(locus, sample) > 0
    }
}

/// Per-sample symbol frequencies with the same layout as the count matrix.
/// Frequencies of a (locus, sample) without coverage are all zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyMatrix {
    window: Interval,
    alphabet_len: usize,
    columns: Vec<Vec<f64>>,
}

impl FrequencyMatrix {
    #[inline]
    pub fn window(&self) -> &Interval {
        &self.window
    }

    #[inline]
    pub fn loci(&self) -> usize {
        (self.window.range().end - self.window.range().start) as usize
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    #[inline]
    pub fn position(&self, locus: usize) -> u64 {
        self.window.range().start + locus as u64
    }

    #[inline]
    pub fn locus(&self, locus: usize, sample: usize) -> &[f64] {
        let start = locus * self.alphabet_len;
        &self.columns[sample][start..start + self.alphabet_len]
    }

    #[inline]
    pub fn get(&self, locus: usize, symbol: usize, sample: usize) -> f64 {
        self.columns[sample][locus * self.alphabet_len + symbol]
    }
}

#[derive(Clone, Debug, PartialEq, Getters, Dissolve)]
pub struct Normalized {
    frequencies: FrequencyMatrix,
    coverage: CoverageMatrix,
}

/// Derive frequencies and coverage from the frozen count matrix
pub fn normalize(counts: &CountMatrix) -> Normalized {
    let (loci, alen) = (counts.loci(), counts.alphabet_len());

    let mut coverage = Vec::with_capacity(counts.samples());
    let mut frequencies = Vec::with_capacity(counts.samples());
    for sample in 0..counts.samples() {
        let column = counts.column(sample);
        let mut scov = Vec::with_capacity(loci);
        let mut sfreq = vec![0f64; column.len()];

        for (locus, (cnts, freqs)) in column.chunks_exact(alen).zip(sfreq.chunks_exact_mut(alen)).enumerate() {
            debug_assert_eq!(cnts, counts.locus(locus, sample));
            let total: u32 = cnts.iter().sum();
            scov.push(total);
            // No data -> keep all frequencies at zero
            if total == 0 {
                continue;
            }
            for (freq, cnt) in freqs.iter_mut().zip(cnts) {
                *freq = *cnt as f64 / total as f64;
            }
        }
        coverage.push(scov);
        frequencies.push(sfreq);
    }

    let window = Interval::new(counts.contig().to_owned(), counts.window().range());
    Normalized {
        frequencies: FrequencyMatrix { window, alphabet_len: alen, columns: frequencies },
        coverage: CoverageMatrix { columns: coverage },
    }
}
