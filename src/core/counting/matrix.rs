use std::ops::Range;

use bio_types::genome::{AbstractInterval, Interval};

/// Dense locus × symbol × sample counts for a single reference window.
///
/// Every sample owns one column. Inside a column the row of a symbol at a locus
/// is `locus * alphabet_len + symbol`, so all symbols of a locus are adjacent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountMatrix {
    window: Interval,
    alphabet_len: usize,
    columns: Vec<Vec<u32>>,
}

impl CountMatrix {
    pub fn new(window: Interval, alphabet_len: usize, samples: usize) -> Self {
        let loci = (window.range().end - window.range().start) as usize;
        let columns = vec![vec![0u32; loci * alphabet_len]; samples];
        Self { window, alphabet_len, columns }
    }

    /// Reference window covered by the matrix; locus 0 is `window.start`
    #[inline]
    pub fn window(&self) -> &Interval {
        &self.window
    }

    #[inline]
    pub fn contig(&self) -> &str {
        self.window.contig()
    }

    #[inline]
    pub fn loci(&self) -> usize {
        (self.window.range().end - self.window.range().start) as usize
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.loci() * self.alphabet_len
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    /// Reference coordinate of the locus
    #[inline]
    pub fn position(&self, locus: usize) -> u64 {
        self.window.range().start + locus as u64
    }

    #[inline]
    pub fn rowspan(&self, locus: usize) -> Range<usize> {
        locus * self.alphabet_len..(locus + 1) * self.alphabet_len
    }

    #[inline]
    pub fn column(&self, sample: usize) -> &[u32] {
        &self.columns[sample]
    }

    /// Counts of all symbols at the locus for one sample
    #[inline]
    pub fn locus(&self, locus: usize, sample: usize) -> &[u32] {
        &self.columns[sample][self.rowspan(locus)]
    }

    #[inline]
    pub fn get(&self, locus: usize, symbol: usize, sample: usize) -> u32 {
        debug_assert!(symbol < self.alphabet_len);
        self.columns[sample][locus * self.alphabet_len + symbol]
    }

    #[inline]
    pub fn coverage(&self, locus: usize, sample: usize) -> u32 {
        self.locus(locus, sample).iter().sum()
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Vec<u32>] {
        &mut self.columns
    }
}
