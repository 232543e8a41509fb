use derive_more::Constructor;

use crate::core::alphabet::Alphabet;
use crate::core::normalize::{CoverageMatrix, FrequencyMatrix, Normalized};

/// Non-majority symbol observed at a reference locus in at least one sample.
#[derive(Clone, Debug, PartialEq, Constructor)]
pub struct MinorityCall {
    // 0-based reference coordinate
    pub locus: u64,
    pub symbol: char,
    // One frequency per sample
    pub frequencies: Vec<f64>,
}

/// Index of the first maximum
#[inline]
fn argmax<T: PartialOrd + Copy>(values: &[T]) -> usize {
    let mut best = 0;
    for (ind, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = ind;
        }
    }
    best
}

/// Majority symbol of the locus: the most frequent symbol of each covered sample, and the mode
/// of these symbols across samples. All ties resolve to the lowest alphabet index.
/// None if no sample covers the locus.
pub fn majority(frequencies: &FrequencyMatrix, coverage: &CoverageMatrix, locus: usize) -> Option<usize> {
    let mut votes = vec![0u32; frequencies.alphabet_len()];
    let mut voters = 0;
    for sample in 0..frequencies.samples() {
        if !coverage.is_covered(locus, sample) {
            continue;
        }
        votes[argmax(frequencies.locus(locus, sample))] += 1;
        voters += 1;
    }
    if voters == 0 {
        None
    } else {
        Some(argmax(&votes))
    }
}

/// Calls minority symbols at every locus covered by at least one sample.
/// Calls are ordered by locus, then by the alphabet index.
pub fn call(alphabet: &Alphabet, normalized: &Normalized) -> Vec<MinorityCall> {
    let (frequencies, coverage) = (normalized.frequencies(), normalized.coverage());
    debug_assert_eq!(alphabet.len(), frequencies.alphabet_len());

    let samples = frequencies.samples();
    let mut calls = Vec::new();
    let mut variants = vec![false; alphabet.len()];
    for locus in 0..frequencies.loci() {
        if coverage.total(locus) == 0 {
            continue;
        }

        // Symbols observed in at least one sample
        variants.fill(false);
        for sample in 0..samples {
            for (variant, freq) in variants.iter_mut().zip(frequencies.locus(locus, sample)) {
                *variant |= *freq > 0.0;
            }
        }

        if let Some(major) = majority(frequencies, coverage, locus) {
            variants[major] = false;
        }

        for (symbol, _) in variants.iter().enumerate().filter(|(_, x)| **x) {
            let freqs = (0..samples).map(|sample| frequencies.get(locus, symbol, sample)).collect();
            calls.push(MinorityCall::new(frequencies.position(locus), alphabet.symbol(symbol), freqs));
        }
    }
    calls
}
