use std::iter::repeat;
use std::ops::Range;

use rust_htslib::bam::record::Cigar;

use crate::core::alphabet::GAP;
use crate::core::error::RecordError;
use crate::core::read::AlignedRead;

/// Read symbols aligned to consecutive reference positions starting at `start`.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Projection<'a> {
    start: u64,
    symbols: &'a [u8],
}

impl<'a> Projection<'a> {
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.symbols.len() as u64
    }

    #[inline]
    pub fn positions(&self) -> Range<u64> {
        self.start..self.end()
    }

    #[inline]
    pub fn symbols(&self) -> &'a [u8] {
        self.symbols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// (position, symbol) pairs restricted to the given reference range
    pub fn clipped(&self, range: &Range<u64>) -> impl Iterator<Item = (u64, u8)> + 'a {
        let start = self.start;
        let (from, to) = (range.start.max(start), range.end.min(self.end()));
        let symbols: &'a [u8] = if from < to { &self.symbols[(from - start) as usize..(to - start) as usize] } else { &[] };
        symbols.iter().enumerate().map(move |(ind, symbol)| (from + ind as u64, *symbol))
    }
}

/// Rebuilds the reference-aligned sequence of a read from its CIGAR.
/// Deletions are filled with gaps, insertions and soft-clipped bases are skipped.
#[derive(Clone, Default)]
pub struct AlignedReadProjector {
    buffer: Vec<u8>,
}

impl AlignedReadProjector {
    pub fn new() -> Self {
        Self { buffer: Vec::with_capacity(512) }
    }

    pub fn project<R: AlignedRead>(&mut self, read: &R) -> Result<Projection, RecordError> {
        self.buffer.clear();

        let pos = read.pos();
        // Unmapped records have no reference span
        if pos < 0 {
            return Ok(Projection { start: 0, symbols: &self.buffer });
        }

        let sequence = read.seq();
        let mut seqpos = 0usize;
        for block in read.cigar().iter() {
            match block {
                Cigar::Match(ops) | Cigar::Equal(ops) | Cigar::Diff(ops) => {
                    let end = seqpos + *ops as usize;
                    if end > sequence.len() {
                        return Err(RecordError::TruncatedSequence { required: end, available: sequence.len() });
                    }
                    self.buffer.extend_from_slice(&sequence[seqpos..end]);
                    seqpos = end;
                }
                Cigar::Del(ops) => {
                    self.buffer.extend(repeat(GAP).take(*ops as usize));
                }
                Cigar::Ins(ops) | Cigar::SoftClip(ops) => {
                    seqpos += *ops as usize;
                }
                Cigar::HardClip(_) | Cigar::Pad(_) => {}
                Cigar::RefSkip(_) => {
                    return Err(RecordError::UnsupportedOperation { op: block.char() });
                }
            }
        }
        Ok(Projection { start: pos as u64, symbols: &self.buffer })
    }
}
