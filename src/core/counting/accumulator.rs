use std::ops::Range;

use bio_types::genome::Interval;
use rayon::prelude::*;

use crate::core::alphabet::Alphabet;
use crate::core::error::{MinorError, RecordError};
use crate::core::projection::AlignedReadProjector;
use crate::core::read::AlignedRead;

use super::matrix::CountMatrix;
use super::source::AlignmentSource;
use super::summary::SampleSummary;

/// Outcome of a record that was not rejected
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Contribution {
    // Number of alphabet-valid bases added to the counts
    Counted(usize),
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum SkipReason {
    EmptySpan,
    MissingSequence,
}

#[derive(Clone, Debug)]
struct Layout {
    alphabet: Alphabet,
    // Reference window of the matrix
    window: Range<u64>,
    // Positions outside of the window are dropped only for the region of interest
    clip: bool,
}

#[derive(Clone, Default)]
struct Cache {
    projector: AlignedReadProjector,
    indices: Vec<usize>,
}

// Counts reads into a single sample column
struct ColumnCounter<'a> {
    layout: &'a Layout,
    cache: &'a mut Cache,
    column: &'a mut [u32],
    summary: &'a mut SampleSummary,
}

impl<'a> ColumnCounter<'a> {
    fn count<R: AlignedRead>(&mut self, read: &R) -> Result<Contribution, RecordError> {
        self.summary.reads += 1;
        self.summary.template_len += read.template_len().unsigned_abs();

        let result = self.implcount(read);
        match &result {
            Ok(Contribution::Counted(bases)) => {
                self.summary.counted += 1;
                self.summary.bases += *bases as u64;
            }
            Ok(Contribution::Skipped(SkipReason::EmptySpan)) => self.summary.empty_span += 1,
            Ok(Contribution::Skipped(SkipReason::MissingSequence)) => self.summary.missing_sequence += 1,
            Err(_) => self.summary.rejected += 1,
        }
        result
    }

    fn implcount<R: AlignedRead>(&mut self, read: &R) -> Result<Contribution, RecordError> {
        let span = read.cigar().end_pos() - read.pos();
        if read.pos() < 0 || span <= 0 {
            return Ok(Contribution::Skipped(SkipReason::EmptySpan));
        }
        self.summary.aligned_len += span as u64;

        if read.len() == 0 {
            return Ok(Contribution::Skipped(SkipReason::MissingSequence));
        }

        let projection = self.cache.projector.project(read)?;
        let (alphabet, window) = (&self.layout.alphabet, &self.layout.window);
        let keep = if self.layout.clip { window.clone() } else { 0..u64::MAX };

        // Validate the whole record first: a rejected record leaves no trace in the counts
        let indices = &mut self.cache.indices;
        indices.clear();
        let rows = self.column.len();
        for (pos, symbol) in projection.clipped(&keep) {
            let symbol = alphabet.index(symbol);
            if symbol >= alphabet.len() {
                continue;
            }
            let index = (pos as i64 - window.start as i64) * alphabet.len() as i64 + symbol as i64;
            if index < 0 || index >= rows as i64 {
                return Err(RecordError::OutOfRegion { position: pos, index, size: rows });
            }
            indices.push(index as usize);
        }

        for ind in indices.iter() {
            self.column[*ind] += 1;
        }
        Ok(Contribution::Counted(indices.len()))
    }

    fn consume<R: AlignedRead>(&mut self, source: &str, records: impl Iterator<Item = Result<R, MinorError>>) -> Result<(), MinorError> {
        for read in records {
            let read = read?;
            match self.count(&read) {
                Ok(Contribution::Skipped(SkipReason::MissingSequence)) => {
                    tracing::warn!(
                        "{}: skipping read without sequence {}: {}",
                        source,
                        self.summary.reads,
                        String::from_utf8_lossy(read.name())
                    );
                }
                Ok(Contribution::Skipped(SkipReason::EmptySpan)) => {
                    tracing::debug!("{}: skipping read with empty reference span: {}", source, String::from_utf8_lossy(read.name()));
                }
                Ok(Contribution::Counted(_)) => {}
                Err(err) => {
                    tracing::warn!(
                        "{}: cannot add read {} ({}) to the count matrix: {}",
                        source,
                        self.summary.reads,
                        String::from_utf8_lossy(read.name()),
                        err
                    );
                }
            }
        }
        Ok(())
    }
}

/// Builds the count matrix of a single reference contig, one column per alignment source.
pub struct CountAccumulator {
    layout: Layout,
    matrix: CountMatrix,
    summaries: Vec<SampleSummary>,
    cache: Cache,
}

impl CountAccumulator {
    /// `length` is the length of the reference contig, `roi` is an optional half-open region of interest.
    pub fn new(
        alphabet: Alphabet,
        contig: &str,
        length: u64,
        roi: Option<Range<u64>>,
        samples: usize,
    ) -> Result<Self, MinorError> {
        if samples == 0 {
            return Err(MinorError::config("At least one alignment source is required"));
        }
        let (window, clip) = match roi {
            None => (0..length, false),
            Some(roi) => {
                if roi.start >= roi.end {
                    return Err(MinorError::config(format!(
                        "Region of interest {}-{} is empty",
                        roi.start, roi.end
                    )));
                }
                if roi.end > length {
                    return Err(MinorError::config(format!(
                        "Region of interest {}-{} exceeds the length of {} ({})",
                        roi.start, roi.end, contig, length
                    )));
                }
                (roi, true)
            }
        };
        if window.is_empty() {
            return Err(MinorError::config(format!("Reference {} has zero length", contig)));
        }

        let matrix = CountMatrix::new(Interval::new(contig.to_owned(), window.clone()), alphabet.len(), samples);
        let layout = Layout { alphabet, window, clip };
        Ok(Self { layout, matrix, summaries: vec![SampleSummary::default(); samples], cache: Cache::default() })
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.layout.alphabet
    }

    #[inline]
    pub fn window(&self) -> Range<u64> {
        self.layout.window.clone()
    }

    #[cfg(test)]
    pub fn matrix(&self) -> &CountMatrix {
        &self.matrix
    }

    #[cfg(test)]
    pub fn summaries(&self) -> &[SampleSummary] {
        &self.summaries
    }

    /// Count a single record into the sample column
    #[cfg(test)]
    pub fn count<R: AlignedRead>(&mut self, sample: usize, read: &R) -> Result<Contribution, RecordError> {
        let mut counter = ColumnCounter {
            layout: &self.layout,
            cache: &mut self.cache,
            column: &mut self.matrix.columns_mut()[sample],
            summary: &mut self.summaries[sample],
        };
        counter.count(read)
    }

    /// Count all records of the stream. Rejected or skipped records are reported and ignored,
    /// errors of the stream itself abort the accumulation.
    #[cfg(test)]
    pub fn consume<R: AlignedRead>(
        &mut self,
        sample: usize,
        source: &str,
        records: impl Iterator<Item = Result<R, MinorError>>,
    ) -> Result<(), MinorError> {
        let mut counter = ColumnCounter {
            layout: &self.layout,
            cache: &mut self.cache,
            column: &mut self.matrix.columns_mut()[sample],
            summary: &mut self.summaries[sample],
        };
        counter.consume(source, records)
    }

    /// Fetch and count all sources, i-th source fills the i-th sample column.
    /// Columns are disjoint, so sources are processed in parallel on the current rayon pool.
    pub fn accumulate<S>(&mut self, sources: &mut [S], oncomplete: impl Fn(&S, &SampleSummary) + Sync) -> Result<(), MinorError>
    where
        S: AlignmentSource + Send,
    {
        if sources.len() != self.matrix.samples() {
            return Err(MinorError::config(format!(
                "Expected {} alignment sources, got {}",
                self.matrix.samples(),
                sources.len()
            )));
        }

        let layout = &self.layout;
        let contig = self.matrix.contig().to_owned();
        let columns = self.matrix.columns_mut();
        columns
            .par_iter_mut()
            .zip(self.summaries.par_iter_mut())
            .zip(sources.par_iter_mut())
            .map(|((column, summary), source)| -> Result<(), MinorError> {
                let mut cache = Cache::default();
                let mut counter = ColumnCounter { layout, cache: &mut cache, column, summary };

                let name = source.name().to_owned();
                let records = source.fetch(&contig, layout.window.clone())?;
                counter.consume(&name, records)?;

                oncomplete(source, counter.summary);
                Ok(())
            })
            .collect::<Result<Vec<()>, MinorError>>()?;
        Ok(())
    }

    /// Freeze the counts
    pub fn finish(self) -> (CountMatrix, Vec<SampleSummary>) {
        (self.matrix, self.summaries)
    }
}

#[cfg(test)]
mod tests {
    use rust_htslib::bam::record::Cigar::*;
    use rust_htslib::bam::record::{Cigar, CigarString};

    use crate::core::counting::source::Records;
    use crate::core::read::MockRead;

    use super::*;

    fn read(pos: i64, seq: &str, cigar: Vec<Cigar>) -> MockRead {
        let mut read = MockRead::new();
        read.expect_name().return_const(b"read".to_vec());
        read.expect_pos().return_const(pos);
        read.expect_template_len().return_const(-(seq.len() as i64));
        read.expect_len().return_const(seq.len());
        read.expect_cigar().returning(move || CigarString(cigar.clone()).into_view(pos));
        let seq = String::from(seq);
        read.expect_seq().returning(move || seq.as_bytes().to_vec());
        read
    }

    struct Reads {
        name: String,
        reads: Vec<MockRead>,
        fetched: Vec<(String, Range<u64>)>,
    }

    impl Reads {
        fn new(name: &str, reads: Vec<MockRead>) -> Self {
            Self { name: name.into(), reads, fetched: vec![] }
        }
    }

    impl AlignmentSource for Reads {
        type Read = MockRead;

        fn name(&self) -> &str {
            &self.name
        }

        fn fetch(&mut self, contig: &str, range: Range<u64>) -> Result<Records<'_, MockRead>, MinorError> {
            self.fetched.push((contig.to_owned(), range));
            Ok(Box::new(self.reads.drain(..).map(Ok)))
        }
    }

    fn sample() -> Vec<MockRead> {
        vec![
            read(0, "ACGTA", vec![Match(5)]),
            read(2, "GGNTT", vec![Match(2), Del(1), Match(3)]),
            read(3, "CCAA", vec![SoftClip(2), Match(2)]),
            read(4, "TTTTTT", vec![Ins(2), Match(4)]),
        ]
    }

    // Σ of the expected column per locus for `sample()` on a 10bp reference
    const SAMPLE_COVERAGE: [u32; 10] = [1, 1, 2, 3, 4, 1, 2, 2, 0, 0];

    #[test]
    fn count_whole_reference() {
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 10, None, 1).unwrap();
        for read in sample() {
            assert!(matches!(acc.count(0, &read), Ok(Contribution::Counted(_))));
        }
        let (matrix, summaries) = acc.finish();

        let coverage = (0..10).map(|x| matrix.coverage(x, 0)).collect::<Vec<_>>();
        assert_eq!(coverage, SAMPLE_COVERAGE);

        // A C G T -
        assert_eq!(matrix.locus(0, 0), &[1, 0, 0, 0, 0]);
        assert_eq!(matrix.locus(2, 0), &[0, 0, 2, 0, 0]);
        assert_eq!(matrix.locus(3, 0), &[1, 0, 1, 1, 0]);
        assert_eq!(matrix.locus(4, 0), &[2, 0, 0, 1, 1]);
        // N is dropped
        assert_eq!(matrix.locus(5, 0), &[0, 0, 0, 1, 0]);

        assert_eq!(
            summaries[0],
            SampleSummary {
                reads: 4,
                counted: 4,
                empty_span: 0,
                missing_sequence: 0,
                rejected: 0,
                template_len: 20,
                aligned_len: 17,
                bases: 16
            }
        );
    }

    #[test]
    fn count_region() {
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 10, Some(3..6), 1).unwrap();
        for read in sample() {
            acc.count(0, &read).unwrap();
        }
        let (matrix, _) = acc.finish();
        assert_eq!(matrix.loci(), 3);
        assert_eq!(matrix.position(0), 3);

        let coverage = (0..3).map(|x| matrix.coverage(x, 0)).collect::<Vec<_>>();
        assert_eq!(coverage, SAMPLE_COVERAGE[3..6]);
        assert_eq!(matrix.locus(1, 0), &[2, 0, 0, 1, 1]);

        // The read is entirely outside of the region
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 10, Some(8..10), 1).unwrap();
        assert_eq!(acc.count(0, &read(0, "ACGT", vec![Match(4)])), Ok(Contribution::Counted(0)));
        assert!(acc.matrix().column(0).iter().all(|x| *x == 0));
    }

    #[test]
    fn out_of_bounds() {
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 4, None, 1).unwrap();
        let result = acc.count(0, &read(2, "ACGT", vec![Match(4)]));
        assert_eq!(result, Err(RecordError::OutOfRegion { position: 4, index: 22, size: 20 }));

        // Nothing is written for the rejected record
        assert!(acc.matrix().column(0).iter().all(|x| *x == 0));
        assert_eq!(acc.summaries()[0].rejected, 1);

        // Valid records are still counted afterwards
        assert_eq!(acc.count(0, &read(0, "ACGT", vec![Match(4)])), Ok(Contribution::Counted(4)));
        assert_eq!(acc.matrix().coverage(3, 0), 1);
    }

    #[test]
    fn skipped() {
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 10, None, 1).unwrap();
        let dimer = read(5, "ACGT", vec![SoftClip(4)]);
        assert_eq!(acc.count(0, &dimer), Ok(Contribution::Skipped(SkipReason::EmptySpan)));

        let noseq = read(5, "", vec![Match(3)]);
        assert_eq!(acc.count(0, &noseq), Ok(Contribution::Skipped(SkipReason::MissingSequence)));

        let skip = read(0, "ACGT", vec![Match(1), RefSkip(2), Match(3)]);
        assert_eq!(acc.count(0, &skip), Err(RecordError::UnsupportedOperation { op: 'N' }));

        assert!(acc.matrix().column(0).iter().all(|x| *x == 0));
        let summary = acc.summaries()[0];
        assert_eq!((summary.reads, summary.counted, summary.skipped(), summary.rejected), (3, 0, 2, 1));
        assert_eq!(summary.aligned_len, 9);
    }

    #[test]
    fn consume_stream() {
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 10, None, 2).unwrap();
        let mut records = sample();
        records.push(read(5, "", vec![Match(3)]));
        records.push(read(8, "ACGT", vec![Match(4)]));
        acc.consume(1, "test", records.into_iter().map(Ok)).unwrap();

        let summary = acc.summaries()[1];
        assert_eq!((summary.reads, summary.counted, summary.missing_sequence, summary.rejected), (6, 4, 1, 1));
        assert!(acc.matrix().column(0).iter().all(|x| *x == 0));

        // Stream errors abort the accumulation
        let failing = vec![Ok(read(0, "A", vec![Match(1)])), Err(MinorError::hts("broken.bam", "truncated file"))];
        assert!(acc.consume(0, "broken", failing.into_iter()).is_err());
    }

    #[test]
    fn accumulate() {
        let mut acc = CountAccumulator::new(Alphabet::nucleotides(), "ref", 10, Some(2..8), 3).unwrap();
        let mut sources = vec![
            Reads::new("first", sample()),
            Reads::new("second", vec![]),
            Reads::new("third", sample().into_iter().chain(sample()).collect()),
        ];
        acc.accumulate(&mut sources, |_, _| {}).unwrap();
        for source in &sources {
            assert_eq!(source.fetched, vec![("ref".to_string(), 2..8)]);
        }

        let (matrix, summaries) = acc.finish();
        assert_eq!(summaries[1], SampleSummary::default());
        assert_eq!(summaries[2].reads, 2 * summaries[0].reads);
        for row in 0..matrix.rows() {
            assert_eq!(matrix.column(1)[row], 0);
            // Duplicated input doubles every count
            assert_eq!(matrix.column(2)[row], 2 * matrix.column(0)[row]);
        }
        for locus in 0..matrix.loci() {
            assert_eq!(matrix.coverage(locus, 0), SAMPLE_COVERAGE[locus + 2]);
        }
    }

    #[test]
    fn configuration() {
        let nt = Alphabet::nucleotides;
        assert!(CountAccumulator::new(nt(), "ref", 10, None, 0).is_err());
        assert!(CountAccumulator::new(nt(), "ref", 0, None, 1).is_err());
        assert!(CountAccumulator::new(nt(), "ref", 10, Some(5..5), 1).is_err());
        assert!(CountAccumulator::new(nt(), "ref", 10, Some(5..11), 1).is_err());
        assert!(CountAccumulator::new(nt(), "ref", 10, Some(0..10), 1).is_ok());

        let mut acc = CountAccumulator::new(nt(), "ref", 10, None, 2).unwrap();
        let mut sources = vec![Reads::new("single", vec![])];
        assert!(acc.accumulate(&mut sources, |_, _| {}).is_err());
    }
}
