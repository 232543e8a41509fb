use std::ops::Range;
use std::path::{Path, PathBuf};

use bio_types::genome::{AbstractInterval, Interval};
use itertools::Itertools;
use rust_htslib::bam::{IndexedReader, Read, Record};

use crate::core::counting::{AlignmentSource, Records};
use crate::core::error::{MinorError, Result};

/// Indexed BAM/CRAM file, one sample.
pub struct HTSSource {
    name: String,
    path: PathBuf,
    reader: IndexedReader,
}

impl HTSSource {
    pub fn new(path: PathBuf) -> Result<Self> {
        let reader = IndexedReader::from_path(&path).map_err(|err| {
            MinorError::hts(
                &path,
                format!(
                    "{}\nPossible reasons: BAM file was not indexed (samtools index); you don't have read permissions",
                    err
                ),
            )
        })?;
        let name = sample_name(&path);
        Ok(Self { name, path, reader })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Indexed FASTA used to decode CRAM records. A no-op for BAM files.
    pub fn set_reference(&mut self, fasta: &Path) -> Result<()> {
        let path = &self.path;
        self.reader
            .set_reference(fasta)
            .map_err(|err| MinorError::hts(path, format!("failed to use {} as the reference: {}", fasta.display(), err)))
    }

    /// All reference sequences of the header
    pub fn contigs(&self) -> Vec<Interval> {
        let header = self.reader.header();
        (0..header.target_count())
            .filter_map(|tid| {
                let tname = String::from_utf8_lossy(header.tid2name(tid)).to_string();
                header.target_len(tid).map(|tlen| Interval::new(tname, 0..tlen))
            })
            .collect()
    }

    /// Length of the reference sequence with the given name
    pub fn contig_len(&self, contig: &str) -> Option<u64> {
        let header = self.reader.header();
        header.tid(contig.as_bytes()).and_then(|tid| header.target_len(tid))
    }
}

impl AlignmentSource for HTSSource {
    type Read = Record;

    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self, contig: &str, range: Range<u64>) -> Result<Records<'_, Record>> {
        let path = &self.path;
        self.reader
            .fetch((contig, range.start as i64, range.end as i64))
            .map_err(|err| MinorError::hts(path, format!("failed to fetch reads for {}:{}-{}: {}", contig, range.start, range.end, err)))?;

        let records = self.reader.records().map(move |x| x.map_err(|err| MinorError::hts(path, err)));
        Ok(Box::new(records))
    }
}

/// Sample name is the file name without the extension
pub fn sample_name(path: &Path) -> String {
    path.file_stem().map(|x| x.to_string_lossy().to_string()).unwrap_or_else(|| path.display().to_string())
}

pub fn open(paths: &[PathBuf]) -> Result<Vec<HTSSource>> {
    paths.iter().map(|x| HTSSource::new(x.clone())).collect()
}

/// Reference sequences shared by all sources, an error if headers disagree.
pub fn contigs(sources: &[HTSSource]) -> Result<Vec<Interval>> {
    let first = match sources.first() {
        None => return Err(MinorError::config("At least one alignment file is required")),
        Some(x) => x.contigs(),
    };

    let key = |contigs: &[Interval]| {
        contigs.iter().map(|x| (x.contig().to_owned(), x.range().start, x.range().end)).sorted().collect_vec()
    };
    let expected = key(&first);
    for source in &sources[1..] {
        if key(&source.contigs()) != expected {
            return Err(MinorError::config(format!(
                "Alignment files must be mapped against identical reference assemblies: {} and {} differ",
                sources[0].path().display(),
                source.path().display()
            )));
        }
    }
    Ok(first)
}
