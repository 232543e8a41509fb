use std::path::Path;

use bio_types::genome::{AbstractInterval, Interval};
use rust_htslib::faidx;

use crate::core::error::{MinorError, Result};
use crate::core::io::hts::HTSSource;

/// The single sequence of an indexed FASTA file.
pub fn single_contig(path: &Path) -> Result<Interval> {
    let reader = faidx::Reader::from_path(path).map_err(|err| MinorError::hts(path, err))?;
    let nseqs = reader.n_seqs();
    if nseqs != 1 {
        return Err(MinorError::config(format!(
            "Exactly one reference sequence is expected in {}, found {}",
            path.display(),
            nseqs
        )));
    }
    let name = reader.seq_name(0).map_err(|err| MinorError::hts(path, err))?;
    let length = reader.fetch_seq_len(&name);
    Ok(Interval::new(name, 0..length))
}

/// Resolve the reference contig in scope. `reference` is either an indexed FASTA file
/// or the name of a contig present in the alignment headers.
pub fn resolve(reference: &str, sources: &[HTSSource]) -> Result<Interval> {
    let path = Path::new(reference);
    let contig = if path.is_file() {
        single_contig(path)?
    } else {
        let first = sources.first().ok_or_else(|| MinorError::config("At least one alignment file is required"))?;
        let length = first.contig_len(reference).ok_or_else(|| {
            MinorError::config(format!("Reference {} is neither a FASTA file nor a contig of {}", reference, first.path().display()))
        })?;
        Interval::new(reference.to_owned(), 0..length)
    };

    // Alignments must be against the same sequence
    let length = contig.range().end;
    for source in sources {
        match source.contig_len(contig.contig()) {
            None => {
                return Err(MinorError::config(format!(
                    "Unknown reference {} for {}",
                    contig.contig(),
                    source.path().display()
                )))
            }
            Some(x) if x != length => {
                return Err(MinorError::config(format!(
                    "Reference {} has length {}, but {} expects {}",
                    contig.contig(),
                    length,
                    source.path().display(),
                    x
                )))
            }
            Some(_) => {}
        }
    }
    Ok(contig)
}
