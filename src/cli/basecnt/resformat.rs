use std::io::Write;

use crate::core::alphabet::Alphabet;
use crate::core::counting::CountMatrix;
use crate::core::error::Result;

/// Symbol counts per reference position of the first sample
pub fn basecnt<W: Write>(saveto: &mut csv::Writer<W>, alphabet: &Alphabet, first: u64, counts: &[CountMatrix]) -> Result<()> {
    let mut record: Vec<String> = vec!["ref".into(), "pos".into()];
    record.extend(alphabet.symbols().iter().map(|x| (*x as char).to_string()));
    saveto.write_record(&record)?;

    for matrix in counts {
        for locus in 0..matrix.loci() {
            record.clear();
            record.push(matrix.contig().to_owned());
            record.push((matrix.position(locus) + first).to_string());
            record.extend(matrix.locus(locus, 0).iter().map(|x| x.to_string()));
            saveto.write_record(&record)?;
        }
    }
    saveto.flush()?;
    Ok(())
}

pub fn coverage<W: Write>(saveto: &mut csv::Writer<W>, name: &str, first: u64, counts: &[CountMatrix]) -> Result<()> {
    saveto.write_record(["ref", "pos", name])?;
    for matrix in counts {
        for locus in 0..matrix.loci() {
            let pos = (matrix.position(locus) + first).to_string();
            let cov = matrix.coverage(locus, 0).to_string();
            saveto.write_record([matrix.contig(), pos.as_str(), cov.as_str()])?;
        }
    }
    saveto.flush()?;
    Ok(())
}
