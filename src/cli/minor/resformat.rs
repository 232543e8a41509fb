use std::io::Write;

use crate::core::calling::MinorityCall;
use crate::core::error::Result;

/// One row per minority call: position, symbol and its frequency in each sample
pub fn calls<W: Write>(saveto: &mut csv::Writer<W>, samples: &[&str], calls: &[MinorityCall]) -> Result<()> {
    let mut record = Vec::with_capacity(samples.len() + 2);
    record.extend(["pos".to_owned(), "variant".to_owned()]);
    record.extend(samples.iter().map(|x| x.to_string()));
    saveto.write_record(&record)?;

    for call in calls {
        record.clear();
        record.push(call.locus.to_string());
        record.push(call.symbol.to_string());
        record.extend(call.frequencies.iter().map(|x| x.to_string()));
        saveto.write_record(&record)?;
    }
    saveto.flush()?;
    Ok(())
}
