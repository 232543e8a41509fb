use std::ops::Range;

use crate::core::error::MinorError;
use crate::core::read::AlignedRead;

pub type Records<'a, R> = Box<dyn Iterator<Item = Result<R, MinorError>> + 'a>;

/// An ordered stream of alignment records that owns one sample column.
pub trait AlignmentSource {
    type Read: AlignedRead;

    fn name(&self) -> &str;
    // Records overlapping the given reference range
    fn fetch(&mut self, contig: &str, range: Range<u64>) -> Result<Records<'_, Self::Read>, MinorError>;
}
