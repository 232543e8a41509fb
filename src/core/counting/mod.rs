pub use accumulator::{Contribution, CountAccumulator, SkipReason};
pub use matrix::CountMatrix;
pub use source::{AlignmentSource, Records};
pub use summary::SampleSummary;

mod accumulator;
mod matrix;
mod source;
mod summary;
