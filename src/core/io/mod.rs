pub mod fasta;
pub mod hts;
