pub mod basecnt;
pub mod minor;
pub mod shared;
