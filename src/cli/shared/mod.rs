pub mod args;
pub mod parse;
pub mod resformat;
pub mod style;
pub mod validate;
