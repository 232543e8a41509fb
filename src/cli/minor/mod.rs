pub use args::{args, MinorArgs};
pub use run::run;

mod args;
mod parse;
mod resformat;
mod run;
