pub use args::{args, BaseCntArgs};
pub use run::run;

mod args;
mod parse;
mod resformat;
mod run;
