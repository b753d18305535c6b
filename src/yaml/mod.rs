//! The structured-text engine: [`load`] parses the YAML-subset dialect
//! into JSON values with marked errors, [`dump`] serializes values back in
//! the canonical style. Both halves share one quoting discipline so that
//! `load(dump(v)) == v` for every value in the supported subset.

mod emitter;
mod parser;

pub use emitter::{dump, DumpOptions, QuoteStyle};
pub use parser::{load, LoadError, Mark};
