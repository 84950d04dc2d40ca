//! Text → field extraction: catalog, regex extractors and the literal
//! grammar.

pub mod catalog;
pub mod fields;
pub mod literal;
pub mod results;
