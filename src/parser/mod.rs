mod build;
pub mod parse;
pub mod syn;
pub mod visit;

pub use build::build_query;
pub use parse::{parse_query, Error};
