mod columns;
pub mod error;
mod response_parser;

pub use response_parser::parse;
