//! Chat text to trade intent

mod parser;

pub use parser::parse_signal;
