//! Lexical scanner for the punctuation and comparison operators of a small
//! C-like language.
//!
//! [`Scanner`] turns source text into [`Token`]s; [`Reporter`] renders them
//! and decides the exit status.

pub mod config;
pub mod error;
pub mod reporter;
pub mod scanner;
pub mod source;
pub mod token;

pub use crate::{
    config::ScanConfig,
    error::{Error, Result},
    reporter::{ExitStatus, Reporter},
    scanner::Scanner,
    token::{Token, TokenKind},
};

use std::io::BufRead;

/// Scans everything `reader` yields. Fails only if reading does.
pub fn scan<R: BufRead>(reader: R) -> Result<Vec<Token>> {
    Scanner::from_reader(reader, ScanConfig::default()).scan_tokens()
}

pub fn scan_str(src: &str) -> Vec<Token> {
    // Reading a str cannot fail, so every item is Ok.
    Scanner::new(src).filter_map(|t| t.ok()).collect()
}
