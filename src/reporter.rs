use crate::token::Token;
use log::debug;
use std::io::{self, Write};

/// Outcome of reporting a token sequence, as a process exit status.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExitStatus {
    Success,
    LexicalError,
}

impl ExitStatus {
    pub fn of(tokens: &[Token]) -> ExitStatus {
        if tokens.iter().any(Token::is_error) {
            ExitStatus::LexicalError
        } else {
            ExitStatus::Success
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::LexicalError => 65,
        }
    }
}

/// Writes tokens one per line: errors to `err_out`, everything else to `out`.
pub struct Reporter<Out, ErrOut> {
    out: Out,
    err_out: ErrOut,
}

impl <Out: Write, ErrOut: Write> Reporter<Out, ErrOut> {
    pub fn new(out: Out, err_out: ErrOut) -> Self {
        Self { out, err_out }
    }

    pub fn report(&mut self, tokens: &[Token]) -> io::Result<ExitStatus> {
        for token in tokens {
            if token.is_error() {
                writeln!(self.err_out, "{}", token)?;
            } else {
                writeln!(self.out, "{}", token)?;
            }
        }
        self.out.flush()?;
        self.err_out.flush()?;

        let status = ExitStatus::of(tokens);
        debug!("reported {} tokens, exit status {:?}", tokens.len(), status);
        Ok(status)
    }

    pub fn into_inner(self) -> (Out, ErrOut) {
        (self.out, self.err_out)
    }
}
