use crate::{
    config::ScanConfig,
    error::Result,
    source::SourceChars,
    token::{Token, TokenKind},
};
use log::{debug, trace};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::{
    io::{self, BufRead},
    iter, mem,
    str::Chars,
};

static SINGLE_CHAR_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '(' => TokenKind::LeftParen,
    ')' => TokenKind::RightParen,
    '{' => TokenKind::LeftBrace,
    '}' => TokenKind::RightBrace,
    ',' => TokenKind::Comma,
    '.' => TokenKind::Dot,
    '-' => TokenKind::Minus,
    '+' => TokenKind::Plus,
    ';' => TokenKind::SemiColon,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
};

/// Base characters that become a two-character operator when followed by `=`.
static COMPOSITE_TOKENS: phf::Map<char, (TokenKind, TokenKind)> = phf_map! {
    '=' => (TokenKind::Equal, TokenKind::EqualEqual),
    '!' => (TokenKind::Bang, TokenKind::BangEqual),
    '<' => (TokenKind::Less, TokenKind::LessEqual),
    '>' => (TokenKind::Greater, TokenKind::GreaterEqual),
};

pub type StrChars<'a> = iter::Map<Chars<'a>, fn(char) -> io::Result<char>>;

/// One-pass scanner over a stream of code points.
///
/// Yields tokens in source order, always finishing with a single
/// `EndOfFile`. A failed read is yielded once and ends the iteration;
/// unrecognized characters never do.
pub struct Scanner<I: Iterator> {
    src: PeekMoreIterator<I>,
    config: ScanConfig,
    lexeme_buffer: String,
    line: usize,
    finished: bool,
}

impl <I> Iterator for Scanner<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        if self.finished {
            return None;
        }

        loop {
            let line = self.line;
            let next_char = match self.src.next() {
                Some(Ok(c)) => c,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                },
                None => {
                    self.finished = true;
                    return Some(Ok(Token::end_of_file(self.line)));
                },
            };
            self.lexeme_buffer.push(next_char);

            let kind = self.next_token_kind(next_char);
            let lexeme = mem::take(&mut self.lexeme_buffer);

            if let Some(kind) = kind {
                if kind == TokenKind::Error {
                    debug!("unexpected character {:?} on line {}", next_char, line);
                }
                let token = Token { kind, lexeme, line };
                trace!("scanned {:?}", token);
                return Some(Ok(token));
            }
        }
    }
}

impl <'a> Scanner<StrChars<'a>> {
    pub fn new(src: &'a str) -> Self {
        Self::with_config(src, ScanConfig::default())
    }

    pub fn with_config(src: &'a str, config: ScanConfig) -> Self {
        Self::from_chars(src.chars().map(Ok as fn(char) -> io::Result<char>), config)
    }
}

impl <R: BufRead> Scanner<SourceChars<R>> {
    pub fn from_reader(reader: R, config: ScanConfig) -> Self {
        Self::from_chars(SourceChars::new(reader), config)
    }
}

impl <I> Scanner<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    pub fn from_chars(chars: I, config: ScanConfig) -> Self {
        Self {
            src: chars.peekmore(),
            config,
            lexeme_buffer: String::new(),
            line: 1,
            finished: false,
        }
    }

    /// Runs the scan to completion.
    pub fn scan_tokens(self) -> Result<Vec<Token>> {
        let tokens = self.collect::<Result<Vec<Token>>>()?;
        debug!(
            "scanned {} tokens over {} lines",
            tokens.len(),
            tokens.last().map_or(1, Token::line),
        );
        Ok(tokens)
    }

    fn next_token_kind(&mut self, next_char: char) -> Option<TokenKind> {
        match next_char {
            '/' if self.config.skips_line_comments() && self.does_next_match('/') => {
                self.skip_until_newline();
                None
            },
            ' ' | '\r' | '\t' => None,
            '\n' => {
                self.line += 1;
                None
            },
            c => {
                if let Some(kind) = SINGLE_CHAR_TOKENS.get(&c) {
                    Some(*kind)
                } else if let Some((base, full)) = COMPOSITE_TOKENS.get(&c) {
                    Some(if self.does_next_match('=') { *full } else { *base })
                } else {
                    Some(TokenKind::Error)
                }
            },
        }
    }

    /// Consumes the next char only if it is `expected`. A pending read
    /// fault counts as a mismatch and is left for the next read.
    fn does_next_match(&mut self, expected: char) -> bool {
        match self.src.peek() {
            Some(Ok(next)) if *next == expected => {},
            _ => return false,
        }
        self.src.next();
        self.lexeme_buffer.push(expected);
        true
    }

    // Leaves the newline in place so the line counter still sees it.
    fn skip_until_newline(&mut self) {
        while let Some(Ok(next)) = self.src.peek() {
            if *next == '\n' {
                break;
            }
            self.src.next();
        }
    }
}
