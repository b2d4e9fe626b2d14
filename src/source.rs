//! Code point decoding over byte readers.

use encoding_rs::{CoderResult, Decoder, UTF_8};
use std::{
    collections::VecDeque,
    io::{self, BufRead},
};

/// Iterator of the code points in a UTF-8 byte stream.
///
/// Decodes one `fill_buf` chunk at a time, so sequences split across chunks
/// come out whole. Malformed bytes come out as U+FFFD, one per maximal
/// invalid subpart. A leading UTF-8 byte order mark is dropped; other
/// encodings' marks are not sniffed. Only a failing read is reported as `Err`.
pub struct SourceChars<R> {
    reader: R,
    decoder: Decoder,
    decoded: String,
    pending: VecDeque<char>,
    exhausted: bool,
}

impl <R: BufRead> SourceChars<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: UTF_8.new_decoder_with_bom_removal(),
            decoded: String::new(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    fn refill(&mut self) -> io::Result<()> {
        let available = loop {
            match self.reader.fill_buf() {
                Ok(buf) => break buf.len(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        let chunk = self.reader.fill_buf()?;
        let last = available == 0;

        let mut consumed = 0;
        loop {
            if let Some(needed) = self.decoder.max_utf8_buffer_length(chunk.len() - consumed) {
                self.decoded.reserve(needed);
            }
            let (result, read, _malformed) =
                self.decoder.decode_to_string(&chunk[consumed..], &mut self.decoded, last);
            consumed += read;
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => self.decoded.reserve(4),
            }
        }

        self.reader.consume(available);
        self.pending.extend(self.decoded.drain(..));
        self.exhausted = last;
        Ok(())
    }
}

impl <R: BufRead> Iterator for SourceChars<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<io::Result<char>> {
        loop {
            if let Some(c) = self.pending.pop_front() {
                return Some(Ok(c));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.refill() {
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        char::REPLACEMENT_CHARACTER,
        io::{BufReader, Cursor, Read},
    };

    fn decode(bytes: &[u8]) -> Vec<char> {
        SourceChars::new(Cursor::new(bytes.to_vec()))
            .collect::<io::Result<Vec<char>>>()
            .unwrap()
    }

    fn replacements(n: usize) -> Vec<char> {
        vec![REPLACEMENT_CHARACTER; n]
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(vec!['(', '\n', ')'], decode(b"(\n)"));
    }

    #[test]
    fn multi_byte_chars_are_single_units() {
        assert_eq!(vec!['é', '€', '🦀'], decode("é€🦀".as_bytes()));
    }

    #[test]
    fn stray_continuation_byte_is_replaced() {
        assert_eq!(vec!['(', REPLACEMENT_CHARACTER, ')'], decode(b"(\x80)"));
    }

    #[test]
    fn truncated_sequence_does_not_swallow_next_char() {
        assert_eq!(vec![REPLACEMENT_CHARACTER, '+'], decode(b"\xe2\x82+"));
    }

    #[test]
    fn truncated_sequence_at_end_of_stream() {
        assert_eq!(vec!['=', REPLACEMENT_CHARACTER], decode(b"=\xf0\x9f"));
    }

    #[test]
    fn surrogate_encoding_is_replaced_byte_by_byte() {
        assert_eq!(replacements(3), decode(b"\xed\xa0\x80"));
    }

    #[test]
    fn overlong_encoding_is_replaced_byte_by_byte() {
        assert_eq!(replacements(3), decode(b"\xe0\x80\x80"));
        assert_eq!(replacements(2), decode(b"\xe0\x80"));
    }

    #[test]
    fn out_of_range_code_point_is_replaced_byte_by_byte() {
        assert_eq!(replacements(4), decode(b"\xf4\x90\x80\x80"));
    }

    #[test]
    fn replacement_count_matches_lossy_conversion() {
        let inputs: &[&[u8]] = &[b"\xff\xfe(", b"a\xc0\xafb", b"\xe2\x82\xe2\x82\xac", b"\xf0\x9f\xa6"];
        for bytes in inputs {
            let expected: Vec<char> = String::from_utf8_lossy(bytes).chars().collect();
            assert_eq!(expected, decode(bytes), "{:x?}", bytes);
        }
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        assert_eq!(vec!['(', ')'], decode(b"\xef\xbb\xbf()"));
    }

    #[test]
    fn utf16_byte_order_mark_is_not_sniffed() {
        assert_eq!(vec![REPLACEMENT_CHARACTER, REPLACEMENT_CHARACTER, '(', ')'], decode(b"\xff\xfe()"));
    }

    #[test]
    fn decodes_across_buffer_boundaries() {
        let bytes = "a€🦀b".as_bytes();
        let reader = BufReader::with_capacity(1, bytes);
        let chars: Vec<char> = SourceChars::new(reader).map(|c| c.unwrap()).collect();
        assert_eq!(vec!['a', '€', '🦀', 'b'], chars);
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }
    }

    #[test]
    fn read_faults_are_surfaced() {
        let mut chars = SourceChars::new(BufReader::new(Failing));
        assert!(matches!(chars.next(), Some(Err(_))));
    }

    struct Interrupting {
        interrupted: bool,
        data: &'static [u8],
    }

    impl Read for Interrupting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let reader = BufReader::new(Interrupting { interrupted: false, data: b"<=" });
        let chars: Vec<char> = SourceChars::new(reader).map(|c| c.unwrap()).collect();
        assert_eq!(vec!['<', '='], chars);
    }
}
