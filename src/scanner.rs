use memchr::memchr;

use crate::vocabulary::{is_word_byte, Vocabulary};

/// Classification of a contiguous region of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// A vocabulary keyword (possibly multi-word).
    Keyword,
    /// A single-quoted string literal, delimiters included.
    StringLiteral,
    /// A run of decimal digits not embedded in a word.
    Number,
    /// `--` to end of line (the newline is not part of the span).
    LineComment,
    /// `/* ... */`, possibly multi-line; unterminated runs to end of input.
    BlockComment,
    /// A word that is not a keyword (identifier, function name, ...).
    Word,
    /// Anything else: whitespace, operators, punctuation.
    Plain,
}

/// A classified region of the source. Spans are contiguous,
/// non-overlapping, and cover the entire input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Scan a word starting at `start`. Returns the end offset.
#[inline]
pub(crate) fn scan_word(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// Classify the whole source in a single left-to-right pass.
///
/// Each byte is assigned to exactly one span, so a later token class can
/// never reclassify an earlier one. String literals shield their contents
/// from comment and number detection; digits glued to word characters stay
/// part of the word. Precedence on overlap is therefore fixed by scan
/// order: strings, then comments, then words/keywords, then numbers.
pub fn scan(source: &str, vocab: &Vocabulary) -> Vec<Span> {
    let bytes = source.as_bytes();
    let mut spans: Vec<Span> = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    macro_rules! flush_plain {
        ($upto:expr) => {
            if plain_start < $upto {
                spans.push(Span {
                    kind: SpanKind::Plain,
                    start: plain_start,
                    end: $upto,
                });
            }
        };
    }

    while i < bytes.len() {
        let b = bytes[i];

        if b == b'\'' {
            // Simplified literal model: no escape handling, non-greedy close.
            // An unterminated quote stays plain and scanning continues.
            if let Some(offset) = memchr(b'\'', &bytes[i + 1..]) {
                flush_plain!(i);
                let end = i + 1 + offset + 1;
                spans.push(Span {
                    kind: SpanKind::StringLiteral,
                    start: i,
                    end,
                });
                i = end;
                plain_start = i;
                continue;
            }
            i += 1;
            continue;
        }

        if b == b'-' && bytes.get(i + 1) == Some(&b'-') {
            flush_plain!(i);
            let end = memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |o| i + o);
            spans.push(Span {
                kind: SpanKind::LineComment,
                start: i,
                end,
            });
            i = end;
            plain_start = i;
            continue;
        }

        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            flush_plain!(i);
            let end = find_block_comment_end(bytes, i);
            spans.push(Span {
                kind: SpanKind::BlockComment,
                start: i,
                end,
            });
            i = end;
            plain_start = i;
            continue;
        }

        if is_word_byte(b) && !b.is_ascii_digit() {
            flush_plain!(i);
            let word_end = scan_word(bytes, i);
            if let Some(m) = vocab.match_keyword(source, i, word_end) {
                spans.push(Span {
                    kind: SpanKind::Keyword,
                    start: i,
                    end: m.end,
                });
                i = m.end;
            } else {
                spans.push(Span {
                    kind: SpanKind::Word,
                    start: i,
                    end: word_end,
                });
                i = word_end;
            }
            plain_start = i;
            continue;
        }

        if b.is_ascii_digit() {
            let mut digits_end = i;
            while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
                digits_end += 1;
            }
            flush_plain!(i);
            if digits_end < bytes.len() && is_word_byte(bytes[digits_end]) {
                // Digits glued to a word (e.g. 2fa): the word wins.
                let word_end = scan_word(bytes, digits_end);
                spans.push(Span {
                    kind: SpanKind::Word,
                    start: i,
                    end: word_end,
                });
                i = word_end;
            } else {
                spans.push(Span {
                    kind: SpanKind::Number,
                    start: i,
                    end: digits_end,
                });
                i = digits_end;
            }
            plain_start = i;
            continue;
        }

        i += 1;
    }

    flush_plain!(bytes.len());
    spans
}

/// Find the end of a block comment starting at `start` (which points at `/*`).
/// Unterminated comments run to the end of input.
fn find_block_comment_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}
