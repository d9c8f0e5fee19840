use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::SqlprettyError;

/// Builtin keyword list. Canonical form is upper-case; matching is
/// case-insensitive. Multi-word entries are matched as atomic units.
const KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "AND",
    "OR",
    "NOT",
    "IN",
    "EXISTS",
    "JOIN",
    "LEFT",
    "RIGHT",
    "INNER",
    "OUTER",
    "ON",
    "AS",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "INSERT INTO",
    "VALUES",
    "UPDATE",
    "SET",
    "DELETE FROM",
    "CREATE TABLE",
    "ALTER TABLE",
    "DROP TABLE",
    "INDEX",
    "UNION ALL",
    "UNION",
    "INTERSECT",
    "EXCEPT",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "DISTINCT",
    "COUNT",
    "SUM",
    "AVG",
    "MAX",
    "MIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "WITH",
    "RECURSIVE",
    "BETWEEN",
    "LIKE",
    "IS NOT NULL",
    "IS NULL",
    "COALESCE",
    "NULLIF",
    "IF",
    "IFNULL",
    "ASC",
    "DESC",
    "NULL",
    "TRUE",
    "FALSE",
];

/// Keywords that force a line break before their occurrence during
/// formatting. Strict subset of KEYWORDS. Compounds are listed before
/// their prefixes ("UNION ALL" before "UNION").
const MAJOR_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LEFT JOIN",
    "RIGHT JOIN",
    "INNER JOIN",
    "JOIN",
    "ON",
    "AND",
    "OR",
    "UNION ALL",
    "UNION",
    "LIMIT",
    "OFFSET",
];

/// Bytes that can appear inside a word (identifier or keyword).
/// Non-ASCII bytes are accepted so unicode identifiers stay whole.
#[inline]
pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// The continuation words of a compound keyword, lowercased.
type Tail = SmallVec<[CompactString; 3]>;

/// A successful keyword match at some word position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    /// Byte offset one past the matched text.
    pub end: usize,
    /// Canonical upper-case rendering, single-spaced.
    pub canonical: CompactString,
    /// Whether this keyword triggers a line break during formatting.
    pub major: bool,
}

/// The keyword vocabulary shared by the formatter and the highlighter.
/// Immutable after construction; build once and pass by reference.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Lowercased single-word keywords.
    single: HashSet<CompactString>,
    /// Lowercased first word of each compound -> tails, longest first.
    compounds: HashMap<CompactString, Vec<Tail>>,
    /// Lowercased canonical phrases of the major subset.
    major: HashSet<CompactString>,
}

static DEFAULT_VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(Vocabulary::new);

/// The process-wide builtin vocabulary backing the free functions.
pub fn default_vocabulary() -> &'static Vocabulary {
    &DEFAULT_VOCABULARY
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    /// Build the builtin vocabulary.
    pub fn new() -> Self {
        let mut vocab = Self {
            single: HashSet::new(),
            compounds: HashMap::new(),
            major: HashSet::new(),
        };
        for entry in KEYWORDS {
            vocab.insert(entry);
        }
        for entry in MAJOR_KEYWORDS {
            vocab.major.insert(lower_phrase(entry));
        }
        vocab.sort_tails();
        vocab
    }

    /// Build the builtin vocabulary extended with caller-supplied entries.
    /// Entries in `major` are also added to the keyword set. Entries must be
    /// non-empty and consist of word characters separated by spaces.
    pub fn with_extensions<S: AsRef<str>>(
        keywords: &[S],
        major: &[S],
    ) -> Result<Self, SqlprettyError> {
        let mut vocab = Self::new();
        for entry in keywords {
            validate_entry(entry.as_ref())?;
            vocab.insert(entry.as_ref());
        }
        for entry in major {
            validate_entry(entry.as_ref())?;
            vocab.insert(entry.as_ref());
            vocab.major.insert(lower_phrase(entry.as_ref()));
        }
        vocab.sort_tails();
        Ok(vocab)
    }

    fn insert(&mut self, entry: &str) {
        let mut words = entry.split_whitespace();
        let first: CompactString = words.next().unwrap_or_default().to_lowercase().into();
        let tail: Tail = words.map(|w| CompactString::from(w.to_lowercase())).collect();
        if tail.is_empty() {
            self.single.insert(first);
        } else {
            self.compounds.entry(first).or_default().push(tail);
        }
    }

    fn sort_tails(&mut self) {
        for tails in self.compounds.values_mut() {
            tails.sort_by_key(|t| std::cmp::Reverse(t.len()));
            tails.dedup();
        }
    }

    /// Try to match a keyword whose first word spans `start..word_end` in
    /// `text`. The caller guarantees `start` sits at a word boundary and
    /// that `start..word_end` is a maximal word. Compound continuations are
    /// separated by runs of spaces or tabs (never newlines) and are tried
    /// longest-first, so "UNION ALL" wins over "UNION".
    pub fn match_keyword(&self, text: &str, start: usize, word_end: usize) -> Option<KeywordMatch> {
        let first = text[start..word_end].to_lowercase();
        let first = CompactString::from(first);

        if let Some(tails) = self.compounds.get(&first) {
            for tail in tails {
                if let Some(end) = try_tail(text.as_bytes(), word_end, tail) {
                    let mut phrase = first.clone();
                    for word in tail {
                        phrase.push(' ');
                        phrase.push_str(word);
                    }
                    return Some(KeywordMatch {
                        end,
                        canonical: upper_phrase(&phrase),
                        major: self.major.contains(&phrase),
                    });
                }
            }
        }

        if self.single.contains(&first) {
            return Some(KeywordMatch {
                end: word_end,
                canonical: upper_phrase(&first),
                major: self.major.contains(&first),
            });
        }

        None
    }
}

/// Match the tail words of a compound keyword starting at `pos`.
/// Returns the byte offset one past the last tail word.
fn try_tail(bytes: &[u8], mut pos: usize, tail: &Tail) -> Option<usize> {
    for word in tail {
        // At least one space or tab between words; a newline breaks the compound.
        let ws_start = pos;
        while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }
        if pos == ws_start {
            return None;
        }
        let wb = word.as_bytes();
        if pos + wb.len() > bytes.len() || !bytes[pos..pos + wb.len()].eq_ignore_ascii_case(wb) {
            return None;
        }
        pos += wb.len();
        if pos < bytes.len() && is_word_byte(bytes[pos]) {
            return None;
        }
    }
    Some(pos)
}

fn lower_phrase(entry: &str) -> CompactString {
    let words: Vec<String> = entry.split_whitespace().map(str::to_lowercase).collect();
    CompactString::from(words.join(" "))
}

fn upper_phrase(phrase: &str) -> CompactString {
    CompactString::from(phrase.to_uppercase())
}

fn validate_entry(entry: &str) -> Result<(), SqlprettyError> {
    if entry.split_whitespace().next().is_none() {
        return Err(SqlprettyError::Config(
            "keyword entries must not be empty".to_string(),
        ));
    }
    for word in entry.split_whitespace() {
        if !word.bytes().all(is_word_byte) {
            return Err(SqlprettyError::Config(format!(
                "invalid keyword entry: {:?}",
                entry
            )));
        }
    }
    Ok(())
}
