use crate::scanner::scan_word;
use crate::vocabulary::{default_vocabulary, is_word_byte, Vocabulary};

/// Reformat a SQL statement using the builtin vocabulary.
pub fn format(sql: &str) -> String {
    SqlFormatter::new(default_vocabulary()).format(sql)
}

/// The formatting pipeline. Pure and infallible: any input produces a
/// best-effort rendering, and empty or whitespace-only input produces "".
pub struct SqlFormatter<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> SqlFormatter<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Run the full pipeline:
    ///   1. Collapse whitespace runs to single spaces
    ///   2. Break subquery brackets onto their own line edges
    ///   3. Break before major keywords (canonical case, trailing space)
    ///   4. Put the SELECT body on its own indented line
    ///   5. Break after commas
    ///   6. Drop blank lines
    ///   7. Upper-case every vocabulary keyword
    ///   8. Indent by bracket depth (two spaces per level)
    ///
    /// The ordering is load-bearing: keyword breaks assume single-space
    /// boundaries from step 1, and indentation depends on the final line
    /// structure, so it runs last.
    pub fn format(&self, sql: &str) -> String {
        let collapsed = collapse_whitespace(sql);
        if collapsed.is_empty() {
            return String::new();
        }
        let broken = break_subquery_brackets(&collapsed);
        let broken = self.break_major_keywords(&broken);
        let broken = break_select_body(&broken);
        let broken = break_commas(&broken);
        let compacted = drop_blank_lines(&broken);
        let cased = self.normalize_keyword_case(&compacted);
        let indented = apply_indentation(&cased);
        indented.trim().to_string()
    }

    /// Step 3: every major keyword standing alone between whitespace moves
    /// to the start of a new line, re-emitted in canonical case with a
    /// single trailing space. Compounds win over their prefixes.
    fn break_major_keywords(&self, s: &str) -> String {
        let bytes = s.as_bytes();
        let mut out = String::with_capacity(s.len() + 16);
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b' ' || b == b'\n' {
                let word_start = i + 1;
                if word_start < bytes.len() && is_word_byte(bytes[word_start]) {
                    let word_end = scan_word(bytes, word_start);
                    if let Some(m) = self.vocab.match_keyword(s, word_start, word_end) {
                        let followed_by_ws = m.end < bytes.len()
                            && (bytes[m.end] == b' ' || bytes[m.end] == b'\n');
                        if m.major && followed_by_ws {
                            // The trailing whitespace is left in place: it
                            // becomes the keyword's single trailing space, or
                            // the boundary for the next major keyword.
                            out.push('\n');
                            out.push_str(&m.canonical);
                            i = m.end;
                            continue;
                        }
                    }
                }
                out.push(b as char);
                i += 1;
            } else {
                let run_start = i;
                while i < bytes.len() && bytes[i] != b' ' && bytes[i] != b'\n' {
                    i += 1;
                }
                out.push_str(&s[run_start..i]);
            }
        }
        out
    }

    /// Step 7: rewrite every whole-word vocabulary keyword to canonical
    /// upper-case. Applies to the full vocabulary, not just major keywords.
    fn normalize_keyword_case(&self, s: &str) -> String {
        let bytes = s.as_bytes();
        let mut out = String::with_capacity(s.len());
        let mut i = 0;
        while i < bytes.len() {
            if is_word_byte(bytes[i]) {
                let word_end = scan_word(bytes, i);
                if let Some(m) = self.vocab.match_keyword(s, i, word_end) {
                    out.push_str(&m.canonical);
                    i = m.end;
                } else {
                    out.push_str(&s[i..word_end]);
                    i = word_end;
                }
            } else {
                let run_start = i;
                while i < bytes.len() && !is_word_byte(bytes[i]) {
                    i += 1;
                }
                out.push_str(&s[run_start..i]);
            }
        }
        out
    }
}

/// Step 1: collapse every whitespace run (newlines and tabs included) to a
/// single space, trimming the ends. The canonical single-line baseline.
fn collapse_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Step 2: a `(` that opens a subquery (its next word is SELECT) gets a
/// line break after it, and its balanced matching `)` gets a line break
/// before it. This puts the brackets at line edges where the indentation
/// walk can see them. Unmatched closing parens are ignored.
fn break_subquery_brackets(s: &str) -> String {
    #[derive(Clone, Copy)]
    enum Mark {
        Open,
        Close,
    }

    let bytes = s.as_bytes();
    let mut marks: Vec<(usize, Mark)> = Vec::new();
    let mut stack: Vec<(usize, bool)> = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] == b' ' {
                    j += 1;
                }
                let word_end = scan_word(bytes, j);
                let opens_subquery = s[j..word_end].eq_ignore_ascii_case("select");
                stack.push((i, opens_subquery));
            }
            b')' => {
                if let Some((open_pos, opens_subquery)) = stack.pop() {
                    if opens_subquery {
                        marks.push((open_pos, Mark::Open));
                        marks.push((i, Mark::Close));
                    }
                }
            }
            _ => {}
        }
    }

    if marks.is_empty() {
        return s.to_string();
    }
    marks.sort_by_key(|&(pos, _)| pos);

    let mut out = String::with_capacity(s.len() + marks.len());
    let mut last = 0;
    for (pos, mark) in marks {
        match mark {
            Mark::Open => {
                out.push_str(&s[last..=pos]);
                out.push('\n');
                let mut j = pos + 1;
                while j < bytes.len() && bytes[j] == b' ' {
                    j += 1;
                }
                last = j;
            }
            Mark::Close => {
                out.push_str(s[last..pos].trim_end_matches(' '));
                out.push('\n');
                last = pos;
            }
        }
    }
    out.push_str(&s[last..]);
    out
}

/// Step 4: the text after a whole-word SELECT begins on its own line,
/// indented one level (two spaces).
fn break_select_body(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + 16);
    let mut i = 0;
    while i < bytes.len() {
        if is_word_byte(bytes[i]) {
            let word_end = scan_word(bytes, i);
            if s[i..word_end].eq_ignore_ascii_case("select") {
                let mut j = word_end;
                while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\n') {
                    j += 1;
                }
                if j > word_end {
                    out.push_str("SELECT\n  ");
                    i = j;
                    continue;
                }
            }
            out.push_str(&s[i..word_end]);
            i = word_end;
        } else {
            let run_start = i;
            while i < bytes.len() && !is_word_byte(bytes[i]) {
                i += 1;
            }
            out.push_str(&s[run_start..i]);
        }
    }
    out
}

/// Step 5: every comma is followed by a line break and two spaces, so each
/// item of a comma-separated list gets its own line.
fn break_commas(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + 16);
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b',' {
            out.push_str(&s[last..i]);
            out.push_str(",\n  ");
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            last = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&s[last..]);
    out
}

/// Step 6: lines consisting only of whitespace collapse away.
fn drop_blank_lines(s: &str) -> String {
    s.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Step 8: walk the lines with a non-negative depth counter. A line whose
/// content starts with `)` dedents before printing; a line whose content
/// ends with `(` indents after. Depth is floored at zero, so excess closing
/// parens never corrupt later indentation. The relative indent inserted by
/// the SELECT and comma steps is preserved under the depth prefix.
fn apply_indentation(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    let mut depth: usize = 0;
    for (idx, line) in s.split('\n').enumerate() {
        let line = line.trim_end();
        let content = line.trim_start();
        if content.starts_with(')') {
            depth = depth.saturating_sub(1);
        }
        if idx > 0 {
            out.push('\n');
        }
        if !content.is_empty() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(line);
        }
        if content.ends_with('(') {
            depth += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(format(""), "");
        assert_eq!(format("   \n\t  "), "");
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(format("select a,b from t"), "SELECT\n  a,\n  b\nFROM t");
    }

    #[test]
    fn test_case_normalization() {
        let out = format("select * from t where x = 1 and y = 2");
        assert!(out.contains("SELECT"));
        assert!(out.contains("\nFROM t"));
        assert!(out.contains("\nWHERE x = 1"));
        assert!(out.contains("\nAND y = 2"));
    }

    #[test]
    fn test_non_major_keywords_upcased_in_place() {
        let out = format("select case when x then 1 else 2 end from t");
        assert!(out.contains("CASE WHEN x THEN 1 ELSE 2 END"));
    }

    #[test]
    fn test_compound_major_keyword() {
        let out = format("select * from t order by x");
        assert!(out.ends_with("\nORDER BY x"));
    }

    #[test]
    fn test_union_all_not_split() {
        let out = format("select 1 union all select 2");
        assert!(out.contains("\nUNION ALL"));
        assert!(!out.contains("UNION\n"));
    }

    #[test]
    fn test_nested_subquery_indentation() {
        assert_eq!(
            format("SELECT * FROM (SELECT 1) t"),
            "SELECT\n  *\nFROM (\n  SELECT\n    1\n) t"
        );
    }

    #[test]
    fn test_unbalanced_parens_tolerated() {
        // must not underflow or panic
        let out = format("SELECT 1))");
        assert!(out.starts_with("SELECT"));
        let out = format(")) select 1");
        assert!(out.contains("SELECT"));
    }

    #[test]
    fn test_function_parens_left_alone() {
        let out = format("select count(*) from t");
        assert!(out.contains("COUNT(*)"));
    }

    #[test]
    fn test_idempotent() {
        for sql in [
            "select a,b from t where x=1 and y=2 order by a",
            "SELECT * FROM (SELECT 1) t",
            "select 1 union all select 2",
            "select case when x then 1 end from t group by x having count(1) > 2",
        ] {
            let once = format(sql);
            let twice = format(&once);
            assert_eq!(once, twice, "format not a fixed point for {:?}", sql);
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a\t b\n\n  c"), "a b c");
        assert_eq!(collapse_whitespace("  "), "");
    }

    #[test]
    fn test_break_subquery_brackets() {
        assert_eq!(
            break_subquery_brackets("FROM (SELECT 1) t"),
            "FROM (\nSELECT 1\n) t"
        );
        // function call: untouched
        assert_eq!(break_subquery_brackets("count(*)"), "count(*)");
    }

    #[test]
    fn test_drop_blank_lines() {
        assert_eq!(drop_blank_lines("a\n  \nb\n\nc"), "a\nb\nc");
    }

    #[test]
    fn test_apply_indentation_depth_floor() {
        assert_eq!(apply_indentation(") a\n) b"), ") a\n) b");
    }
}
