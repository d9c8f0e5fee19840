use crate::scanner::{scan, SpanKind};
use crate::vocabulary::{default_vocabulary, Vocabulary};

/// Annotate a SQL statement using the builtin vocabulary.
pub fn highlight(sql: &str) -> String {
    SqlHighlighter::new(default_vocabulary()).highlight(sql)
}

/// CSS classes emitted per token kind. These names are an output contract:
/// the caller's stylesheet keys on them, so they must remain stable.
const KEYWORD_CLASS: &str = "sql-keyword";
const STRING_CLASS: &str = "sql-string";
const NUMBER_CLASS: &str = "sql-number";
const COMMENT_CLASS: &str = "sql-comment";

/// The highlighting pipeline: classify the input in one scanner pass, then
/// wrap keyword, string, number, and comment spans in `<span>` markup.
/// Everything else (including keyword casing) is preserved byte-for-byte.
pub struct SqlHighlighter<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> SqlHighlighter<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn highlight(&self, sql: &str) -> String {
        if sql.trim().is_empty() {
            return String::new();
        }
        let spans = scan(sql, self.vocab);
        let mut out = String::with_capacity(sql.len() + spans.len() * 8);
        for span in &spans {
            let text = span.text(sql);
            match span.kind {
                SpanKind::Keyword => wrap(&mut out, KEYWORD_CLASS, text),
                SpanKind::StringLiteral => wrap(&mut out, STRING_CLASS, text),
                SpanKind::Number => wrap(&mut out, NUMBER_CLASS, text),
                SpanKind::LineComment | SpanKind::BlockComment => {
                    wrap(&mut out, COMMENT_CLASS, text)
                }
                SpanKind::Word | SpanKind::Plain => out.push_str(text),
            }
        }
        out
    }
}

fn wrap(out: &mut String, class: &str, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    out.push_str(text);
    out.push_str("</span>");
}
