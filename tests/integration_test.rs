//! Library-level behavior tests: the guarantees the formatter and
//! highlighter make regardless of input shape.

use sqlpretty::{format, format_string, highlight, highlight_string, Mode};

fn reduce(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[test]
fn test_format_is_idempotent() {
    let inputs = [
        "select a,b from t where x=1 and y=2 order by a",
        "select t.x from (select x from (select 1 as x) q) t",
        "select 1 union all select 2 union select 3",
        "select dept, count(*) from employees group by dept having count(*) > 5",
        "insert into t (a, b) values (1, 'x')",
    ];
    for sql in inputs {
        let once = format(sql);
        assert_eq!(format(&once), once, "not a fixed point: {:?}", sql);
    }
}

#[test]
fn test_format_only_moves_whitespace_and_case() {
    let inputs = [
        "select a , b from (select 1) t where x = 'Y'",
        "update t set a = 1 where b in (select id from u)",
        "create table t (id int, name varchar)",
    ];
    for sql in inputs {
        assert_eq!(reduce(sql), reduce(&format(sql)), "text drift for {:?}", sql);
    }
}

#[test]
fn test_whitespace_only_input() {
    for sql in ["", "   ", "\n\t\n", "  \r\n "] {
        assert_eq!(format(sql), "");
        assert_eq!(highlight(sql), "");
    }
}

#[test]
fn test_unbalanced_parens_do_not_panic() {
    for sql in ["select 1)))", "((( select 1", ") select ( 1", "()"] {
        let out = format(sql);
        assert_eq!(reduce(sql), reduce(&out));
    }
}

#[test]
fn test_nested_subqueries_indent_by_depth() {
    let out = format("select a from (select b from (select c from t) x) y");
    let depth_of = |needle: &str| {
        let line = out
            .lines()
            .find(|l| l.trim_start().starts_with(needle))
            .unwrap_or_else(|| panic!("no line starting with {:?} in {:?}", needle, out));
        line.len() - line.trim_start().len()
    };
    assert_eq!(depth_of("a"), 2);
    assert_eq!(depth_of("b"), 4);
    assert_eq!(depth_of("c"), 6);
}

#[test]
fn test_keywords_break_only_as_whole_words() {
    let out = format("select order_id, fromage from t");
    assert!(out.contains("order_id"));
    assert!(out.contains("fromage"));
    assert_eq!(out.matches('\n').count(), 3);
}

#[test]
fn test_highlight_preserves_source_casing() {
    assert_eq!(
        highlight("SeLeCt 1"),
        "<span class=\"sql-keyword\">SeLeCt</span> <span class=\"sql-number\">1</span>"
    );
}

#[test]
fn test_highlight_whole_words_only() {
    assert_eq!(
        highlight("select order_id"),
        "<span class=\"sql-keyword\">select</span> order_id"
    );
}

#[test]
fn test_highlight_compound_keyword_single_span() {
    assert_eq!(
        highlight("union all"),
        "<span class=\"sql-keyword\">union all</span>"
    );
}

#[test]
fn test_highlight_string_shields_comment_marker() {
    assert_eq!(
        highlight("'a -- b'"),
        "<span class=\"sql-string\">'a -- b'</span>"
    );
}

#[test]
fn test_highlight_comment_shields_keyword() {
    let out = highlight("-- select from where");
    assert_eq!(out, "<span class=\"sql-comment\">-- select from where</span>");
}

#[test]
fn test_highlight_block_comment() {
    assert_eq!(
        highlight("/* select */ 1"),
        "<span class=\"sql-comment\">/* select */</span> <span class=\"sql-number\">1</span>"
    );
}

#[test]
fn test_highlight_digits_inside_identifiers_not_numbers() {
    assert_eq!(highlight("col1"), "col1");
}

#[test]
fn test_extended_vocabulary_flows_through_mode() {
    let mode = Mode {
        keywords: vec!["ILIKE".to_string()],
        ..Mode::default()
    };
    let out = highlight_string("x ilike 'a%'", &mode).unwrap();
    assert!(out.contains("<span class=\"sql-keyword\">ilike</span>"));

    let formatted = format_string("select x from t where y ilike 'a%'", &mode).unwrap();
    assert!(formatted.contains("ILIKE"));
}
