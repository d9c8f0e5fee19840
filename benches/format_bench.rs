use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sqlpretty::{format, highlight};

/// A single flat statement with a long select list.
fn wide_query() -> String {
    let columns = (0..200)
        .map(|i| format!("col_{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "select {} from wide_table where region = 'emea' and year >= 2020 order by col_0",
        columns
    )
}

/// Many small statements chained with UNION ALL, subqueries included.
fn deep_query() -> String {
    (0..50)
        .map(|i| {
            format!(
                "select id, total from (select id, sum(amount) as total from orders_{} group by id) t",
                i
            )
        })
        .collect::<Vec<_>>()
        .join(" union all ")
}

fn bench_format(c: &mut Criterion) {
    let wide = wide_query();
    let deep = deep_query();

    c.bench_function("format_wide", |b| b.iter(|| format(black_box(&wide))));
    c.bench_function("format_deep", |b| b.iter(|| format(black_box(&deep))));

    // Preformatted input, the steady-state cost of a check run.
    let formatted = format(&wide);
    c.bench_function("format_noop", |b| b.iter(|| format(black_box(&formatted))));
}

fn bench_highlight(c: &mut Criterion) {
    let wide = wide_query();
    let deep = deep_query();

    c.bench_function("highlight_wide", |b| b.iter(|| highlight(black_box(&wide))));
    c.bench_function("highlight_deep", |b| b.iter(|| highlight(black_box(&deep))));
}

criterion_group!(benches, bench_format, bench_highlight);
criterion_main!(benches);
