use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SqlprettyError};
use crate::formatter::SqlFormatter;
use crate::highlighter::SqlHighlighter;
use crate::mode::Mode;
use crate::report::{FileResult, FileStatus, Report};

/// Reformat a SQL string according to the given mode.
/// This is the core API function.
pub fn format_string(source: &str, mode: &Mode) -> Result<String> {
    let vocab = mode.vocabulary()?;
    let formatted = SqlFormatter::new(&vocab).format(source);
    if mode.should_equivalence_check() {
        equivalence_check(source, &formatted)?;
    }
    Ok(formatted)
}

/// Produce highlight markup for a SQL string according to the given mode.
pub fn highlight_string(source: &str, mode: &Mode) -> Result<String> {
    let vocab = mode.vocabulary()?;
    Ok(SqlHighlighter::new(&vocab).highlight(source))
}

/// Verify that formatting only moved whitespace and changed keyword case:
/// source and output must agree after lowercasing and stripping all
/// whitespace. A mismatch means the formatter dropped or invented text.
fn equivalence_check(original: &str, formatted: &str) -> Result<()> {
    fn reduce(s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }

    if reduce(original) != reduce(formatted) {
        return Err(SqlprettyError::Equivalence(
            "formatted output does not reduce to the same text as the source".to_string(),
        ));
    }
    Ok(())
}

/// Run the formatter over a collection of files and directories.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    let mut report = Report::new();

    if mode.single_process || matching_paths.len() <= 1 {
        for path in &matching_paths {
            report.add(process_file(path, mode));
        }
    } else {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(mode.threads) // 0 = rayon default: all cores
            .build();
        let results: Vec<FileResult> = match pool {
            Ok(pool) => pool.install(|| {
                matching_paths
                    .par_iter()
                    .map(|path| process_file(path, mode))
                    .collect()
            }),
            // Fall back to sequential processing if the pool cannot start.
            Err(_) => matching_paths
                .iter()
                .map(|path| process_file(path, mode))
                .collect(),
        };
        for result in results {
            report.add(result);
        }
    }

    report
}

/// Format a single file in place (or report, in check/diff mode).
fn process_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => return FileResult::error(path.to_path_buf(), format!("Read error: {}", e)),
    };

    let formatted = match format_string(&source, mode) {
        Ok(f) => f,
        Err(e) => return FileResult::error(path.to_path_buf(), e.to_string()),
    };

    // Files keep a trailing newline; the in-memory API does not emit one.
    let contents = if formatted.is_empty() {
        String::new()
    } else {
        format!("{}\n", formatted)
    };

    if source == contents {
        return FileResult::new(path.to_path_buf(), FileStatus::Unchanged);
    }

    if mode.check || mode.diff {
        if mode.diff {
            print_diff(path, &source, &contents);
        }
        return FileResult::new(path.to_path_buf(), FileStatus::Changed);
    }

    match std::fs::write(path, &contents) {
        Ok(()) => FileResult::new(path.to_path_buf(), FileStatus::Changed),
        Err(e) => FileResult::error(path.to_path_buf(), format!("Write error: {}", e)),
    }
}

/// Expand the given paths into the sorted set of SQL files to process.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let mut found = HashSet::new();

    for path in paths {
        if path.is_file() {
            if has_sql_extension(path, extensions) {
                found.insert(path.clone());
            }
        } else if path.is_dir() {
            collect_sql_files(path, extensions, &mode.exclude, &mut found);
        }
    }

    let mut sorted: Vec<PathBuf> = found.into_iter().collect();
    sorted.sort();
    sorted
}

/// Check for a `.sql`-style extension (case-insensitive).
fn has_sql_extension(path: &Path, extensions: &[&str]) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    extensions
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|stem| stem.ends_with('.')))
}

/// Recursively collect SQL files, skipping hidden directories and
/// exclude-pattern matches.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[String],
    found: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if name.starts_with('.') {
            continue;
        }
        let excluded = exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&name))
                .unwrap_or(false)
        });
        if excluded {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, found);
        } else if has_sql_extension(&path, extensions) {
            found.insert(path);
        }
    }
}

/// Print a line diff between original and formatted content to stderr.
fn print_diff(path: &Path, original: &str, formatted: &str) {
    use similar::{ChangeTag, TextDiff};

    eprintln!("--- {}", path.display());
    eprintln!("+++ {}", path.display());

    let diff = TextDiff::from_lines(original, formatted);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        eprint!("{}{}", sign, change);
    }
}
