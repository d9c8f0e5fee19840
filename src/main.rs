use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use sqlpretty::mode::Mode;

/// sqlpretty - a SQL pretty-printer and syntax highlighter.
#[derive(Parser, Debug)]
#[command(name = "sqlpretty", version, about)]
struct Cli {
    /// Files or directories to process. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff.
    #[arg(long)]
    diff: bool,

    /// Skip the post-format equivalence check (faster).
    #[arg(long)]
    fast: bool,

    /// Emit highlight markup to stdout instead of reformatting.
    #[arg(long)]
    highlight: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Extra vocabulary keywords.
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// Extra major (line-breaking) keywords.
    #[arg(long = "major-keyword")]
    major_keywords: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Disable multi-threaded processing.
    #[arg(long)]
    single_process: bool,

    /// Path to config file (sqlpretty.toml or pyproject.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";

    let base_mode = match sqlpretty::load_config(&cli.files, cli.config.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let mode = Mode {
        check: cli.check,
        diff: cli.diff,
        fast: cli.fast,
        highlight: cli.highlight,
        exclude: if cli.exclude.is_empty() {
            base_mode.exclude
        } else {
            cli.exclude
        },
        keywords: merged(base_mode.keywords, cli.keywords),
        major_keywords: merged(base_mode.major_keywords, cli.major_keywords),
        verbose: cli.verbose,
        quiet: cli.quiet,
        threads: cli.threads,
        single_process: cli.single_process,
    };

    if is_stdin {
        let mut source = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {}", e);
            std::process::exit(2);
        }
        emit_one(&source, &mode);
    } else if mode.highlight {
        for path in sqlpretty::get_matching_paths(&cli.files, &mode) {
            match std::fs::read_to_string(&path) {
                Ok(source) => emit_one(&source, &mode),
                Err(e) => {
                    eprintln!("error: {}: {}", path.display(), e);
                    std::process::exit(2);
                }
            }
        }
    } else {
        let report = sqlpretty::run(&cli.files, &mode);

        if !mode.quiet {
            print_verbose_results(&report, &mode);
            eprintln!("{}", report);
        }

        report.print_errors();

        if report.has_errors() {
            std::process::exit(2);
        } else if mode.check && report.has_changes() {
            std::process::exit(1);
        }
    }
}

/// Format or highlight a single source and print it to stdout.
fn emit_one(source: &str, mode: &Mode) {
    let result = if mode.highlight {
        sqlpretty::highlight_string(source, mode)
    } else {
        sqlpretty::format_string(source, mode)
    };
    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn merged(mut base: Vec<String>, extra: Vec<String>) -> Vec<String> {
    base.extend(extra);
    base
}

fn print_verbose_results(report: &sqlpretty::report::Report, mode: &Mode) {
    if !mode.verbose {
        return;
    }
    for result in &report.results {
        match result.status {
            sqlpretty::report::FileStatus::Changed => {
                eprintln!("reformatted {}", result.path.display());
            }
            sqlpretty::report::FileStatus::Error => {
                eprintln!(
                    "error: {}: {}",
                    result.path.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            sqlpretty::report::FileStatus::Unchanged => {}
        }
    }
}
