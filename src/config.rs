use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SqlprettyError;
use crate::mode::Mode;

/// Load sqlpretty configuration from a `sqlpretty.toml` file or a
/// `[tool.sqlpretty]` table in `pyproject.toml`. When no explicit path is
/// given, the common parent directories of the input files are searched,
/// most specific first.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SqlprettyError> {
    let mut mode = Mode::default();

    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(SqlprettyError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => find_config_file(files),
    };

    if let Some(path) = config_file {
        let raw = read_config_table(&path)?;
        apply_config(&mut mode, &raw)?;
    }

    Ok(mode)
}

/// Search the parent chain of every input path for a config file.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    for dir in candidate_dirs(files) {
        for name in ["sqlpretty.toml", "pyproject.toml"] {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Parent directories of the given paths, most specific first, deduplicated.
fn candidate_dirs(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for file in files {
        let start = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            let owned = dir.to_path_buf();
            if !dirs.contains(&owned) {
                dirs.push(owned);
            }
            current = dir.parent();
        }
    }
    dirs
}

/// Parse the config file and pull out the sqlpretty table.
fn read_config_table(path: &Path) -> Result<HashMap<String, toml::Value>, SqlprettyError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: toml::Value = content.parse().map_err(|e| {
        SqlprettyError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    let is_own_file = path
        .file_name()
        .is_some_and(|name| name == "sqlpretty.toml");

    let section = if is_own_file {
        Some(&parsed)
    } else {
        parsed.get("tool").and_then(|t| t.get("sqlpretty"))
    };

    match section {
        Some(toml::Value::Table(table)) => Ok(table
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect()),
        _ => Ok(HashMap::new()),
    }
}

/// Apply configuration values to a Mode, rejecting unknown keys.
fn apply_config(
    mode: &mut Mode,
    config: &HashMap<String, toml::Value>,
) -> Result<(), SqlprettyError> {
    const KNOWN_KEYS: &[&str] = &["exclude", "keywords", "major_keywords"];

    for key in config.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            return Err(SqlprettyError::Config(format!(
                "Unknown config option: {}",
                key
            )));
        }
    }

    if let Some(toml::Value::Array(patterns)) = config.get("exclude") {
        mode.exclude = string_items(patterns);
    }
    if let Some(toml::Value::Array(words)) = config.get("keywords") {
        mode.keywords = string_items(words);
    }
    if let Some(toml::Value::Array(words)) = config.get("major_keywords") {
        mode.major_keywords = string_items(words);
    }

    Ok(())
}

fn string_items(values: &[toml::Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, toml::Value)]) -> HashMap<String, toml::Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_apply_config() {
        let mut mode = Mode::default();
        let config = table(&[(
            "keywords",
            toml::Value::Array(vec![toml::Value::String("QUALIFY".to_string())]),
        )]);
        apply_config(&mut mode, &config).unwrap();
        assert_eq!(mode.keywords, vec!["QUALIFY".to_string()]);
    }

    #[test]
    fn test_unknown_config_key_error() {
        let mut mode = Mode::default();
        let config = table(&[("line_length", toml::Value::Integer(88))]);
        assert!(apply_config(&mut mode, &config).is_err());
    }

    #[test]
    fn test_missing_explicit_config_errors() {
        let result = load_config(&[], Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_own_file_top_level_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqlpretty.toml");
        std::fs::write(&path, "exclude = [\"target/*\"]\n").unwrap();
        let raw = read_config_table(&path).unwrap();
        assert!(raw.contains_key("exclude"));
    }

    #[test]
    fn test_pyproject_tool_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, "[tool.sqlpretty]\nkeywords = [\"QUALIFY\"]\n").unwrap();
        let raw = read_config_table(&path).unwrap();
        assert!(raw.contains_key("keywords"));
    }
}
