use crate::errors::{GeneratorError, Result};
use indexmap::IndexSet;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum template size in bytes; larger files are skipped with a warning
const MAX_TEMPLATE_SIZE: u64 = 10 * 1024 * 1024;

/// Collect template files matching the given glob patterns.
///
/// Relative patterns are resolved against `base_dir`. Directories are
/// skipped, duplicates collapse, and the result is sorted so downstream
/// processing is deterministic.
pub fn collect_files(patterns: &[String], base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for pattern in patterns {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base_dir.join(pattern).to_string_lossy().into_owned()
        };

        for entry in glob::glob(&full_pattern)? {
            let path = entry?;

            if path.is_dir() {
                continue;
            }

            if let Ok(metadata) = fs::metadata(&path) {
                if metadata.len() > MAX_TEMPLATE_SIZE {
                    eprintln!(
                        "Warning: Skipping oversized template {} ({} bytes)",
                        path.display(),
                        metadata.len()
                    );
                    continue;
                }
            }

            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Regex-based harvester for class-bearing attributes.
///
/// This is a lexical scan, not an AST extraction: it recognizes the literal
/// shapes templates actually use for class attributes and strips template
/// interpolation spans before tokenizing.
pub struct ClassHarvester {
    attribute_patterns: Vec<Regex>,
    interpolation: Regex,
}

impl ClassHarvester {
    pub fn new() -> Self {
        // Four recognized literal shapes: double-quoted, single-quoted,
        // backtick template literal (braced or bare), single-quoted-in-braces.
        let attribute_patterns = vec![
            Regex::new(r#"class(?:Name)?\s*=\s*"([^"]*)""#).unwrap(),
            Regex::new(r"class(?:Name)?\s*=\s*'([^']*)'").unwrap(),
            Regex::new(r"class(?:Name)?\s*=\s*\{?\s*`([^`]*)`\s*\}?").unwrap(),
            Regex::new(r"class(?:Name)?\s*=\s*\{\s*'([^']*)'\s*\}").unwrap(),
        ];

        Self {
            attribute_patterns,
            interpolation: Regex::new(r"\$\{[^}]*\}").unwrap(),
        }
    }

    /// Harvest class tokens from one template's text, in order of appearance.
    pub fn harvest_content(&self, content: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for pattern in &self.attribute_patterns {
            for captures in pattern.captures_iter(content) {
                let literal = &captures[1];
                // Interpolation spans are deleted outright so no token is
                // ever derived from a dynamic expression.
                let stripped = self.interpolation.replace_all(literal, "");

                for token in stripped.split_whitespace() {
                    tokens.push(token.to_string());
                }
            }
        }

        tokens
    }

    /// Harvest the distinct class tokens used across all template files.
    ///
    /// An unreadable template is fatal for the run; no partial-file recovery.
    pub fn harvest_files(&self, files: &[PathBuf]) -> Result<IndexSet<String>> {
        let per_file: Vec<Vec<String>> = files
            .par_iter()
            .map(|path| {
                let content =
                    fs::read_to_string(path).map_err(|e| GeneratorError::TemplateRead {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                Ok(self.harvest_content(&content))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut classes = IndexSet::new();
        for tokens in per_file {
            classes.extend(tokens);
        }

        Ok(classes)
    }
}

impl Default for ClassHarvester {
    fn default() -> Self {
        Self::new()
    }
}
