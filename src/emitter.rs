use crate::errors::{GeneratorError, Result};
use crate::rules::{DynamicPattern, StaticStyleMap};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Descriptive counts embedded as a comment in the generated module
#[derive(Debug, Clone, Serialize)]
pub struct GenerationStats {
    pub template_files: usize,
    pub unique_classes: usize,
    pub static_entries: usize,
    pub dynamic_patterns: usize,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of one configuration's emit step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Output file was (re)written
    Written,
    /// Existing content already matched; no write performed
    Unchanged,
    /// No templates or classes found; nothing generated
    Skipped,
}

/// Render the generated TypeScript module: stats comment, static map,
/// dynamic pattern array, combined styles-map export.
pub fn render_module(
    static_map: &StaticStyleMap,
    patterns: &[DynamicPattern],
    stats: &GenerationStats,
) -> String {
    let mut out = String::new();

    out.push_str("/**\n");
    out.push_str(" * Auto-generated inline style map. DO NOT EDIT.\n");
    out.push_str(" *\n");
    out.push_str(&format!(
        " * Template files scanned: {}\n",
        stats.template_files
    ));
    out.push_str(&format!(
        " * Unique classes harvested: {}\n",
        stats.unique_classes
    ));
    out.push_str(&format!(" * Static entries: {}\n", stats.static_entries));
    out.push_str(&format!(
        " * Dynamic patterns: {}\n",
        stats.dynamic_patterns
    ));
    out.push_str(&format!(
        " * Generated at: {}\n",
        stats.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(" */\n\n");

    out.push_str("import type { CSSProperties } from 'react';\n\n");

    out.push_str("export const cssMap: Record<string, Partial<CSSProperties>> = {\n");
    for (class_name, declarations) in static_map {
        let body: Vec<String> = declarations
            .iter()
            .map(|(property, value)| format!("{}: '{}'", property, escape_single_quoted(value)))
            .collect();
        out.push_str(&format!(
            "  '{}': {{ {} }},\n",
            escape_single_quoted(class_name),
            body.join(", ")
        ));
    }
    out.push_str("};\n\n");

    out.push_str(
        "export const dynamicPatterns: { regex: RegExp; converter: (m: RegExpMatchArray) => Partial<CSSProperties> }[] = [\n",
    );
    for pattern in patterns {
        let value_expr = if pattern.shape.appends_px() {
            "`${m[1]}px`".to_string()
        } else {
            "m[1]".to_string()
        };
        out.push_str(&format!(
            "  {{ regex: /{}/, converter: (m) => ({{ {}: {} }}) }},\n",
            pattern.regex_source,
            pattern.shape.property(),
            value_expr
        ));
    }
    out.push_str("];\n\n");

    out.push_str("export const stylesMap = { cssMap, dynamicPatterns };\n\n");
    out.push_str("export default stylesMap;\n");

    out
}

fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Everything except the generation timestamp takes part in the change check
fn content_fingerprint(text: &str) -> String {
    text.lines()
        .filter(|line| !line.contains("Generated at:"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the module only if its content differs from what is on disk.
///
/// A missing or unreadable existing file counts as "no existing content" and
/// forces a write. Parent directories are created as needed.
pub fn write_if_changed(path: &Path, text: &str) -> Result<EmitOutcome> {
    if let Ok(existing) = fs::read_to_string(path) {
        if content_fingerprint(&existing) == content_fingerprint(text) {
            return Ok(EmitOutcome::Unchanged);
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    write_atomic(path, text).map_err(|e| GeneratorError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(EmitOutcome::Written)
}

/// Write by way of a temp file and rename so readers never see a torn file
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VariableTable;
    use crate::rules::{detect_dynamic_patterns, parse_rules};
    use tempfile::tempdir;

    fn stats() -> GenerationStats {
        GenerationStats {
            template_files: 2,
            unique_classes: 5,
            static_entries: 1,
            dynamic_patterns: 1,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_static_entry_round_trip() {
        let table = VariableTable::new();
        let static_map = parse_rules(".mt-4 { margin-top: 1rem; }", &table);

        let text = render_module(&static_map, &[], &stats());
        assert!(text.contains("'mt-4': { marginTop: '1rem' },"));
        assert!(text.contains("export const stylesMap = { cssMap, dynamicPatterns };"));
    }

    #[test]
    fn test_render_dynamic_pattern() {
        let patterns = detect_dynamic_patterns(["max-w-[672px]", "w-[calc(100%-24px)]"]);
        let text = render_module(&StaticStyleMap::new(), &patterns, &stats());

        assert!(text.contains(r"{ regex: /^max-w-\[(\d+)px\]$/, converter: (m) => ({ maxWidth: `${m[1]}px` }) },"));
        assert!(text.contains(r"{ regex: /^w-\[(calc\(.+\))\]$/, converter: (m) => ({ width: m[1] }) },"));
    }

    #[test]
    fn test_render_escapes_quotes() {
        let mut static_map = StaticStyleMap::new();
        let mut declarations = indexmap::IndexMap::new();
        declarations.insert(
            "fontFamily".to_string(),
            "'Helvetica Neue', sans-serif".to_string(),
        );
        static_map.insert("font-sans".to_string(), declarations);

        let text = render_module(&static_map, &[], &stats());
        assert!(text.contains(r"fontFamily: '\'Helvetica Neue\', sans-serif'"));
    }

    #[test]
    fn test_write_if_changed_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generated").join("styles.ts");

        let table = VariableTable::new();
        let static_map = parse_rules(".mt-4 { margin-top: 1rem; }", &table);
        let first = render_module(&static_map, &[], &stats());

        assert_eq!(write_if_changed(&path, &first).unwrap(), EmitOutcome::Written);

        // Same content, fresh timestamp: must not rewrite
        let second = render_module(&static_map, &[], &stats());
        assert_eq!(
            write_if_changed(&path, &second).unwrap(),
            EmitOutcome::Unchanged
        );

        // Changed map: must rewrite
        let changed_map = parse_rules(".mt-4 { margin-top: 2rem; }", &table);
        let third = render_module(&changed_map, &[], &stats());
        assert_eq!(write_if_changed(&path, &third).unwrap(), EmitOutcome::Written);
        assert!(fs::read_to_string(&path).unwrap().contains("2rem"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("styles.ts");

        let outcome = write_if_changed(&path, "export const stylesMap = {};\n").unwrap();
        assert_eq!(outcome, EmitOutcome::Written);
        assert!(path.exists());
    }
}
