use crate::rules::{DynamicPattern, StaticStyleMap};
use indexmap::IndexSet;

/// Advisory diff between template usage and the generated style map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Classes used in templates but covered by neither the static map nor
    /// any dynamic pattern
    pub missing: Vec<String>,
    /// Static-map entries no current template references
    pub obsolete: Vec<String>,
}

impl ValidationResult {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.obsolete.is_empty()
    }
}

/// Recompute which harvested classes the generated map fails to cover and
/// which static entries are unused. Never fails the run.
pub fn validate(
    classes: &IndexSet<String>,
    static_map: &StaticStyleMap,
    patterns: &[DynamicPattern],
) -> ValidationResult {
    let mut missing: Vec<String> = classes
        .iter()
        .filter(|class| !static_map.contains_key(*class))
        .filter(|class| !patterns.iter().any(|p| p.matches(class.as_str())))
        .cloned()
        .collect();
    missing.sort();

    let mut obsolete: Vec<String> = static_map
        .keys()
        .filter(|class| !classes.contains(*class))
        .cloned()
        .collect();
    obsolete.sort();

    ValidationResult { missing, obsolete }
}

/// Surface a validation result as console warnings
pub fn report(result: &ValidationResult) {
    if !result.missing.is_empty() {
        eprintln!(
            "Warning: {} class(es) have no static entry and match no dynamic pattern: {}",
            result.missing.len(),
            result.missing.join(", ")
        );
    }

    if !result.obsolete.is_empty() {
        eprintln!(
            "Warning: {} static entr(ies) are unused by current templates: {}",
            result.obsolete.len(),
            result.obsolete.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VariableTable;
    use crate::rules::{detect_dynamic_patterns, parse_rules};

    fn classes(names: &[&str]) -> IndexSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_and_obsolete() {
        let table = VariableTable::new();
        let static_map = parse_rules(
            ".a { color: red; } .c { color: blue; }",
            &table,
        );

        let result = validate(&classes(&["a", "b"]), &static_map, &[]);
        assert_eq!(result.missing, vec!["b"]);
        assert_eq!(result.obsolete, vec!["c"]);
    }

    #[test]
    fn test_dynamic_pattern_covers_class() {
        let table = VariableTable::new();
        let static_map = parse_rules(".a { color: red; }", &table);
        let patterns = detect_dynamic_patterns(["max-w-[672px]"]);

        let result = validate(&classes(&["a", "max-w-[672px]"]), &static_map, &patterns);
        assert!(result.missing.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn test_unrecognized_bracket_token_reported_missing() {
        let static_map = StaticStyleMap::new();
        let patterns = detect_dynamic_patterns(["bg-[#1a73e8]"]);

        let result = validate(&classes(&["bg-[#1a73e8]"]), &static_map, &patterns);
        assert_eq!(result.missing, vec!["bg-[#1a73e8]"]);
    }

    #[test]
    fn test_results_are_sorted() {
        let static_map = StaticStyleMap::new();
        let result = validate(&classes(&["z-10", "a-1", "m-2"]), &static_map, &[]);
        assert_eq!(result.missing, vec!["a-1", "m-2", "z-10"]);
    }
}
