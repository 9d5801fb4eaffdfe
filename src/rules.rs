use crate::resolver::VariableTable;
use indexmap::IndexMap;
use regex::Regex;

/// Class name -> ordered camelCase property -> resolved literal value
pub type StaticStyleMap = IndexMap<String, IndexMap<String, String>>;

/// Parse single-class rules out of compiled CSS into the static style map.
///
/// Selectors are restricted to word characters, dots, hyphens, brackets and
/// backslash escapes, which covers arbitrary-value class names as the engine
/// emits them (`.max-w-\[672px\]`). The escaped selector is un-escaped to
/// recover the literal class name.
pub fn parse_rules(css: &str, table: &VariableTable) -> StaticStyleMap {
    let rule_re = Regex::new(r"\.([\w.\\\[\]%-]+)\s*\{([^}]*)\}").unwrap();
    let mut map = StaticStyleMap::new();

    for rule in rule_re.captures_iter(css) {
        let class_name = rule[1].replace('\\', "");
        let mut declarations = IndexMap::new();

        for declaration in rule[2].split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            // Hyphen-prefixed names are engine bookkeeping (--tw-*), skip
            if property.starts_with('-') {
                continue;
            }

            declarations.insert(kebab_to_camel(property), table.resolve(value));
        }

        if !declarations.is_empty() {
            map.insert(class_name, declarations);
        }
    }

    map
}

fn kebab_to_camel(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;

    for c in property.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Dimension utilities that accept arbitrary bracketed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxHeight,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Width,
        Dimension::Height,
        Dimension::MinWidth,
        Dimension::MinHeight,
        Dimension::MaxHeight,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            Dimension::Width => "w",
            Dimension::Height => "h",
            Dimension::MinWidth => "min-w",
            Dimension::MinHeight => "min-h",
            Dimension::MaxHeight => "max-h",
        }
    }

    pub fn property(&self) -> &'static str {
        match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
            Dimension::MinWidth => "minWidth",
            Dimension::MinHeight => "minHeight",
            Dimension::MaxHeight => "maxHeight",
        }
    }
}

/// The fixed, ordered set of recognized arbitrary-value class shapes.
///
/// These are data-only descriptors: the emitted converter functions are
/// rendered from the shape by the Emitter instead of being carried around as
/// source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamicShape {
    FontSize,
    LetterSpacing,
    MaxWidthPx,
    DimensionPx(Dimension),
    DimensionCalc(Dimension),
}

impl DynamicShape {
    /// Detection and emission order; earlier shapes win for a given token.
    pub fn ordered() -> Vec<DynamicShape> {
        let mut shapes = vec![
            DynamicShape::FontSize,
            DynamicShape::LetterSpacing,
            DynamicShape::MaxWidthPx,
        ];
        shapes.extend(Dimension::ALL.iter().map(|d| DynamicShape::DimensionPx(*d)));
        shapes.extend(Dimension::ALL.iter().map(|d| DynamicShape::DimensionCalc(*d)));
        shapes
    }

    /// Anchored regex source matching exactly this class shape
    pub fn regex_source(&self) -> String {
        match self {
            DynamicShape::FontSize => r"^text-\[(.+)\]$".to_string(),
            DynamicShape::LetterSpacing => r"^tracking-\[(.+)\]$".to_string(),
            DynamicShape::MaxWidthPx => r"^max-w-\[(\d+)px\]$".to_string(),
            DynamicShape::DimensionPx(d) => format!(r"^{}-\[(\d+)px\]$", d.prefix()),
            DynamicShape::DimensionCalc(d) => format!(r"^{}-\[(calc\(.+\))\]$", d.prefix()),
        }
    }

    /// camelCase inline-style property this shape produces
    pub fn property(&self) -> &'static str {
        match self {
            DynamicShape::FontSize => "fontSize",
            DynamicShape::LetterSpacing => "letterSpacing",
            DynamicShape::MaxWidthPx => "maxWidth",
            DynamicShape::DimensionPx(d) | DynamicShape::DimensionCalc(d) => d.property(),
        }
    }

    /// Whether the converter appends a pixel suffix to the captured value
    pub fn appends_px(&self) -> bool {
        matches!(
            self,
            DynamicShape::MaxWidthPx | DynamicShape::DimensionPx(_)
        )
    }
}

/// One recognized arbitrary-value pattern, deduplicated by regex source
#[derive(Debug, Clone)]
pub struct DynamicPattern {
    pub shape: DynamicShape,
    pub regex_source: String,
    regex: Regex,
}

impl DynamicPattern {
    fn new(shape: DynamicShape) -> Self {
        let regex_source = shape.regex_source();
        let regex = Regex::new(&regex_source).unwrap();
        Self {
            shape,
            regex_source,
            regex,
        }
    }

    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// Apply the pattern to a token, producing the inline-style pair
    pub fn apply(&self, token: &str) -> Option<(&'static str, String)> {
        let captures = self.regex.captures(token)?;
        let captured = captures.get(1)?.as_str();

        let value = if self.shape.appends_px() {
            format!("{}px", captured)
        } else {
            captured.to_string()
        };

        Some((self.shape.property(), value))
    }
}

/// Detect dynamic patterns from the harvested class-token set.
///
/// Only tokens containing a bracketed argument are considered; tokens that
/// match no recognized shape are silently omitted here and surface through
/// the validator instead.
pub fn detect_dynamic_patterns<'a, I>(classes: I) -> Vec<DynamicPattern>
where
    I: IntoIterator<Item = &'a str>,
{
    let shapes: Vec<DynamicPattern> = DynamicShape::ordered()
        .into_iter()
        .map(DynamicPattern::new)
        .collect();

    let mut patterns: Vec<DynamicPattern> = Vec::new();

    for token in classes {
        if !token.contains('[') || !token.contains(']') {
            continue;
        }

        if let Some(shape) = shapes.iter().find(|p| p.matches(token)) {
            if !patterns.iter().any(|p| p.regex_source == shape.regex_source) {
                patterns.push(shape.clone());
            }
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let table = VariableTable::new();
        let map = parse_rules(".mt-4 { margin-top: 1rem; }", &table);
        assert_eq!(map["mt-4"]["marginTop"], "1rem");
    }

    #[test]
    fn test_parse_resolves_variables() {
        let table = VariableTable::from_css(":root { --gray-500: #888; }");
        let map = parse_rules(".text-gray-500 { color: var(--gray-500); }", &table);
        assert_eq!(map["text-gray-500"]["color"], "#888");
    }

    #[test]
    fn test_parse_reduces_spacing_calc() {
        let table = VariableTable::from_css(":root { --spacing: 0.25rem; }");
        let map = parse_rules(".p-4 { padding: calc(var(--spacing) * 4); }", &table);
        assert_eq!(map["p-4"]["padding"], "16px");
    }

    #[test]
    fn test_parse_skips_engine_bookkeeping_properties() {
        let table = VariableTable::new();
        let map = parse_rules(
            ".shadow { --tw-shadow: 0 1px 2px #0003; box-shadow: 0 1px 2px #0003; }",
            &table,
        );
        assert_eq!(map["shadow"].len(), 1);
        assert!(map["shadow"].contains_key("boxShadow"));
    }

    #[test]
    fn test_parse_unescapes_arbitrary_selector() {
        let table = VariableTable::new();
        let map = parse_rules(r".max-w-\[672px\] { max-width: 672px; }", &table);
        assert_eq!(map["max-w-[672px]"]["maxWidth"], "672px");
    }

    #[test]
    fn test_kebab_to_camel() {
        assert_eq!(kebab_to_camel("margin-top"), "marginTop");
        assert_eq!(kebab_to_camel("border-bottom-left-radius"), "borderBottomLeftRadius");
        assert_eq!(kebab_to_camel("color"), "color");
    }

    #[test]
    fn test_max_width_pattern() {
        let patterns = detect_dynamic_patterns(["max-w-[672px]"]);
        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].matches("max-w-[672px]"));
        assert!(!patterns[0].matches("max-w-[50%]"));

        let (property, value) = patterns[0].apply("max-w-[672px]").unwrap();
        assert_eq!(property, "maxWidth");
        assert_eq!(value, "672px");
    }

    #[test]
    fn test_font_size_and_tracking_patterns() {
        let patterns = detect_dynamic_patterns(["text-[14px]", "tracking-[0.02em]"]);
        assert_eq!(patterns.len(), 2);

        let (property, value) = patterns[0].apply("text-[14px]").unwrap();
        assert_eq!((property, value.as_str()), ("fontSize", "14px"));

        let (property, value) = patterns[1].apply("tracking-[0.02em]").unwrap();
        assert_eq!((property, value.as_str()), ("letterSpacing", "0.02em"));
    }

    #[test]
    fn test_dimension_calc_pattern() {
        let patterns = detect_dynamic_patterns(["w-[calc(100%-24px)]"]);
        assert_eq!(patterns.len(), 1);

        let (property, value) = patterns[0].apply("w-[calc(100%-24px)]").unwrap();
        assert_eq!(property, "width");
        assert_eq!(value, "calc(100%-24px)");
    }

    #[test]
    fn test_patterns_deduplicate_by_regex_source() {
        let patterns = detect_dynamic_patterns(["w-[100px]", "w-[240px]", "h-[32px]"]);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].shape, DynamicShape::DimensionPx(Dimension::Width));
        assert_eq!(patterns[1].shape, DynamicShape::DimensionPx(Dimension::Height));
    }

    #[test]
    fn test_unrecognized_bracket_token_is_omitted() {
        let patterns = detect_dynamic_patterns(["bg-[#1a73e8]", "grid-cols-[1fr,2fr]"]);
        assert!(patterns.is_empty());
    }
}
