use indexmap::IndexMap;
use regex::Regex;

/// Recursion guard for variable chains that reference each other
const MAX_RESOLVE_DEPTH: usize = 16;

/// Custom-property table extracted from compiled CSS, plus the machinery to
/// substitute `var()` references and reduce a constrained `calc()` subset.
///
/// Registration order is significant: `:root`/`:host` declarations are
/// recorded first, `@property` initial values second, and a later write for
/// the same name replaces the earlier one.
pub struct VariableTable {
    entries: IndexMap<String, String>,
    var_re: Regex,
    calc_spacing_re: Regex,
    calc_literal_re: Regex,
}

impl VariableTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            var_re: Regex::new(r"var\(\s*(--[\w-]+)\s*(?:,\s*([^()]*))?\)").unwrap(),
            calc_spacing_re: Regex::new(
                r"calc\(\s*var\((--[\w-]+)\)\s*\*\s*(-?[\d.]+)\s*\)",
            )
            .unwrap(),
            calc_literal_re: Regex::new(
                r"calc\(\s*(-?[\d.]+)([a-z%]+)\s*\*\s*(-?[\d.]+)\s*\)",
            )
            .unwrap(),
        }
    }

    /// Build the table from compiled CSS text.
    pub fn from_css(css: &str) -> Self {
        let mut table = Self::new();

        let block_re = Regex::new(r"(?s)(?::root|:host)[^{]*?\{(.*?)\}").unwrap();
        let decl_re = Regex::new(r"(--[\w-]+)\s*:\s*([^;]+);").unwrap();
        for block in block_re.captures_iter(css) {
            for decl in decl_re.captures_iter(&block[1]) {
                table
                    .entries
                    .insert(decl[1].to_string(), decl[2].trim().to_string());
            }
        }

        let property_re = Regex::new(r"(?s)@property\s+(--[\w-]+)\s*\{(.*?)\}").unwrap();
        let initial_re = Regex::new(r"initial-value\s*:\s*([^;]+);").unwrap();
        for block in property_re.captures_iter(css) {
            if let Some(initial) = initial_re.captures(&block[2]) {
                let value = initial[1]
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string();
                table.entries.insert(block[1].to_string(), value);
            }
        }

        table
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a raw declaration value: spacing-scale `calc()` first, then
    /// recursive `var()` substitution, then literal `calc()` reduction.
    /// Anything that doesn't fit passes through untouched.
    pub fn resolve(&self, value: &str) -> String {
        self.resolve_depth(value, 0)
    }

    fn resolve_depth(&self, value: &str, depth: usize) -> String {
        if depth > MAX_RESOLVE_DEPTH {
            return value.to_string();
        }

        let reduced = self.reduce_spacing_calc(value, depth);
        let substituted = self.substitute_vars(&reduced, depth);
        self.reduce_literal_calc(&substituted)
    }

    /// `calc(var(--x) * N)` where `--x` resolves to `0.25rem` collapses to
    /// `N * 4` pixels (the spacing scale is 4px per step).
    fn reduce_spacing_calc(&self, value: &str, depth: usize) -> String {
        self.calc_spacing_re
            .replace_all(value, |caps: &regex::Captures| {
                let resolved = self
                    .entries
                    .get(&caps[1])
                    .map(|stored| self.resolve_depth(stored, depth + 1));

                match (resolved.as_deref(), caps[2].parse::<f64>()) {
                    (Some("0.25rem"), Ok(n)) => format!("{}px", format_number(n * 4.0)),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn substitute_vars(&self, value: &str, depth: usize) -> String {
        let mut out = String::with_capacity(value.len());
        let mut last = 0;

        for caps in self.var_re.captures_iter(value) {
            let whole = caps.get(0).unwrap();
            out.push_str(&value[last..whole.start()]);

            if let Some(stored) = self.entries.get(&caps[1]) {
                out.push_str(&self.resolve_depth(stored, depth + 1));
            } else if let Some(fallback) = caps.get(2) {
                out.push_str(&self.resolve_depth(fallback.as_str().trim(), depth + 1));
            } else {
                // Unresolved reference passes through literally
                out.push_str(whole.as_str());
            }

            last = whole.end();
        }

        out.push_str(&value[last..]);
        out
    }

    /// `calc(Vunit * N)` collapses to the numeric product in the same unit.
    fn reduce_literal_calc(&self, value: &str) -> String {
        self.calc_literal_re
            .replace_all(value, |caps: &regex::Captures| {
                match (caps[1].parse::<f64>(), caps[3].parse::<f64>()) {
                    (Ok(v), Ok(n)) => format!("{}{}", format_number(v * n), &caps[2]),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

fn format_number(value: f64) -> String {
    if value == value.trunc() {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
