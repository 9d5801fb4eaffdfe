use std::fs;
use std::path::{Path, PathBuf};

/// Import directives that pull in the utility engine's own layers.
/// User theme CSS is concatenated after these so its custom properties win
/// at cascade time inside the engine.
pub const ENGINE_DIRECTIVES: &str = "@import \"tailwindcss/theme.css\" layer(theme);\n@import \"tailwindcss/utilities.css\" layer(utilities);\n";

/// Compose the input CSS handed to the utility engine.
///
/// Falls back to the engine defaults when no theme file is supplied or none
/// loads; unreadable theme files are skipped with a warning, never fatal.
pub fn compose_input(css_inputs: &[PathBuf]) -> String {
    let mut theme_css = String::new();

    for path in css_inputs {
        match fs::read_to_string(path) {
            Ok(content) => {
                theme_css.push_str(&content);
                if !content.ends_with('\n') {
                    theme_css.push('\n');
                }
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to read theme CSS {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    if theme_css.is_empty() {
        ENGINE_DIRECTIVES.to_string()
    } else {
        format!("{}{}", ENGINE_DIRECTIVES, theme_css)
    }
}

/// A stylesheet resolved on behalf of the utility engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStylesheet {
    pub path: PathBuf,
    pub base: PathBuf,
    pub content: String,
}

impl ResolvedStylesheet {
    /// Empty placeholder returned when a stylesheet cannot be read
    pub fn empty() -> Self {
        Self {
            path: PathBuf::new(),
            base: PathBuf::new(),
            content: String::new(),
        }
    }
}

/// Seam through which the utility engine loads nested `@import`s from disk
pub trait StylesheetResolver: Send + Sync {
    fn resolve(&self, id: &str, base: &Path) -> ResolvedStylesheet;
}

/// Filesystem resolver: engine-namespaced imports come from `node_modules`,
/// everything else is read relative to the requesting file's directory.
pub struct FsResolver {
    node_modules: PathBuf,
}

impl FsResolver {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            node_modules: base_dir.join("node_modules"),
        }
    }

    fn locate(&self, id: &str, base: &Path) -> PathBuf {
        if id == "tailwindcss" {
            self.node_modules.join("tailwindcss").join("index.css")
        } else if let Some(rest) = id.strip_prefix("tailwindcss/") {
            self.node_modules.join("tailwindcss").join(rest)
        } else if Path::new(id).is_absolute() {
            PathBuf::from(id)
        } else {
            base.join(id)
        }
    }
}

impl StylesheetResolver for FsResolver {
    fn resolve(&self, id: &str, base: &Path) -> ResolvedStylesheet {
        let path = self.locate(id, base);

        match fs::read_to_string(&path) {
            Ok(content) => {
                let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
                ResolvedStylesheet {
                    path,
                    base,
                    content,
                }
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to resolve stylesheet '{}' ({}): {}",
                    id,
                    path.display(),
                    e
                );
                ResolvedStylesheet::empty()
            }
        }
    }
}
