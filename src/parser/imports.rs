//! Import specifier discovery and resolution.
//!
//! Turns the script text of one component into the list of file paths it
//! refers to. Paths are not checked for existence here; the graph builder
//! drops the ones that do not match a discovered component.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use path_clean::PathClean;
use regex::Regex;

/// Extension appended to specifiers that do not name one.
pub const DEFAULT_EXTENSION: &str = "vue";

static FROM_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"from\s+['"](.+?)['"]"#).expect("valid import pattern"));

/// How a specifier is anchored, decided by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `./x`, `../x`: relative to the importing file's directory
    Relative,
    /// `~/x`, `@/x`, `/x`: relative to the project root
    RootRelative,
    /// Anything else. Resolved like a relative specifier; package names
    /// simply never match a component.
    Bare,
}

impl SpecifierKind {
    /// Classifies a raw specifier.
    pub fn of(specifier: &str) -> Self {
        match specifier.chars().next() {
            Some('.') => SpecifierKind::Relative,
            Some('~' | '@' | '/') => SpecifierKind::RootRelative,
            _ => SpecifierKind::Bare,
        }
    }
}

/// Resolves import specifiers for one project.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    project_root: PathBuf,
    extension: String,
}

impl ImportResolver {
    /// Creates a resolver anchored at `project_root` using the default
    /// component extension.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_extension(project_root, DEFAULT_EXTENSION)
    }

    /// Creates a resolver with a custom component extension (without the dot).
    pub fn with_extension(project_root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            project_root: project_root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the candidate dependency paths of the file at `importer`.
    ///
    /// The result is sorted byte-wise on the path text and keeps duplicates.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use vuedeps::parser::ImportResolver;
    ///
    /// let resolver = ImportResolver::new("/app");
    /// let refs = resolver.resolve(
    ///     "/app/src/Page.vue".as_ref(),
    ///     "import Nav from './Nav'\nimport Card from '@/widgets/Card'",
    /// );
    /// assert_eq!(
    ///     refs,
    ///     vec![
    ///         PathBuf::from("/app/src/Nav.vue"),
    ///         PathBuf::from("/app/widgets/Card.vue"),
    ///     ]
    /// );
    /// ```
    pub fn resolve(&self, importer: &Path, script: &str) -> Vec<PathBuf> {
        let mut refs: Vec<PathBuf> = import_specifiers(script)
            .map(|specifier| self.resolve_specifier(importer, specifier))
            .collect();

        refs.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        refs
    }

    /// Resolves a single specifier as imported from `importer`.
    pub fn resolve_specifier(&self, importer: &Path, specifier: &str) -> PathBuf {
        let specifier = self.with_default_extension(specifier);

        let resolved = match SpecifierKind::of(&specifier) {
            SpecifierKind::RootRelative => {
                // Drop the marker, then any slash left over from `@/`.
                let rest = specifier[1..].trim_start_matches('/');
                self.project_root.join(rest)
            }
            SpecifierKind::Relative | SpecifierKind::Bare => importer_dir(importer).join(&specifier),
        };

        resolved.clean()
    }

    fn with_default_extension(&self, specifier: &str) -> String {
        if Path::new(specifier).extension().is_some() {
            specifier.to_string()
        } else {
            format!("{specifier}.{}", self.extension)
        }
    }
}

/// Iterates the raw module specifiers of every `... from '<spec>'` clause.
pub fn import_specifiers(script: &str) -> impl Iterator<Item = &str> {
    FROM_CLAUSE
        .captures_iter(script)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn importer_dir(importer: &Path) -> &Path {
    importer.parent().unwrap_or_else(|| Path::new(""))
}
