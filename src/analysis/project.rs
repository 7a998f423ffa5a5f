//! Project scan: discover component files and resolve their imports.

use std::path::Path;

use thiserror::Error;

use super::fs::{FileSystem, WalkEntry};
use crate::graph::{Component, ComponentSet};
use crate::parser::{extract_script, ImportResolver, ParseError};

/// Errors that can occur while scanning a project.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("Failed to parse {path}: {source}")]
    Markup {
        path: String,
        #[source]
        source: ParseError,
    },
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Walks the resolver's project root and builds the set of components.
///
/// Only regular files carrying the resolver's component extension are
/// considered. Any read or markup failure aborts the scan.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use vuedeps::analysis::{scan_project, MemoryFileSystem};
/// use vuedeps::parser::ImportResolver;
///
/// let fs = MemoryFileSystem::new()
///     .with_file("/p/App.vue", "<script>import Nav from './Nav'</script>")
///     .with_file("/p/Nav.vue", "<template/>")
///     .with_file("/p/readme.md", "# not a component");
///
/// let set = scan_project(&fs, &ImportResolver::new("/p")).unwrap();
/// assert_eq!(set.len(), 2);
/// ```
pub fn scan_project<F: FileSystem + ?Sized>(
    fs: &F,
    resolver: &ImportResolver,
) -> AnalysisResult<ComponentSet> {
    let root = resolver.project_root();
    let mut set = ComponentSet::new();

    for entry in fs.walk(root)? {
        if !is_component(&entry, resolver.extension()) {
            continue;
        }

        let component = load_component(fs, resolver, &entry.path)?;
        tracing::debug!(
            path = %component.path.display(),
            refs = component.candidate_refs.len(),
            "component discovered"
        );
        set.insert(component);
    }

    tracing::info!(root = %root.display(), components = set.len(), "project scanned");
    Ok(set)
}

/// Reads one component file and resolves its imports.
pub fn load_component<F: FileSystem + ?Sized>(
    fs: &F,
    resolver: &ImportResolver,
    path: &Path,
) -> AnalysisResult<Component> {
    let bytes = fs.read(path)?;
    let script = extract_script(&bytes).map_err(|source| AnalysisError::Markup {
        path: path.display().to_string(),
        source,
    })?;

    let candidate_refs = resolver.resolve(path, &script);
    Ok(Component::new(path, script, candidate_refs))
}

fn is_component(entry: &WalkEntry, extension: &str) -> bool {
    !entry.is_dir && entry.path.extension().is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MemoryFileSystem;
    use crate::graph::ComponentGraph;
    use std::path::PathBuf;

    /// Two mirrored folders importing each other plus a three-way cycle.
    fn fixture() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_dir("/AAA")
            .with_dir("/BBB")
            .with_dir("/CCC")
            .with_file("/AAA/Alice.vue", "<script>import Bard from './BBB/Bard'</script>")
            .with_file("/AAA/Bob.vue", "<script>import Cat from './BBB/Cat'</script>")
            .with_file("/AAA/Charile.vue", "<script>import Dog from './BBB/Dog'</script>")
            .with_dir("/AAA/BBB")
            .with_file("/AAA/BBB/Bard.vue", "<script>import Alice from '../Alice'</script>")
            .with_file("/AAA/BBB/Cat.vue", "<script>import Bob from '../Bob'</script>")
            .with_file("/AAA/BBB/Dog.vue", "<script>import Charile from '../Charile'</script>")
            .with_file("/BBB/Bard.vue", "<script>import Alice from '../AAA/Alice'</script>")
            .with_file("/BBB/Cat.vue", "<script>import Bob from '../AAA/Bob'</script>")
            .with_file("/BBB/Dog.vue", "<script>import Charile from '../AAA/Charile'</script>")
            .with_file("/CCC/Bike.vue", "<script>import Car from './Car'</script>")
            .with_file("/CCC/Car.vue", "<script>import Train from './Train'</script>")
            .with_file("/CCC/Train.vue", "<script>import Bike from './Bike'</script>")
    }

    #[test]
    fn test_scan_finds_all_components() {
        let set = scan_project(&fixture(), &ImportResolver::new("/")).unwrap();
        assert_eq!(set.len(), 12);
        assert!(!set.contains(Path::new("/AAA")));
    }

    #[test]
    fn test_scan_resolves_refs() {
        let set = scan_project(&fixture(), &ImportResolver::new("/")).unwrap();

        let bard = set.get(Path::new("/AAA/BBB/Bard.vue")).unwrap();
        assert_eq!(bard.candidate_refs, vec![PathBuf::from("/AAA/Alice.vue")]);
        assert_eq!(bard.script, "import Alice from '../Alice'");

        let outer = set.get(Path::new("/BBB/Bard.vue")).unwrap();
        assert_eq!(outer.candidate_refs, vec![PathBuf::from("/AAA/Alice.vue")]);
    }

    #[test]
    fn test_scanned_graph() {
        let set = scan_project(&fixture(), &ImportResolver::new("/")).unwrap();
        let graph = ComponentGraph::build(set);

        let alice = graph.node(Path::new("/AAA/Alice.vue")).unwrap();
        let parents: Vec<_> = graph
            .parents(alice)
            .into_iter()
            .map(|idx| graph.component(idx).path.clone())
            .collect();
        assert_eq!(
            parents,
            vec![PathBuf::from("/AAA/BBB/Bard.vue"), PathBuf::from("/BBB/Bard.vue")]
        );

        assert_eq!(graph.detect_cycles().len(), 4);
    }

    #[test]
    fn test_non_component_files_are_ignored() {
        let fs = MemoryFileSystem::new()
            .with_file("/p/App.vue", "<script>import x from './util.js'</script>")
            .with_file("/p/util.js", "export default 1")
            .with_dir("/p/Fake.vue");

        let set = scan_project(&fs, &ImportResolver::new("/p")).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(Path::new("/p/App.vue")));
    }

    #[test]
    fn test_custom_extension() {
        let fs = MemoryFileSystem::new()
            .with_file("/p/App.svelte", "<script>import B from './B'</script>")
            .with_file("/p/B.svelte", "")
            .with_file("/p/C.vue", "");

        let set = scan_project(&fs, &ImportResolver::with_extension("/p", "svelte")).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(Path::new("/p/App.svelte")).unwrap().candidate_refs,
            vec![PathBuf::from("/p/B.svelte")]
        );
    }

    #[test]
    fn test_markup_error_names_the_file() {
        let fs = MemoryFileSystem::new()
            .with_file("/p/Good.vue", "<script></script>")
            .with_file("/p/Broken.vue", "<script>import A from './A'");

        let err = scan_project(&fs, &ImportResolver::new("/p")).unwrap_err();
        assert!(matches!(
            &err,
            AnalysisError::Markup { path, source: ParseError::UnclosedElement(0) } if path == "/p/Broken.vue"
        ));
        assert!(err.to_string().starts_with("Failed to parse /p/Broken.vue"));
    }

    #[test]
    fn test_read_error_is_fatal() {
        let fs = MemoryFileSystem::new()
            .with_file("/p/A.vue", "")
            .with_unreadable("/p/B.vue");

        let err = scan_project(&fs, &ImportResolver::new("/p")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
        assert_eq!(err.to_string(), "/p/B.vue: no such file");
    }
}
