//! Parser module for vuedeps.
//!
//! Two steps turn a component file into dependency candidates:
//!
//! - [`script`] pulls the embedded `<script>` text out of the markup
//! - [`imports`] finds the import specifiers in that text and resolves
//!   them to file paths
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use vuedeps::parser::{extract_script, ImportResolver};
//!
//! let source = b"<script>import Nav from './Nav'</script>";
//! let script = extract_script(source).unwrap();
//!
//! let resolver = ImportResolver::new("/app");
//! let refs = resolver.resolve(Path::new("/app/Page.vue"), &script);
//! assert_eq!(refs, vec![Path::new("/app/Nav.vue").to_path_buf()]);
//! ```

pub mod imports;
pub mod script;

pub use imports::{import_specifiers, ImportResolver, SpecifierKind, DEFAULT_EXTENSION};
pub use script::{extract_script, script_blocks, ParseError, ParseResult, ScriptBlock};
