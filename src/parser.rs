use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Parser turning Rust source files into `syn` syntax trees.
///
/// # Example
///
/// ```no_run
/// use raml_docgen::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
/// println!("{} has {} items", parsed.module_path, parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Module path the file declares (e.g., "blog::handlers::articles")
    pub module_path: String,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl ParsedFile {
    /// Wrap already parsed source, deriving the module path from `path`
    pub fn new(path: PathBuf, syntax_tree: syn::File) -> Self {
        let module_path = module_path_for(&path);
        Self {
            path,
            module_path,
            syntax_tree,
        }
    }
}

impl AstParser {
    /// Parses a single Rust source file.
    ///
    /// Line numbers of the returned tree refer to the file content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Rust syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        Ok(ParsedFile::new(path.to_path_buf(), syntax_tree))
    }

    /// Parses multiple files, continuing past the ones that fail.
    ///
    /// Failures are logged as warnings and returned in place.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).map_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// Derive the module path a source file declares from its location.
///
/// The crate name is the directory holding `src/` (with `-` turned into `_`); the
/// components below `src/` become modules, with `main.rs`, `lib.rs` and `mod.rs`
/// naming their parent. Files outside a `src/` directory are named by their stem.
pub fn module_path_for(path: &Path) -> String {
    let components: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let Some(src_idx) = components.iter().rposition(|c| c == "src") else {
        return path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    };

    let crate_name = src_idx
        .checked_sub(1)
        .map(|idx| components[idx].replace('-', "_"))
        .unwrap_or_else(|| "crate".to_string());

    let mut segments = vec![crate_name];
    let below = &components[src_idx + 1..];
    for (idx, component) in below.iter().enumerate() {
        let is_file = idx == below.len() - 1;
        let name = if is_file {
            component.strip_suffix(".rs").unwrap_or(component)
        } else {
            component.as_str()
        };
        if is_file && matches!(name, "main" | "lib" | "mod") {
            continue;
        }
        segments.push(name.to_string());
    }

    segments.join("::")
}
