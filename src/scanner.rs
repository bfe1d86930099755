use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directories that never hold router code worth documenting
const SKIPPED_DIRS: &[&str] = &["target", "tests", "benches", "examples"];

/// File scanner collecting the Rust sources of a project.
///
/// Files are returned in a stable order (directory entries sorted by name) so that route
/// walks over the same project always visit routers in the same order. Build output,
/// hidden directories and test/bench/example trees are skipped.
///
/// # Example
///
/// ```no_run
/// use raml_docgen::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// Paths of all discovered `.rs` files, sorted
    pub rust_files: Vec<PathBuf>,
    /// Warning messages for entries that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Unreadable entries are logged and reported in [`ScanResult::warnings`]; scanning
    /// continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!("Not a directory: {}", self.root_path.display());
        }

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some("rs")
                    {
                        debug!("Found Rust file: {}", path.display());
                        rust_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}
