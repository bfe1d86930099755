//! Route walking over Rust source code.
//!
//! Handler identity is recovered from the source text: every free function is indexed
//! with its module path, file, line and doc comment, and framework-specific walkers
//! (see [`axum::AxumRoutes`]) resolve the handlers and middleware they find against it.
//!
//! # Example
//!
//! ```no_run
//! use raml_docgen::{
//!     format::developer_docs,
//!     parser::AstParser,
//!     raml::Document,
//!     scanner::FileScanner,
//!     source::axum::AxumRoutes,
//! };
//! use std::path::PathBuf;
//!
//! let root = PathBuf::from("./my-project");
//! let scan_result = FileScanner::new(root.clone()).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let routes = AxumRoutes::new(&root, &parsed_files);
//! let mut doc = Document::new("Blog", "https://blog.example.com", "v1", "application/json");
//! doc.add_resources_from_walk(&routes, developer_docs).unwrap();
//! ```

pub mod axum;

use crate::parser::ParsedFile;
use crate::walker::FuncInfo;
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use syn::visit::Visit;
use syn::{Attribute, Expr, ExprCall, Lit, Meta};

/// A free function found in the project
#[derive(Debug, Clone)]
pub struct FnEntry {
    pub info: FuncInfo,
    pub body: syn::Block,
    /// Whether the body constructs a router with `Router::new()`
    pub builds_router: bool,
}

impl FnEntry {
    /// Unique key: module path and function name
    pub fn key(&self) -> String {
        format!("{}::{}", self.info.pkg, self.info.func)
    }
}

/// Every free function of a project, looked up by name
#[derive(Debug, Default)]
pub struct FnIndex {
    entries: Vec<FnEntry>,
    by_name: HashMap<String, Vec<usize>>,
}

impl FnIndex {
    /// Index the functions of `files`; file paths are recorded relative to `root`
    pub fn build(root: &Path, files: &[ParsedFile]) -> Self {
        let mut index = FnIndex::default();
        for file in files {
            let relative = file.path.strip_prefix(root).unwrap_or(&file.path);
            let mut collector = FnCollector {
                file: relative.to_string_lossy().replace('\\', "/"),
                modules: vec![file.module_path.clone()],
                found: Vec::new(),
            };
            collector.visit_file(&file.syntax_tree);
            for entry in collector.found {
                index.insert(entry);
            }
        }
        debug!("Indexed {} functions", index.entries.len());
        index
    }

    fn insert(&mut self, entry: FnEntry) {
        self.by_name
            .entry(entry.info.func.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    /// All functions in file and declaration order
    pub fn entries(&self) -> &[FnEntry] {
        &self.entries
    }

    /// Resolve a (possibly qualified) function path used from `from_module`.
    ///
    /// Candidates share the last segment's name. A qualifier like `admin::router` picks the
    /// candidate whose module ends with `admin`; otherwise a candidate in `from_module`
    /// wins, then the first one declared.
    pub fn resolve(&self, segments: &[String], from_module: &str) -> Option<&FnEntry> {
        let (name, qualifier) = segments.split_last()?;
        let candidates: Vec<&FnEntry> = self
            .by_name
            .get(name)?
            .iter()
            .map(|&idx| &self.entries[idx])
            .collect();

        let qualifier: Vec<&str> = qualifier
            .iter()
            .map(String::as_str)
            .filter(|s| !matches!(*s, "crate" | "self" | "super"))
            .collect();

        if !qualifier.is_empty() {
            let suffix = qualifier.join("::");
            if let Some(entry) = candidates.iter().find(|e| {
                e.info.pkg == suffix || e.info.pkg.ends_with(&format!("::{}", suffix))
            }) {
                return Some(*entry);
            }
        }

        candidates
            .iter()
            .find(|e| e.info.pkg == from_module)
            .or_else(|| candidates.first())
            .copied()
    }
}

struct FnCollector {
    file: String,
    /// Module path stack; inline `mod` blocks push onto it
    modules: Vec<String>,
    found: Vec<FnEntry>,
}

impl<'ast> Visit<'ast> for FnCollector {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if node.content.is_none() {
            return;
        }
        let parent = self.modules.last().cloned().unwrap_or_default();
        self.modules.push(format!("{}::{}", parent, node.ident));
        syn::visit::visit_item_mod(self, node);
        self.modules.pop();
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        let info = FuncInfo::new(
            self.modules.last().cloned().unwrap_or_default(),
            node.sig.ident.to_string(),
            self.file.clone(),
            line_of(node.sig.ident.span()),
        )
        .with_comment(doc_comment(&node.attrs));

        let mut finder = RouterNewFinder::default();
        finder.visit_block(&node.block);

        debug!("Found function: {}::{}", info.pkg, info.func);
        self.found.push(FnEntry {
            info,
            body: (*node.block).clone(),
            builds_router: finder.found,
        });

        syn::visit::visit_item_fn(self, node);
    }
}

/// Looks for `Router::new()` or `Router::default()`
#[derive(Default)]
struct RouterNewFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for RouterNewFinder {
    fn visit_expr_call(&mut self, node: &'ast ExprCall) {
        if is_router_constructor(node) {
            self.found = true;
        }
        syn::visit::visit_expr_call(self, node);
    }
}

/// Whether `call` is `Router::new()` / `Router::default()` (with any qualifier)
pub(crate) fn is_router_constructor(call: &ExprCall) -> bool {
    let segments = match call_path(call) {
        Some(segments) => segments,
        None => return false,
    };
    let n = segments.len();
    n >= 2 && segments[n - 2] == "Router" && matches!(segments[n - 1].as_str(), "new" | "default")
}

/// Path segments of a call's function, if it is called by path
pub(crate) fn call_path(call: &ExprCall) -> Option<Vec<String>> {
    match &*call.func {
        Expr::Path(path) => Some(path_segments(&path.path)),
        _ => None,
    }
}

pub(crate) fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

pub(crate) fn line_of(span: proc_macro2::Span) -> u32 {
    span.start().line as u32
}

/// Text of `///` comments (`#[doc = "..."]` attributes), one line per attribute
pub fn doc_comment(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').unwrap_or(&line).trim_end().to_string())
        .collect();

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse_code(path: &str, code: &str) -> ParsedFile {
        let syntax_tree = syn::parse_file(code).expect("Failed to parse test code");
        ParsedFile::new(PathBuf::from(path), syntax_tree)
    }

    fn names(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_index_records_identity() {
        let code = r#"
use axum::Router;

/// ListArticles returns an array of Articles.
///
/// Results are paginated.
pub async fn list_articles() -> &'static str {
    "[]"
}

pub fn app() -> Router {
    Router::new()
}
"#;
        let parsed = parse_code("/work/blog/src/handlers.rs", code);
        let index = FnIndex::build(Path::new("/work/blog"), &[parsed]);

        assert_eq!(index.entries().len(), 2);

        let list = &index.entries()[0];
        assert_eq!(list.info.pkg, "blog::handlers");
        assert_eq!(list.info.func, "list_articles");
        assert_eq!(list.info.file, "src/handlers.rs");
        assert_eq!(list.info.line, 7);
        assert_eq!(
            list.info.comment,
            "ListArticles returns an array of Articles.\n\nResults are paginated."
        );
        assert!(!list.builds_router);

        let app = &index.entries()[1];
        assert!(app.builds_router);
        assert_eq!(app.info.comment, "");
        assert_eq!(app.key(), "blog::handlers::app");
    }

    #[test]
    fn test_inline_modules_extend_module_path() {
        let code = r#"
mod admin {
    pub fn router() {}
}
fn router() {}
"#;
        let parsed = parse_code("blog/src/main.rs", code);
        let index = FnIndex::build(Path::new("blog"), &[parsed]);

        let pkgs: Vec<_> = index.entries().iter().map(|e| e.info.pkg.as_str()).collect();
        assert_eq!(pkgs, vec!["blog::admin", "blog"]);
    }

    #[test]
    fn test_resolve_prefers_qualifier_then_local_module() {
        let admin = parse_code("blog/src/admin.rs", "pub fn router() {}");
        let articles = parse_code("blog/src/articles.rs", "pub fn router() {}");
        let index = FnIndex::build(Path::new("blog"), &[admin, articles]);

        let entry = index.resolve(&names(&["articles", "router"]), "blog").unwrap();
        assert_eq!(entry.info.pkg, "blog::articles");

        let entry = index.resolve(&names(&["crate", "admin", "router"]), "blog").unwrap();
        assert_eq!(entry.info.pkg, "blog::admin");

        let entry = index.resolve(&names(&["router"]), "blog::articles").unwrap();
        assert_eq!(entry.info.pkg, "blog::articles");

        let entry = index.resolve(&names(&["router"]), "blog").unwrap();
        assert_eq!(entry.info.pkg, "blog::admin");

        assert!(index.resolve(&names(&["missing"]), "blog").is_none());
    }
}
