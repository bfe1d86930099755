//! Default formatting function: developer-facing docs derived from route metadata.
//!
//! [`DeveloperDocs`] turns a handler's doc comment into a heading and body, appends a
//! diagram of the middleware call chain with links to each function's source, and
//! assigns the default expected response for the method.

use crate::error::Result;
use crate::raml::{Resource, Response};
use crate::walker::{FuncInfo, Method};
use log::debug;

/// Shown instead of the call-chain diagram when a route has no middleware
pub const EMPTY_CHAIN_PLACEHOLDER: &str = "TODO";

const REQUEST_HEADER: &str = "\n\n---\n\n⇩ HTTP Request<br />\n";

/// Produces a URL pointing at a line of a source file.
pub trait SourceLinker {
    fn link(&self, file: &str, line: u32) -> String;
}

impl<F> SourceLinker for F
where
    F: Fn(&str, u32) -> String,
{
    fn link(&self, file: &str, line: u32) -> String {
        self(file, line)
    }
}

/// Links of the form `{prefix}{file}#L{line}`, with one optional substring rewrite.
///
/// The rewrite replaces the first occurrence of `from` with `to`, which turns a
/// repository path into its browsable equivalent:
///
/// ```
/// use raml_docgen::format::{RepoLinker, SourceLinker};
///
/// let linker = RepoLinker::default()
///     .with_rewrite("github.com/acme/api/", "github.com/acme/api/blob/master/");
/// assert_eq!(
///     linker.link("github.com/acme/api/handlers.rs", 12),
///     "https://github.com/acme/api/blob/master/handlers.rs#L12"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLinker {
    prefix: String,
    rewrite: Option<(String, String)>,
}

impl Default for RepoLinker {
    fn default() -> Self {
        Self::new("https://")
    }
}

impl RepoLinker {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            rewrite: None,
        }
    }

    pub fn with_rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rewrite = Some((from.into(), to.into()));
        self
    }
}

impl SourceLinker for RepoLinker {
    fn link(&self, file: &str, line: u32) -> String {
        let url = format!("{}{}#L{}", self.prefix, file, line);
        match &self.rewrite {
            Some((from, to)) => url.replacen(from.as_str(), to, 1),
            None => url,
        }
    }
}

/// Generator of developer documentation for each route.
pub struct DeveloperDocs<L = RepoLinker> {
    linker: L,
    middleware: bool,
}

impl Default for DeveloperDocs<RepoLinker> {
    fn default() -> Self {
        Self::new(RepoLinker::default())
    }
}

impl<L: SourceLinker> DeveloperDocs<L> {
    pub fn new(linker: L) -> Self {
        Self {
            linker,
            middleware: true,
        }
    }

    /// Leave the "HTTP Request" call-chain section out of every description
    pub fn without_middleware(mut self) -> Self {
        self.middleware = false;
        self
    }

    /// Describe one route; wildcard routes are left undocumented.
    ///
    /// The signature matches what [`crate::raml::Document::add_resources_from_walk`]
    /// expects, so a closure forwarding to this method can be passed straight to it.
    pub fn format(
        &self,
        method: Method,
        path: &str,
        handler: &FuncInfo,
        middlewares: &[FuncInfo],
    ) -> Result<Option<Resource>> {
        if method == Method::Any {
            debug!("Not documenting wildcard route {}", path);
            return Ok(None);
        }

        let mut description = comment_sections(&handler.comment);
        if self.middleware {
            description.push_str(REQUEST_HEADER);
            description.push_str(&self.call_chain(handler, middlewares));
        }

        let mut resource = Resource::new(description);
        if let Some(status) = default_status(method) {
            resource.responses.insert(status, Response::default());
        }
        Ok(Some(resource))
    }

    /// Nested enter/exit diagram of the middleware chain around the handler
    fn call_chain(&self, handler: &FuncInfo, middlewares: &[FuncInfo]) -> String {
        if middlewares.is_empty() {
            return EMPTY_CHAIN_PLACEHOLDER.to_string();
        }

        let depth = middlewares.len();
        let mut out = String::new();
        for (i, mw) in middlewares.iter().enumerate() {
            out.push_str(&format!("{}↳ {}<br />\n", indent(i + 1), self.func_link(mw)));
        }
        out.push_str(&format!("{}↳<br />\n", indent(depth + 1)));
        out.push_str(&format!("{}{}<br />\n", indent(depth + 2), self.func_link(handler)));
        out.push_str(&format!("{}↵<br />\n", indent(depth + 1)));
        for (i, mw) in middlewares.iter().enumerate().rev() {
            out.push_str(&format!("{}↵ {}<br />\n", indent(i + 1), self.func_link(mw)));
        }
        out
    }

    fn func_link(&self, info: &FuncInfo) -> String {
        format!(
            "[{}.**{}**]({})",
            info.short_pkg(),
            info.func,
            self.linker.link(&info.file, info.line)
        )
    }
}

/// [`DeveloperDocs`] with the stock linker, usable directly as a formatting function
pub fn developer_docs(
    method: Method,
    path: &str,
    handler: &FuncInfo,
    middlewares: &[FuncInfo],
) -> Result<Option<Resource>> {
    DeveloperDocs::<RepoLinker>::default().format(method, path, handler, middlewares)
}

/// Expected status code documented by default for a method
pub fn default_status(method: Method) -> Option<u16> {
    match method {
        Method::Post => Some(201),
        Method::Get | Method::Put => Some(200),
        Method::Delete => Some(204),
        _ => None,
    }
}

/// First sentence as a heading, the rest as body text
fn comment_sections(comment: &str) -> String {
    if comment.is_empty() {
        return String::new();
    }

    let (heading, body) = match comment.find('.') {
        Some(idx) => comment.split_at(idx + 1),
        None => (comment, ""),
    };

    let mut out = format!("<h3>{}</h3>\n", heading);
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out
}

fn indent(level: usize) -> String {
    "&nbsp;".repeat(2 * level)
}
