//! Route table with explicit handler identities.
//!
//! Rust cannot look up a function's module, source location or doc comment at runtime,
//! so every handler and middleware is registered together with its [`FuncInfo`],
//! usually built with [`func_info!`](crate::func_info) at the registration site.
//!
//! # Example
//!
//! ```
//! use raml_docgen::func_info;
//! use raml_docgen::router::RouteTable;
//! use raml_docgen::walker::Routes;
//!
//! let mut r = RouteTable::new();
//! r.use_middleware(func_info!(request_id));
//! r.get("/", func_info!(index));
//! r.route("/articles", |r| {
//!     r.with([func_info!(paginate)]).get("/", func_info!(list_articles));
//!     r.post("/", func_info!(create_article));
//! });
//!
//! let paths: Vec<String> = r.walk().map(|route| route.unwrap().path).collect();
//! assert_eq!(paths, vec!["/", "/articles", "/articles"]);
//! ```

use crate::error::{Error, Result};
use crate::walker::{FuncInfo, Method, RouteRecord, Routes};
use log::debug;

/// A tree of routes, each registered with the identity of its handler.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Middleware applied to every route of this table
    middlewares: Vec<FuncInfo>,
    /// Routes and sub-tables in registration order
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
enum Entry {
    Route {
        method: Method,
        pattern: String,
        handler: FuncInfo,
        /// Inline middleware added with [`RouteTable::with`]
        middlewares: Vec<FuncInfo>,
    },
    Mount {
        pattern: String,
        table: RouteTable,
    },
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap every route of this table (and its sub-tables) in `middleware`
    pub fn use_middleware(&mut self, middleware: FuncInfo) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Register routes wrapped in additional inline middleware
    pub fn with(&mut self, middlewares: impl IntoIterator<Item = FuncInfo>) -> Inline<'_> {
        Inline {
            table: self,
            middlewares: middlewares.into_iter().collect(),
        }
    }

    /// Register `handler` for `method` on `pattern`
    pub fn method(&mut self, method: Method, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.push_route(method, pattern, handler, Vec::new())
    }

    pub fn get(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Get, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Post, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Put, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Patch, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Delete, pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Head, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Options, pattern, handler)
    }

    /// Register `handler` for every method
    pub fn handle(&mut self, pattern: &str, handler: FuncInfo) -> &mut Self {
        self.method(Method::Any, pattern, handler)
    }

    /// Build a sub-table in place and mount it under `pattern`
    pub fn route(&mut self, pattern: &str, build: impl FnOnce(&mut RouteTable)) -> &mut Self {
        let mut table = RouteTable::new();
        build(&mut table);
        self.mount(pattern, table)
    }

    /// Mount a separately built table under `pattern`
    pub fn mount(&mut self, pattern: &str, table: RouteTable) -> &mut Self {
        self.entries.push(Entry::Mount {
            pattern: pattern.to_string(),
            table,
        });
        self
    }

    fn push_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: FuncInfo,
        middlewares: Vec<FuncInfo>,
    ) -> &mut Self {
        self.entries.push(Entry::Route {
            method,
            pattern: pattern.to_string(),
            handler,
            middlewares,
        });
        self
    }

    /// Append every route below this table to `out`, stopping at the first bad pattern
    fn collect(&self, prefix: &str, chain: &[FuncInfo], out: &mut Vec<RouteRecord>) -> Result<()> {
        let mut chain = chain.to_vec();
        chain.extend(self.middlewares.iter().cloned());

        for entry in &self.entries {
            match entry {
                Entry::Route {
                    method,
                    pattern,
                    handler,
                    middlewares,
                } => {
                    check_pattern(pattern)?;
                    let mut record =
                        RouteRecord::new(*method, combine_paths(prefix, pattern), handler.clone());
                    record.middlewares = chain.clone();
                    record.middlewares.extend(middlewares.iter().cloned());
                    debug!("Walked route: {} {}", record.method, record.path);
                    out.push(record);
                }
                Entry::Mount { pattern, table } => {
                    check_pattern(pattern)?;
                    table.collect(&combine_paths(prefix, pattern), &chain, out)?;
                }
            }
        }
        Ok(())
    }
}

impl Routes for RouteTable {
    fn walk(&self) -> Box<dyn Iterator<Item = Result<RouteRecord>> + '_> {
        let mut routes = Vec::new();
        let failure = self.collect("", &[], &mut routes).err().map(Err);
        Box::new(routes.into_iter().map(Ok).chain(failure))
    }
}

/// Routes registered through [`RouteTable::with`]
pub struct Inline<'a> {
    table: &'a mut RouteTable,
    middlewares: Vec<FuncInfo>,
}

impl Inline<'_> {
    pub fn method(self, method: Method, pattern: &str, handler: FuncInfo) -> Self {
        self.table
            .push_route(method, pattern, handler, self.middlewares.clone());
        self
    }

    pub fn get(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Put, pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Patch, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Delete, pattern, handler)
    }

    pub fn head(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Head, pattern, handler)
    }

    pub fn options(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Options, pattern, handler)
    }

    /// Register `handler` for every method
    pub fn handle(self, pattern: &str, handler: FuncInfo) -> Self {
        self.method(Method::Any, pattern, handler)
    }
}

fn check_pattern(pattern: &str) -> Result<()> {
    if pattern.starts_with('/') {
        Ok(())
    } else {
        Err(Error::Walk(format!(
            "routing pattern must begin with '/': {:?}",
            pattern
        )))
    }
}

/// Combine a prefix and path, collapsing a trailing "/" route into its prefix
pub(crate) fn combine_paths(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }

    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }
    } else {
        format!("{}/{}", prefix, path)
    }
}
