//! Route walking abstractions shared by every route source.
//!
//! A route source implements [`Routes`] and yields one [`RouteRecord`] per registered
//! route. Each record carries the identity of the handler and of every middleware that
//! wraps it, so formatting functions can describe the route without manual annotation.
//!
//! # Implementations
//!
//! - **Route tables**: See [`crate::router::RouteTable`]
//! - **Axum source code**: See [`crate::source::axum::AxumRoutes`]
//!
//! # Example
//!
//! ```
//! use raml_docgen::walker::{Method, Routes};
//! use raml_docgen::router::RouteTable;
//! use raml_docgen::func_info;
//!
//! let mut table = RouteTable::new();
//! table.get("/ping", func_info!(ping, "Ping replies with pong."));
//!
//! for route in table.walk() {
//!     let route = route.unwrap();
//!     assert_eq!(route.method, Method::Get);
//!     assert_eq!(route.path, "/ping");
//! }
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Trait for anything that can enumerate its registered routes.
///
/// Implementations must yield every route exactly once, in a deterministic order. The
/// sequence stops after the first `Err`, which is reported as a walk-level failure.
///
/// [`RouteTable`](crate::router::RouteTable) and
/// [`AxumRoutes`](crate::source::axum::AxumRoutes) compute the whole walk up front when
/// `walk` is called: the routes collected before a failure are yielded first, then the
/// error. Consumers only see the difference in timing.
pub trait Routes {
    /// Walks all registered routes.
    fn walk(&self) -> Box<dyn Iterator<Item = Result<RouteRecord>> + '_>;
}

/// Everything a formatting function gets to know about one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// The HTTP method (or [`Method::Any`])
    pub method: Method,
    /// The full URL path pattern (e.g., "/articles/:id")
    pub path: String,
    /// Identity of the handler function
    pub handler: FuncInfo,
    /// Middleware wrapping the handler, outermost first
    pub middlewares: Vec<FuncInfo>,
}

impl RouteRecord {
    /// Create a new RouteRecord with an empty middleware chain
    pub fn new(method: Method, path: String, handler: FuncInfo) -> Self {
        Self {
            method,
            path,
            handler,
            middlewares: Vec::new(),
        }
    }
}

/// HTTP methods a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
    /// Wildcard marker matching any verb
    Any,
}

impl Method {
    /// The method token as written on the wire, `*` for the wildcard
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
            Method::Any => "*",
        }
    }

    /// The key used for this method inside a RAML resource
    pub fn raml_key(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "CONNECT" => Ok(Method::Connect),
            "TRACE" => Ok(Method::Trace),
            "*" | "ANY" => Ok(Method::Any),
            other => Err(Error::InvalidArgument(format!(
                "unknown HTTP method: {}",
                other
            ))),
        }
    }
}

/// Identity of a handler or middleware function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuncInfo {
    /// Declaring module path (e.g., "blog::handlers")
    pub pkg: String,
    /// Function name
    pub func: String,
    /// Source file the function is declared in
    pub file: String,
    /// Line of the declaration
    pub line: u32,
    /// Documentation comment attached to the declaration, or empty
    pub comment: String,
}

impl FuncInfo {
    /// Create a new FuncInfo without a comment
    pub fn new(
        pkg: impl Into<String>,
        func: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            pkg: pkg.into(),
            func: func.into(),
            file: file.into(),
            line,
            comment: String::new(),
        }
    }

    /// Attach a documentation comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Last segment of the module path ("blog::handlers" -> "handlers")
    pub fn short_pkg(&self) -> &str {
        let after_colons = self
            .pkg
            .rfind("::")
            .map(|idx| &self.pkg[idx + 2..])
            .unwrap_or(&self.pkg);
        after_colons
            .rfind('/')
            .map(|idx| &after_colons[idx + 1..])
            .unwrap_or(after_colons)
    }
}

/// Builds a [`FuncInfo`] for a function registered at the call site.
///
/// The module path, file and line of the invocation are recorded, so place the macro
/// next to the route registration. An optional second argument attaches the comment.
#[macro_export]
macro_rules! func_info {
    ($func:ident) => {
        $crate::walker::FuncInfo::new(module_path!(), stringify!($func), file!(), line!())
    };
    ($func:ident, $comment:expr) => {
        $crate::walker::FuncInfo::new(module_path!(), stringify!($func), file!(), line!())
            .with_comment($comment)
    };
}
