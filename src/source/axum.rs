use crate::error::{Error, Result};
use crate::parser::ParsedFile;
use crate::router::combine_paths;
use crate::source::{call_path, is_router_constructor, line_of, path_segments, FnEntry, FnIndex};
use crate::walker::{FuncInfo, Method, RouteRecord, Routes};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::Path;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Expr, ExprMethodCall, Lit, Pat, Stmt};

/// Routes of the axum routers defined in a project's source code.
///
/// Routers are found by evaluating the bodies of functions that call `Router::new()`.
/// Supported builder calls are `route`, `nest`, `merge`, `layer` and `route_layer`;
/// method routers may chain `get(h).post(h2)` and their own `layer`s. Routers built in
/// other functions or bound to local variables are followed.
pub struct AxumRoutes {
    index: FnIndex,
    entry: Option<String>,
}

impl AxumRoutes {
    /// Walk every root router of `files`; paths are reported relative to `root`
    pub fn new(root: &Path, files: &[ParsedFile]) -> Self {
        Self {
            index: FnIndex::build(root, files),
            entry: None,
        }
    }

    /// Only walk the router returned by the function named `name`
    pub fn with_entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Functions building routers that no other router nests, merges or calls
    fn roots(&self) -> Result<Vec<&FnEntry>> {
        let mut referenced = HashSet::new();
        for entry in self.index.entries().iter().filter(|e| e.builds_router) {
            let mut evaluator = Evaluator::new(&self.index);
            evaluator.eval_fn(entry)?;
            referenced.extend(evaluator.referenced);
        }

        let roots: Vec<&FnEntry> = self
            .index
            .entries()
            .iter()
            .filter(|e| e.builds_router && !referenced.contains(&e.key()))
            .collect();
        debug!(
            "Root routers: {:?}",
            roots.iter().map(|e| e.key()).collect::<Vec<_>>()
        );
        Ok(roots)
    }

    fn collect(&self, out: &mut Vec<RouteRecord>) -> Result<()> {
        let roots = match &self.entry {
            Some(name) => {
                let segments: Vec<String> = name.split("::").map(str::to_string).collect();
                let entry = self.index.resolve(&segments, "").ok_or_else(|| {
                    Error::InvalidArgument(format!("router function not found: {}", name))
                })?;
                vec![entry]
            }
            None => self.roots()?,
        };

        for root in roots {
            let mut evaluator = Evaluator::new(&self.index);
            out.extend(evaluator.eval_fn(root)?);
        }
        Ok(())
    }
}

impl Routes for AxumRoutes {
    fn walk(&self) -> Box<dyn Iterator<Item = Result<RouteRecord>> + '_> {
        let mut routes = Vec::new();
        let failure = self.collect(&mut routes).err().map(Err);
        Box::new(routes.into_iter().map(Ok).chain(failure))
    }
}

/// Where an expression is being evaluated
struct Scope<'a> {
    entry: &'a FnEntry,
    /// `let` bindings of the function body, in order
    locals: Vec<(String, &'a Expr)>,
}

impl Scope<'_> {
    fn module(&self) -> &str {
        &self.entry.info.pkg
    }

    /// Index of the local `path` names, looking only at the first `visible` bindings
    fn binding(&self, path: &syn::ExprPath, visible: usize) -> Option<usize> {
        let ident = path.path.get_ident()?;
        self.locals[..visible]
            .iter()
            .rposition(|(name, _)| ident == name)
    }
}

/// Single-identifier paths read by an expression
#[derive(Default)]
struct LocalReads<'ast> {
    paths: Vec<&'ast syn::ExprPath>,
}

impl<'ast> Visit<'ast> for LocalReads<'ast> {
    fn visit_expr_path(&mut self, node: &'ast syn::ExprPath) {
        if node.path.get_ident().is_some() {
            self.paths.push(node);
        }
    }
}

/// Evaluates router expressions into the routes they register
struct Evaluator<'a> {
    index: &'a FnIndex,
    /// Functions currently being evaluated, to catch routers that nest themselves
    stack: Vec<String>,
    /// Functions reached through a call, nest or merge
    referenced: HashSet<String>,
}

impl<'a> Evaluator<'a> {
    fn new(index: &'a FnIndex) -> Self {
        Self {
            index,
            stack: Vec::new(),
            referenced: HashSet::new(),
        }
    }

    fn eval_fn(&mut self, entry: &'a FnEntry) -> Result<Vec<RouteRecord>> {
        let key = entry.key();
        if self.stack.contains(&key) {
            return Err(Error::Walk(format!("router `{}` nests itself", key)));
        }
        self.stack.push(key);

        let mut scope = Scope {
            entry,
            locals: Vec::new(),
        };
        let mut tail = None;
        for stmt in &entry.body.stmts {
            match stmt {
                Stmt::Local(local) => {
                    if let (Some(name), Some(init)) = (binding_name(&local.pat), &local.init) {
                        scope.locals.push((name, &*init.expr));
                    }
                }
                Stmt::Expr(Expr::Return(ret), _) => {
                    tail = ret.expr.as_deref();
                    break;
                }
                // `app = app.route(..)` reads the previous binding, like a shadowing `let`
                Stmt::Expr(Expr::Assign(assign), Some(_)) => {
                    if let Expr::Path(left) = &*assign.left {
                        if let Some(ident) = left.path.get_ident() {
                            scope.locals.push((ident.to_string(), &*assign.right));
                        }
                    }
                }
                Stmt::Expr(expr, None) => tail = Some(expr),
                _ => {}
            }
        }

        let visible = scope.locals.len();
        let routes = match tail {
            Some(expr) if self.is_router(expr, &scope, visible) => {
                self.eval_expr(expr, &scope, visible)?
            }
            _ => {
                let mut routes = Vec::new();
                for idx in self.unconsumed_routers(&scope) {
                    routes.extend(self.eval_expr(scope.locals[idx].1, &scope, idx)?);
                }
                routes
            }
        };

        self.stack.pop();
        Ok(routes)
    }

    /// Routes registered by `expr`; only the first `visible` locals are in scope
    fn eval_expr(&mut self, expr: &'a Expr, scope: &Scope<'a>, visible: usize) -> Result<Vec<RouteRecord>> {
        match expr {
            Expr::MethodCall(call) => self.eval_method_call(call, scope, visible),
            Expr::Call(call) => {
                if is_router_constructor(call) {
                    return Ok(Vec::new());
                }
                let Some(segments) = call_path(call) else {
                    return Ok(Vec::new());
                };
                match self.index.resolve(&segments, scope.module()) {
                    Some(entry) => {
                        self.referenced.insert(entry.key());
                        self.eval_fn(entry)
                    }
                    None => {
                        debug!("Ignoring call to unknown function {}", segments.join("::"));
                        Ok(Vec::new())
                    }
                }
            }
            Expr::Path(path) => match scope.binding(path, visible) {
                Some(idx) => self.eval_expr(scope.locals[idx].1, scope, idx),
                None => Ok(Vec::new()),
            },
            Expr::Paren(paren) => self.eval_expr(&paren.expr, scope, visible),
            Expr::Group(group) => self.eval_expr(&group.expr, scope, visible),
            _ => Ok(Vec::new()),
        }
    }

    /// Whether `expr` evaluates to a router: a `Router::new()` chain, a call to a
    /// router-building function or a local bound to one
    fn is_router(&self, expr: &Expr, scope: &Scope<'a>, visible: usize) -> bool {
        match expr {
            Expr::MethodCall(call) => self.is_router(&call.receiver, scope, visible),
            Expr::Call(call) => {
                is_router_constructor(call)
                    || call_path(call)
                        .and_then(|segments| self.index.resolve(&segments, scope.module()))
                        .is_some_and(|entry| entry.builds_router)
            }
            Expr::Path(path) => match scope.binding(path, visible) {
                Some(idx) => self.is_router(scope.locals[idx].1, scope, idx),
                None => false,
            },
            Expr::Paren(paren) => self.is_router(&paren.expr, scope, visible),
            Expr::Group(group) => self.is_router(&group.expr, scope, visible),
            _ => false,
        }
    }

    /// Router-valued locals that no later router-valued local reads, in binding order
    fn unconsumed_routers(&self, scope: &Scope<'a>) -> Vec<usize> {
        let routers: Vec<usize> = (0..scope.locals.len())
            .filter(|&idx| self.is_router(scope.locals[idx].1, scope, idx))
            .collect();

        let mut consumed = HashSet::new();
        for &idx in &routers {
            let mut reads = LocalReads::default();
            reads.visit_expr(scope.locals[idx].1);
            consumed.extend(reads.paths.into_iter().filter_map(|path| scope.binding(path, idx)));
        }

        routers
            .into_iter()
            .filter(|idx| !consumed.contains(idx))
            .collect()
    }

    fn eval_method_call(
        &mut self,
        call: &'a ExprMethodCall,
        scope: &Scope<'a>,
        visible: usize,
    ) -> Result<Vec<RouteRecord>> {
        let mut routes = self.eval_expr(&call.receiver, scope, visible)?;
        let args: Vec<&'a Expr> = call.args.iter().collect();

        match call.method.to_string().as_str() {
            "route" if args.len() == 2 => match string_literal(args[0]) {
                Some(path) => routes.extend(self.method_router(&path, args[1], scope)),
                None => warn!(
                    "Skipping .route() with a non-literal path in {}",
                    scope.entry.key()
                ),
            },
            "nest" if args.len() == 2 => match string_literal(args[0]) {
                Some(prefix) => {
                    for mut route in self.eval_expr(args[1], scope, visible)? {
                        route.path = combine_paths(&prefix, &route.path);
                        routes.push(route);
                    }
                }
                None => warn!(
                    "Skipping .nest() with a non-literal prefix in {}",
                    scope.entry.key()
                ),
            },
            "merge" if args.len() == 1 => {
                routes.extend(self.eval_expr(args[0], scope, visible)?);
            }
            "layer" | "route_layer" if args.len() == 1 => {
                let middleware = self.middleware_info(args[0], scope);
                for route in &mut routes {
                    route.middlewares.insert(0, middleware.clone());
                }
            }
            other => debug!("Ignoring router call .{}()", other),
        }
        Ok(routes)
    }

    /// Routes of a method router like `get(list).post(create).layer(auth)`
    fn method_router(&self, path: &str, expr: &'a Expr, scope: &Scope<'a>) -> Vec<RouteRecord> {
        match expr {
            Expr::Call(call) => {
                let segments = call_path(call).unwrap_or_default();
                let method = segments.last().and_then(|name| method_for(name));
                match (method, call.args.first()) {
                    (Some(method), Some(handler)) => {
                        vec![RouteRecord::new(method, path.to_string(), self.handler_info(handler, scope))]
                    }
                    _ => Vec::new(),
                }
            }
            Expr::MethodCall(call) => {
                let mut routes = self.method_router(path, &call.receiver, scope);
                let name = call.method.to_string();
                if let (Some(method), Some(handler)) = (method_for(&name), call.args.first()) {
                    routes.push(RouteRecord::new(method, path.to_string(), self.handler_info(handler, scope)));
                } else if matches!(name.as_str(), "layer" | "route_layer") {
                    if let Some(layer) = call.args.first() {
                        let middleware = self.middleware_info(layer, scope);
                        for route in &mut routes {
                            route.middlewares.insert(0, middleware.clone());
                        }
                    }
                }
                routes
            }
            Expr::Paren(paren) => self.method_router(path, &paren.expr, scope),
            _ => Vec::new(),
        }
    }

    /// Identity of a handler expression
    fn handler_info(&self, expr: &Expr, scope: &Scope<'a>) -> FuncInfo {
        match expr {
            Expr::Path(path) => {
                let segments = path_segments(&path.path);
                match self.index.resolve(&segments, scope.module()) {
                    Some(entry) => entry.info.clone(),
                    None => {
                        let name = segments.last().cloned().unwrap_or_default();
                        warn!("Unknown handler: {}", segments.join("::"));
                        FuncInfo::new(scope.module(), name, scope.entry.info.file.clone(), 0)
                    }
                }
            }
            Expr::Closure(_) | Expr::Async(_) => FuncInfo::new(
                scope.module(),
                "{closure}",
                scope.entry.info.file.clone(),
                line_of(expr.span()),
            ),
            _ => FuncInfo::new(
                scope.module(),
                "{unknown}",
                scope.entry.info.file.clone(),
                line_of(expr.span()),
            ),
        }
    }

    /// Identity of a layer: the wrapped function for `from_fn` middleware, otherwise the
    /// constructor path at the call site
    fn middleware_info(&self, expr: &Expr, scope: &Scope<'a>) -> FuncInfo {
        if let Expr::Call(call) = expr {
            let segments = call_path(call).unwrap_or_default();
            let func_arg = match segments.last().map(String::as_str) {
                Some("from_fn") => call.args.first(),
                Some("from_fn_with_state") => call.args.iter().nth(1),
                _ => None,
            };
            if let Some(func) = func_arg {
                return self.handler_info(func, scope);
            }
        }

        let name = constructor_path(expr).unwrap_or_else(|| "{layer}".to_string());
        FuncInfo::new(
            scope.module(),
            name,
            scope.entry.info.file.clone(),
            line_of(expr.span()),
        )
    }
}

/// Path of the call a layer expression starts from (`TraceLayer::new_for_http()` in
/// `TraceLayer::new_for_http().on_request(..)`)
fn constructor_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Call(call) => call_path(call).map(|segments| segments.join("::")),
        Expr::MethodCall(call) => constructor_path(&call.receiver),
        Expr::Path(path) => Some(path_segments(&path.path).join("::")),
        Expr::Paren(paren) => constructor_path(&paren.expr),
        _ => None,
    }
}

fn method_for(name: &str) -> Option<Method> {
    match name {
        "get" => Some(Method::Get),
        "post" => Some(Method::Post),
        "put" => Some(Method::Put),
        "patch" => Some(Method::Patch),
        "delete" => Some(Method::Delete),
        "head" => Some(Method::Head),
        "options" => Some(Method::Options),
        "trace" => Some(Method::Trace),
        "connect" => Some(Method::Connect),
        "any" => Some(Method::Any),
        _ => None,
    }
}

fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.ident.to_string()),
        Pat::Type(typed) => binding_name(&typed.pat),
        _ => None,
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Some(lit_str.value()),
            _ => None,
        },
        _ => None,
    }
}
