use raml_docgen::{
    format::{developer_docs, DeveloperDocs, RepoLinker},
    parser::AstParser,
    raml::Document,
    scanner::FileScanner,
    serializer::{serialize_json, serialize_raml},
    source::axum::AxumRoutes,
    walker::{Method, RouteRecord, Routes},
};
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn walk_project(temp_dir: &TempDir) -> (AxumRoutes, usize) {
    let root = temp_dir.path().join("blog");
    let scan_result = FileScanner::new(root.clone()).scan().expect("Failed to scan directory");
    let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(Result::ok)
        .collect();
    let count = parsed_files.len();
    (AxumRoutes::new(&root, &parsed_files), count)
}

fn chain(route: &RouteRecord) -> Vec<&str> {
    route.middlewares.iter().map(|m| m.func.as_str()).collect()
}

#[test]
fn test_blog_api_walk() {
    let temp_dir = create_test_project(vec![(
        "blog/src/main.rs",
        include_str!("fixtures/blog_api.rs"),
    )]);
    let (routes, parsed) = walk_project(&temp_dir);
    assert_eq!(parsed, 1);

    let records: Vec<RouteRecord> = routes
        .walk()
        .collect::<Result<_, _>>()
        .expect("Walk should succeed");

    let summary: Vec<(Method, &str, &str)> = records
        .iter()
        .map(|r| (r.method, r.path.as_str(), r.handler.func.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Method::Get, "/", "{closure}"),
            (Method::Get, "/ping", "{closure}"),
            (Method::Get, "/articles", "list_articles"),
            (Method::Post, "/articles", "create_article"),
            (Method::Get, "/articles/:article_id", "get_article"),
            (Method::Put, "/articles/:article_id", "update_article"),
            (Method::Delete, "/articles/:article_id", "delete_article"),
            (Method::Get, "/admin", "admin_index"),
            (Method::Get, "/admin/accounts", "admin_accounts"),
        ]
    );

    assert_eq!(chain(&records[0]), vec!["TraceLayer::new_for_http", "request_id"]);
    assert_eq!(
        chain(&records[4]),
        vec!["TraceLayer::new_for_http", "request_id", "article_ctx"]
    );
    assert_eq!(
        chain(&records[8]),
        vec!["TraceLayer::new_for_http", "request_id", "admin_only"]
    );

    let create = &records[3].handler;
    assert_eq!(create.pkg, "blog");
    assert_eq!(create.file, "src/main.rs");
    assert!(create.comment.starts_with("CreateArticle persists the posted Article."));
}

#[test]
fn test_blog_api_end_to_end_generation() {
    let temp_dir = create_test_project(vec![(
        "blog/src/main.rs",
        include_str!("fixtures/blog_api.rs"),
    )]);
    let (routes, _) = walk_project(&temp_dir);

    let mut doc = Document::new("Blog", "https://blog.example.com", "v1.0", "application/json");
    doc.add_resources_from_walk(&routes, developer_docs)
        .expect("Generation should succeed");

    let paths: Vec<&str> = doc.resources.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec![
            "/",
            "/admin",
            "/admin/accounts",
            "/articles",
            "/articles/:article_id",
            "/ping",
        ]
    );

    let create = doc.resource("/articles", Method::Post).unwrap();
    assert!(create.description.starts_with(
        "<h3>CreateArticle persists the posted Article.</h3>\n It returns the\nstored Article"
    ));
    assert!(create.responses.contains_key(&201));
    assert!(create
        .description
        .contains("[blog.**request_id**](https://src/main.rs#L"));

    let delete = doc.resource("/articles/:article_id", Method::Delete).unwrap();
    assert_eq!(delete.responses.keys().copied().collect::<Vec<_>>(), vec![204]);
    assert!(delete.description.contains("[blog.**article_ctx**]"));

    let yaml = serialize_raml(&doc).expect("Failed to serialize to RAML");
    assert!(yaml.starts_with("#%RAML 1.0\n"));
    let body: serde_yaml::Value = serde_yaml::from_str(&yaml["#%RAML 1.0\n".len()..]).unwrap();
    assert!(body["/articles/:article_id"]["put"].is_mapping());

    let json = serialize_json(&doc).expect("Failed to serialize to JSON");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["title"], "Blog");
    assert!(parsed["/admin/accounts"]["get"]["responses"]["200"].is_object());
}

#[test]
fn test_links_point_into_repository() {
    let temp_dir = create_test_project(vec![(
        "blog/src/main.rs",
        include_str!("fixtures/blog_api.rs"),
    )]);
    let (routes, _) = walk_project(&temp_dir);

    let docs = DeveloperDocs::new(
        RepoLinker::new("github.com/acme/blog/")
            .with_rewrite("github.com/acme/blog/", "https://github.com/acme/blog/blob/main/"),
    );
    let mut doc = Document::default();
    doc.add_resources_from_walk(&routes, |method, path, handler, middlewares| {
        docs.format(method, path, handler, middlewares)
    })
    .unwrap();

    let get = doc.resource("/articles", Method::Get).unwrap();
    assert!(get
        .description
        .contains("(https://github.com/acme/blog/blob/main/src/main.rs#L"));
}

#[test]
fn test_multi_file_project() {
    let temp_dir = create_test_project(vec![
        (
            "blog/src/main.rs",
            r#"
mod handlers;

fn app() -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .merge(handlers::articles::router())
}
"#,
        ),
        (
            "blog/src/handlers/mod.rs",
            r#"
pub mod articles;

/// Index greets the visitor.
pub async fn index() -> &'static str { "root." }
"#,
        ),
        (
            "blog/src/handlers/articles.rs",
            r#"
/// ListArticles returns an array of Articles.
pub async fn list() {}

pub fn router() -> Router {
    Router::new().route("/articles", get(list))
}
"#,
        ),
    ]);
    let (routes, parsed) = walk_project(&temp_dir);
    assert_eq!(parsed, 3);

    let records: Vec<RouteRecord> = routes.walk().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].handler.pkg, "blog::handlers");
    assert_eq!(records[0].handler.line, 5);
    assert_eq!(records[1].handler.pkg, "blog::handlers::articles");
    assert_eq!(records[1].handler.file, "src/handlers/articles.rs");
    assert_eq!(records[1].handler.line, 3);
}

#[test]
fn test_router_served_from_main() {
    let temp_dir = create_test_project(vec![(
        "blog/src/main.rs",
        include_str!("fixtures/todo_main.rs"),
    )]);
    let (routes, _) = walk_project(&temp_dir);

    let records: Vec<RouteRecord> = routes.walk().collect::<Result<_, _>>().unwrap();
    let summary: Vec<(Method, &str, &str)> = records
        .iter()
        .map(|r| (r.method, r.path.as_str(), r.handler.func.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Method::Get, "/health", "health"),
            (Method::Get, "/todos", "list_todos"),
            (Method::Post, "/todos", "create_todo"),
            (Method::Delete, "/todos/:id", "delete_todo"),
        ]
    );
    assert_eq!(chain(&records[0]), vec!["CorsLayer::permissive"]);
    assert_eq!(chain(&records[3]), vec!["CorsLayer::permissive", "auth"]);

    let mut doc = Document::new("Todos", "", "v1.0", "application/json");
    doc.add_resources_from_walk(&routes, developer_docs).unwrap();

    let documented: Vec<(&str, Vec<&str>)> = doc
        .resources
        .iter()
        .map(|(path, node)| (path.as_str(), node.methods.keys().map(String::as_str).collect()))
        .collect();
    assert_eq!(
        documented,
        vec![
            ("/health", vec!["get"]),
            ("/todos", vec!["get", "post"]),
            ("/todos/:id", vec!["delete"]),
        ]
    );

    let health = doc.resource("/health", Method::Get).unwrap();
    assert!(health.description.starts_with("\n\n---\n\n⇩ HTTP Request<br />\n"));
    assert!(health
        .description
        .contains("[blog.**CorsLayer::permissive**](https://src/main.rs#L44)"));
    assert!(health.responses.contains_key(&200));

    let create = doc.resource("/todos", Method::Post).unwrap();
    assert!(create
        .description
        .starts_with("<h3>CreateTodo stores a new todo item.</h3>\n"));
    assert!(create.description.contains("[blog.**auth**](https://src/main.rs#L12)"));
    assert!(create.responses.contains_key(&201));

    let delete = doc.resource("/todos/:id", Method::Delete).unwrap();
    assert_eq!(delete.responses.keys().copied().collect::<Vec<_>>(), vec![204]);
}
