// Axum test fixture - a todo service whose router is built and served inside main
use axum::{
    extract::Path,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use tower_http::cors::CorsLayer;

/// Auth checks the bearer token. Requests without one are rejected.
async fn auth(req: Request, next: Next) -> Response {
    next.run(req).await
}

/// ListTodos returns every todo item.
async fn list_todos() -> Json<Vec<String>> {
    Json(vec![])
}

/// CreateTodo stores a new todo item.
async fn create_todo(Json(todo): Json<String>) -> Json<String> {
    Json(todo)
}

/// DeleteTodo removes a todo item.
async fn delete_todo(Path(id): Path<u64>) {}

async fn health() -> &'static str {
    "ok"
}

fn todo_routes() -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:id", delete(delete_todo))
        .route_layer(middleware::from_fn(auth))
}

#[tokio::main]
async fn main() {
    let mut app = Router::new().route("/health", get(health));
    app = app.nest("/todos", todo_routes());
    let app = app.layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
