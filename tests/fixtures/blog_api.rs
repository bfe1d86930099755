// Axum test fixture - a blog API with an articles resource and an admin router
use axum::{
    extract::{Path, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
}

/// RequestId tags every request with a unique identifier.
async fn request_id(req: Request, next: Next) -> Response {
    next.run(req).await
}

/// ArticleCtx loads the Article named in the URL. In case
/// the Article could not be found, we stop here and return a 404.
async fn article_ctx(Path(id): Path<String>, req: Request, next: Next) -> Response {
    next.run(req).await
}

/// AdminOnly restricts access to administrators.
async fn admin_only(req: Request, next: Next) -> Response {
    next.run(req).await
}

/// ListArticles returns an array of Articles.
async fn list_articles() -> Json<Vec<Article>> {
    Json(vec![])
}

/// CreateArticle persists the posted Article. It returns the
/// stored Article back to the client as an acknowledgement.
async fn create_article(Json(article): Json<Article>) -> Json<Article> {
    Json(article)
}

/// GetArticle returns the specific Article.
async fn get_article(Path(id): Path<String>) -> Json<Article> {
    Json(Article { id, title: "Hi".to_string() })
}

/// UpdateArticle updates an existing Article.
async fn update_article(Path(id): Path<String>, Json(article): Json<Article>) -> Json<Article> {
    Json(article)
}

/// DeleteArticle removes an existing Article.
async fn delete_article(Path(id): Path<String>) -> impl IntoResponse {
    ()
}

async fn admin_index() -> &'static str {
    "admin: index"
}

async fn admin_accounts() -> &'static str {
    "admin: list accounts.."
}

fn articles_router() -> Router {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route(
            "/:article_id",
            get(get_article)
                .put(update_article)
                .delete(delete_article)
                .layer(middleware::from_fn(article_ctx)),
        )
}

// A completely separate router for administrator routes
fn admin_router() -> Router {
    Router::new()
        .route("/", get(admin_index))
        .route("/accounts", get(admin_accounts))
        .route_layer(middleware::from_fn(admin_only))
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(|| async { "root." }))
        .route("/ping", get(|| async { "pong" }))
        .nest("/articles", articles_router())
        .nest("/admin", admin_router())
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app()).await.unwrap();
}
