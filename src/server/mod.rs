//! JSON API server
//!
//! The HTTP surface over [`ContentService`]: metadata listing with an
//! optional limit, single posts by slug, and the slug/tag projections.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::service::ContentService;

pub fn router(service: Arc<ContentService>) -> Router {
    Router::new()
        .route("/api/blogs", get(list_blogs))
        .route("/api/blogs/:slug", get(get_blog))
        .route("/api/slugs", get(list_slugs))
        .route("/api/tags", get(list_tags))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Start the API server.
pub async fn start(service: Arc<ContentService>, ip: &str, port: u16) -> Result<()> {
    let app = router(service);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("API server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Deserialize)]
struct ListParams {
    limit: Option<String>,
}

async fn list_blogs(
    State(service): State<Arc<ContentService>>,
    Query(params): Query<ListParams>,
) -> Response {
    // An unparseable limit means "no limit", matching the listing contract.
    let limit = params.limit.as_deref().and_then(|v| v.parse::<usize>().ok());
    Json(service.list_metadata(limit)).into_response()
}

async fn get_blog(
    State(service): State<Arc<ContentService>>,
    Path(slug): Path<String>,
) -> Response {
    match service.get_by_slug(&slug) {
        Some(post) => Json(&*post).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Blog post not found" })),
        )
            .into_response(),
    }
}

async fn list_slugs(State(service): State<Arc<ContentService>>) -> Json<Vec<String>> {
    Json(service.list_slugs())
}

async fn list_tags(State(service): State<Arc<ContentService>>) -> Json<Vec<String>> {
    Json(service.list_tags())
}
