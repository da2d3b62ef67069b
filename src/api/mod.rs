// api/mod.rs — HTTP JSON API server.
//
// Axum server bridging HTTP requests to the task repository.
//
// Endpoints:
//   GET    /api/tasks
//   POST   /api/tasks
//   GET    /api/tasks/{id}
//   PUT    /api/tasks/{id}
//   DELETE /api/tasks/{id}
//   GET    /api/health

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::repository::TaskRepository;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "127.0.0.1";

pub async fn serve(addr: SocketAddr, repo: Arc<TaskRepository>) -> Result<()> {
    let router = build_router(repo);
    info!("task API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(repo: Arc<TaskRepository>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            "/api/tasks",
            get(routes::list_tasks).post(routes::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(routes::get_task)
                .put(routes::update_task)
                .delete(routes::delete_task),
        )
        .layer(CorsLayer::permissive())
        .with_state(repo)
}
