use anyhow::{Context, Result};
use axum::{
    Router, middleware,
    routing::{get, patch},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use fixbase_core::KnowledgeBase;

mod auth;
mod dto;
mod error;
mod handlers;
mod security;


#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) kb: KnowledgeBase,
}

impl WebState {
    fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }
}

/// Serve the JSON API and block until Ctrl+C.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot be bound,
/// or the server exits with a runtime failure.
pub fn serve_web(kb: KnowledgeBase, host: &str, port: u16) -> Result<()> {
    let state = WebState::new(kb.clone());
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    let served = runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        info!(
            address = %listener.local_addr()?,
            storage = %state.kb.storage_kind(),
            "fixbase api listening"
        );

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    });
    drop(runtime);
    // Blocking HTTP clients must not be dropped on a runtime thread, so the last handle goes here.
    drop(kb);
    info!("fixbase api stopped");
    served
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/issues", get(handlers::list_issues).post(handlers::submit_issue))
        .route("/issues/top", get(handlers::top_issues))
        .route("/issues/{id}", get(handlers::get_issue))
        .route("/issues/{id}/upvote", patch(handlers::set_issue_upvotes))
        .route(
            "/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route(
            "/problems",
            get(handlers::list_problems).post(handlers::ask_problem),
        )
        .route("/problems/{id}", get(handlers::get_problem))
        .route("/problems/{id}/upvote", patch(handlers::upvote_problem))
        .route(
            "/problems/{id}/answers",
            get(handlers::list_answers).post(handlers::add_answer),
        )
        .route("/meta", get(handlers::meta))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(security::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
