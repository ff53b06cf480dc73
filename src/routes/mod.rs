use crate::db::EmailStore;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod email;

/// JSON API. Requests with the wrong method on a known path get 405.
pub fn router(store: EmailStore) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/email/create", post(email::create_email))
        .route("/email/get", get(email::get_email))
        .route("/email/get_batch", get(email::get_email_batch))
        .route("/email/update", put(email::update_email))
        .route("/email/delete", post(email::delete_email))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Runs the JSON API on an already bound socket until `shutdown` resolves.
pub async fn serve<F>(store: EmailStore, listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("JSON API server listening on http://{}", addr);
    }
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
