use anyhow::{Context, Result};
use mailinglist::{config::Config, db::EmailStore, grpc, routes, telemetry};
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let store = EmailStore::connect(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    store.try_create_table().await?;

    let json_listener = TcpListener::bind(config.json_addr)
        .await
        .with_context(|| format!("JSON API: failed to bind {}", config.json_addr))?;
    let grpc_listener = TcpListener::bind(config.grpc_addr)
        .await
        .with_context(|| format!("gRPC: failed to bind {}", config.grpc_addr))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let json = routes::serve(store.clone(), json_listener, wait_for(shutdown_rx.clone()));
    let rpc = grpc::serve(store.clone(), grpc_listener, wait_for(shutdown_rx));
    tokio::try_join!(
        async { json.await.context("JSON API server error") },
        async { rpc.await.context("gRPC server error") },
    )?;

    store.close().await;
    Ok(())
}

async fn wait_for(mut rx: watch::Receiver<()>) {
    let _ = rx.changed().await;
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = term => {} }
}
