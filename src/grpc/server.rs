use super::proto::mailing_list_service_server::MailingListServiceServer;
use super::MailServer;
use crate::db::EmailStore;
use std::future::Future;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

/// Runs the gRPC listener on an already bound socket until `shutdown` resolves.
pub async fn serve<F>(
    store: EmailStore,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()>,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("gRPC server listening on {}", addr);
    }
    Server::builder()
        .add_service(MailingListServiceServer::new(MailServer::new(store)))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
