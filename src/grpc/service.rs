//! MailingListService implementation.
//!
//! Writes never fail the call on a store error: create, update and delete
//! fall back to a fresh lookup and return whatever entry exists afterwards.
//! Only lookup and listing faults become `INTERNAL` statuses.

use crate::db::EmailStore;
use crate::grpc::proto::{self, mailing_list_service_server::MailingListService};
use crate::models::{BatchQuery, EmailEntry};
use tonic::{Request, Response, Status};

/// Stateless adapter from gRPC requests to an [`EmailStore`].
pub struct MailServer {
    store: EmailStore,
}

impl MailServer {
    pub fn new(store: EmailStore) -> Self {
        Self { store }
    }

    /// Current state of `email`, or an empty response when it does not exist.
    async fn email_response(&self, email: &str) -> Result<Response<proto::EmailResponse>, Status> {
        let entry = self
            .store
            .get(email)
            .await
            .map_err(|e| Status::internal(format!("lookup failed: {e}")))?;
        Ok(Response::new(proto::EmailResponse {
            email_entry: entry.as_ref().map(proto::EmailEntry::from),
        }))
    }
}

fn require_email(email: &str) -> Result<(), Status> {
    if email.is_empty() {
        return Err(Status::invalid_argument("email address is required"));
    }
    Ok(())
}

#[tonic::async_trait]
impl MailingListService for MailServer {
    async fn create_email(
        &self,
        request: Request<proto::CreateEmailRequest>,
    ) -> Result<Response<proto::EmailResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(email = %req.email_addr, "gRPC CreateEmail");
        require_email(&req.email_addr)?;

        if let Err(e) = self.store.create(&req.email_addr).await {
            tracing::debug!(error = %e, "create absorbed, returning existing entry");
        }
        self.email_response(&req.email_addr).await
    }

    async fn get_email(
        &self,
        request: Request<proto::GetEmailRequest>,
    ) -> Result<Response<proto::EmailResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(email = %req.email_addr, "gRPC GetEmail");
        require_email(&req.email_addr)?;
        self.email_response(&req.email_addr).await
    }

    async fn get_email_batch(
        &self,
        request: Request<proto::GetEmailBatchRequest>,
    ) -> Result<Response<proto::GetEmailBatchResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(page = req.page, count = req.count, "gRPC GetEmailBatch");

        let entries = self
            .store
            .get_batch(BatchQuery::new(req.page, req.count))
            .await
            .map_err(|e| Status::internal(format!("batch read failed: {e}")))?;
        Ok(Response::new(proto::GetEmailBatchResponse {
            email_entries: entries.iter().map(proto::EmailEntry::from).collect(),
        }))
    }

    async fn update_email(
        &self,
        request: Request<proto::UpdateEmailRequest>,
    ) -> Result<Response<proto::EmailResponse>, Status> {
        let entry: EmailEntry = request
            .into_inner()
            .email_entry
            .map(Into::into)
            .ok_or_else(|| Status::invalid_argument("email_entry is required"))?;
        tracing::info!(
            email = %entry.email,
            confirmed = entry.is_confirmed(),
            confirmed_at = entry.confirmed_at.timestamp(),
            opt_out = entry.opt_out,
            "gRPC UpdateEmail"
        );
        require_email(&entry.email)?;

        if let Err(e) = self.store.update(&entry).await {
            tracing::debug!(error = %e, "update absorbed, returning current entry");
        }
        self.email_response(&entry.email).await
    }

    async fn delete_email(
        &self,
        request: Request<proto::DeleteEmailRequest>,
    ) -> Result<Response<proto::EmailResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(email = %req.email_addr, "gRPC DeleteEmail");
        require_email(&req.email_addr)?;

        if let Err(e) = self.store.delete(&req.email_addr).await {
            tracing::debug!(error = %e, "delete absorbed, returning current entry");
        }
        self.email_response(&req.email_addr).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    async fn server() -> MailServer {
        MailServer::new(EmailStore::in_memory().await.unwrap())
    }

    async fn create(server: &MailServer, email: &str) -> Option<proto::EmailEntry> {
        server
            .create_email(Request::new(proto::CreateEmailRequest {
                email_addr: email.into(),
            }))
            .await
            .unwrap()
            .into_inner()
            .email_entry
    }

    #[tokio::test]
    async fn create_returns_new_entry() {
        let server = server().await;
        let entry = create(&server, "a@x.com").await.unwrap();
        assert!(entry.id > 0);
        assert_eq!(entry.email, "a@x.com");
        assert_eq!(entry.confirmed_at, 0);
        assert!(!entry.opt_out);
    }

    #[tokio::test]
    async fn duplicate_create_returns_existing_entry() {
        let server = server().await;
        let first = create(&server, "a@x.com").await.unwrap();
        server
            .update_email(Request::new(proto::UpdateEmailRequest {
                email_entry: Some(proto::EmailEntry {
                    email: "a@x.com".into(),
                    confirmed_at: 1000,
                    ..Default::default()
                }),
            }))
            .await
            .unwrap();

        let second = create(&server, "a@x.com").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.confirmed_at, 1000);
    }

    #[tokio::test]
    async fn get_missing_is_empty_response() {
        let server = server().await;
        let res = server
            .get_email(Request::new(proto::GetEmailRequest {
                email_addr: "nobody@x.com".into(),
            }))
            .await
            .unwrap();
        assert!(res.into_inner().email_entry.is_none());
    }

    #[tokio::test]
    async fn update_ignores_caller_id() {
        let server = server().await;
        let created = create(&server, "a@x.com").await.unwrap();

        let res = server
            .update_email(Request::new(proto::UpdateEmailRequest {
                email_entry: Some(proto::EmailEntry {
                    id: 999,
                    email: "a@x.com".into(),
                    confirmed_at: 1000,
                    opt_out: false,
                }),
            }))
            .await
            .unwrap()
            .into_inner()
            .email_entry
            .unwrap();
        assert_eq!(res.id, created.id);
        assert_eq!(res.confirmed_at, 1000);
    }

    #[tokio::test]
    async fn update_without_entry_is_invalid() {
        let server = server().await;
        let status = server
            .update_email(Request::new(proto::UpdateEmailRequest { email_entry: None }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn empty_email_is_invalid() {
        let server = server().await;
        let status = server
            .create_email(Request::new(proto::CreateEmailRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn delete_opts_out_and_hides_from_batch() {
        let server = server().await;
        create(&server, "a@x.com").await;
        create(&server, "b@x.com").await;

        let deleted = server
            .delete_email(Request::new(proto::DeleteEmailRequest {
                email_addr: "a@x.com".into(),
            }))
            .await
            .unwrap()
            .into_inner()
            .email_entry
            .unwrap();
        assert!(deleted.opt_out);

        let batch = server
            .get_email_batch(Request::new(proto::GetEmailBatchRequest { page: 1, count: 10 }))
            .await
            .unwrap()
            .into_inner()
            .email_entries;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].email, "b@x.com");
    }

    #[tokio::test]
    async fn delete_unknown_returns_empty() {
        let server = server().await;
        let res = server
            .delete_email(Request::new(proto::DeleteEmailRequest {
                email_addr: "ghost@x.com".into(),
            }))
            .await
            .unwrap();
        assert!(res.into_inner().email_entry.is_none());
    }

    #[tokio::test]
    async fn batch_passes_zero_count_through() {
        let server = server().await;
        create(&server, "a@x.com").await;
        let batch = server
            .get_email_batch(Request::new(proto::GetEmailBatchRequest { page: 1, count: 0 }))
            .await
            .unwrap()
            .into_inner()
            .email_entries;
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_internal() {
        let store = EmailStore::in_memory().await.unwrap();
        let server = MailServer::new(store.clone());
        store.close().await;

        let status = server
            .get_email(Request::new(proto::GetEmailRequest {
                email_addr: "a@x.com".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Internal);

        let status = server
            .create_email(Request::new(proto::CreateEmailRequest {
                email_addr: "a@x.com".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Internal);
    }
}
