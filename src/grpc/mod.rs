//! gRPC facade for the mailing list.
//!
//! Serves the `MailingListService` defined in `proto/mailinglist.proto`:
//! CreateEmail, GetEmail, GetEmailBatch, UpdateEmail, DeleteEmail.

pub mod proto {
    //! Generated protobuf types, service trait and client.
    tonic::include_proto!("mailinglist");
}

mod server;
mod service;

pub use server::serve;
pub use service::MailServer;
