pub mod codec;
pub mod config;
pub mod db;
pub mod grpc;
pub mod models;
pub mod routes;
pub mod telemetry;

pub use db::{EmailStore, StoreError};
pub use models::{BatchQuery, EmailEntry};
