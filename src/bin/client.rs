//! Demo driver for the gRPC API: creates, confirms and opts out one address,
//! then lists the first page of subscribers.

use anyhow::{Context, Result};
use clap::Parser;
use mailinglist::grpc::proto::{self, mailing_list_service_client::MailingListServiceClient};
use std::future::Future;
use std::time::Duration;
use tonic::transport::Channel;

const CALL_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "mailinglist-client", about = "Exercise the mailing list gRPC API")]
struct Args {
    /// gRPC server address.
    #[arg(long, env = "MAILINGLIST_GRPC_ADDR", default_value = "127.0.0.1:8081")]
    grpc_addr: String,

    /// Address to create, confirm and opt out.
    #[arg(long, default_value = "subscriber@example.com")]
    email: String,

    /// Page size for the final listing.
    #[arg(long, default_value_t = 5)]
    count: i64,
}

type Client = MailingListServiceClient<Channel>;

async fn call<T, F>(name: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<tonic::Response<T>, tonic::Status>>,
{
    tracing::info!("{name}");
    let res = tokio::time::timeout(CALL_TIMEOUT, fut)
        .await
        .with_context(|| format!("{name}: timed out"))?
        .with_context(|| format!("{name}: request failed"))?;
    Ok(res.into_inner())
}

fn log_entry(res: &proto::EmailResponse) {
    match &res.email_entry {
        Some(entry) => tracing::info!("  response: {:?}", entry),
        None => tracing::info!("  email not found"),
    }
}

async fn create_email(client: &mut Client, addr: &str) -> Result<Option<proto::EmailEntry>> {
    let req = proto::CreateEmailRequest {
        email_addr: addr.to_string(),
    };
    let res = call("create email", client.create_email(req)).await?;
    log_entry(&res);
    Ok(res.email_entry)
}

async fn update_email(client: &mut Client, entry: proto::EmailEntry) -> Result<Option<proto::EmailEntry>> {
    let req = proto::UpdateEmailRequest {
        email_entry: Some(entry),
    };
    let res = call("update email", client.update_email(req)).await?;
    log_entry(&res);
    Ok(res.email_entry)
}

async fn delete_email(client: &mut Client, addr: &str) -> Result<Option<proto::EmailEntry>> {
    let req = proto::DeleteEmailRequest {
        email_addr: addr.to_string(),
    };
    let res = call("delete email", client.delete_email(req)).await?;
    log_entry(&res);
    Ok(res.email_entry)
}

async fn get_email_batch(client: &mut Client, count: i64, page: i64) -> Result<()> {
    let req = proto::GetEmailBatchRequest { page, count };
    let res = call("get email batch", client.get_email_batch(req)).await?;
    let total = res.email_entries.len();
    tracing::info!("response:");
    for (i, entry) in res.email_entries.iter().enumerate() {
        tracing::info!("  item [{} of {}]: {:?}", i + 1, total, entry);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    mailinglist::telemetry::init_tracing();
    let args = Args::parse();

    let endpoint = format!("http://{}", args.grpc_addr);
    let mut client = MailingListServiceClient::connect(endpoint.clone())
        .await
        .with_context(|| format!("did not connect to {endpoint}"))?;

    let mut entry = create_email(&mut client, &args.email)
        .await?
        .context("server returned no entry for the created address")?;
    entry.confirmed_at = chrono::Utc::now().timestamp();
    update_email(&mut client, entry).await?;
    delete_email(&mut client, &args.email).await?;
    get_email_batch(&mut client, args.count, 1).await?;
    Ok(())
}
