/// Email entry endpoints
use crate::codec::EmailEntryJson;
use crate::db::EmailStore;
use crate::models::{BatchQuery, EmailEntry};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchParams {
    pub page: i64,
    pub count: i64,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({"ok": false, "error": error.into()})),
    )
        .into_response()
}

/// Decodes an entry body regardless of `Content-Type`; bad JSON is a 400.
fn decode_entry(body: &Bytes) -> Result<EmailEntryJson, Response> {
    serde_json::from_slice(body).map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}"))
    })
}

fn missing_email() -> Response {
    error_response(StatusCode::BAD_REQUEST, "email field is required")
}

/// Fresh lookup of `email`; `null` when it does not exist.
async fn lookup(store: &EmailStore, email: &str) -> Response {
    match store.get(email).await {
        Ok(entry) => Json(entry.as_ref().map(EmailEntryJson::from)).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// POST /email/create
pub async fn create_email(State(store): State<EmailStore>, body: Bytes) -> Response {
    let body = match decode_entry(&body) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };
    let entry = EmailEntry::from(body);
    tracing::info!(email = %entry.email, "JSON CreateEmail");
    if entry.email.is_empty() {
        return missing_email();
    }
    if let Err(e) = store.create(&entry.email).await {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }
    lookup(&store, &entry.email).await
}

/// GET /email/get?email=
pub async fn get_email(
    State(store): State<EmailStore>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
    };
    tracing::info!(email = %query.email, "JSON GetEmail");
    if query.email.is_empty() {
        return missing_email();
    }
    lookup(&store, &query.email).await
}

/// GET /email/get_batch?page=&count=
pub async fn get_email_batch(
    State(store): State<EmailStore>,
    params: Result<Query<BatchParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
    };
    let query = BatchQuery::new(params.page, params.count);
    if !query.is_valid() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "page and count fields are required and must be > 0",
        );
    }
    tracing::info!(page = query.page, count = query.count, "JSON GetEmailBatch");
    match store.get_batch(query).await {
        Ok(entries) => {
            let body: Vec<EmailEntryJson> = entries.iter().map(EmailEntryJson::from).collect();
            Json(body).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// PUT /email/update
pub async fn update_email(State(store): State<EmailStore>, body: Bytes) -> Response {
    let body = match decode_entry(&body) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };
    let entry = EmailEntry::from(body);
    tracing::info!(
        email = %entry.email,
        confirmed = entry.is_confirmed(),
        confirmed_at = entry.confirmed_at.timestamp(),
        opt_out = entry.opt_out,
        "JSON UpdateEmail"
    );
    if entry.email.is_empty() {
        return missing_email();
    }
    if let Err(e) = store.update(&entry).await {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }
    lookup(&store, &entry.email).await
}

/// POST /email/delete
pub async fn delete_email(State(store): State<EmailStore>, body: Bytes) -> Response {
    let body = match decode_entry(&body) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };
    tracing::info!(email = %body.email, "JSON DeleteEmail");
    if body.email.is_empty() {
        return missing_email();
    }
    if let Err(e) = store.delete(&body.email).await {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }
    lookup(&store, &body.email).await
}
