//! Conversions between the canonical [`EmailEntry`], the `emails` row and the
//! two wire shapes (protobuf and JSON).
//!
//! Timestamps travel everywhere as whole seconds since the Unix epoch. Decoding
//! never fails: absent fields become zero values and second counts chrono
//! cannot represent collapse to the epoch. Checking required fields is up to
//! each facade.

use crate::grpc::proto;
use crate::models::{EmailEntry, EmailRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub fn timestamp_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(|| {
        tracing::debug!(secs, "timestamp out of range, using epoch");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

pub fn timestamp_to_secs(at: &DateTime<Utc>) -> i64 {
    at.timestamp()
}

impl From<EmailRow> for EmailEntry {
    fn from(row: EmailRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            confirmed_at: timestamp_from_secs(row.confirmed_at),
            opt_out: row.opt_out != 0,
        }
    }
}

impl From<&EmailEntry> for EmailRow {
    fn from(entry: &EmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email.clone(),
            confirmed_at: timestamp_to_secs(&entry.confirmed_at),
            opt_out: i64::from(entry.opt_out),
        }
    }
}

impl From<proto::EmailEntry> for EmailEntry {
    fn from(pb: proto::EmailEntry) -> Self {
        Self {
            id: pb.id,
            email: pb.email,
            confirmed_at: timestamp_from_secs(pb.confirmed_at),
            opt_out: pb.opt_out,
        }
    }
}

impl From<&EmailEntry> for proto::EmailEntry {
    fn from(entry: &EmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email.clone(),
            confirmed_at: timestamp_to_secs(&entry.confirmed_at),
            opt_out: entry.opt_out,
        }
    }
}

/// JSON body for an entry. Every field may be omitted or `null` on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailEntryJson {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub confirmed_at: i64,
    #[serde(alias = "optedOut", deserialize_with = "null_as_default")]
    pub opt_out: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<EmailEntryJson> for EmailEntry {
    fn from(json: EmailEntryJson) -> Self {
        Self {
            id: json.id,
            email: json.email,
            confirmed_at: timestamp_from_secs(json.confirmed_at),
            opt_out: json.opt_out,
        }
    }
}

impl From<&EmailEntry> for EmailEntryJson {
    fn from(entry: &EmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email.clone(),
            confirmed_at: timestamp_to_secs(&entry.confirmed_at),
            opt_out: entry.opt_out,
        }
    }
}
