use super::{EmailStore, StoreError};
use crate::models::{BatchQuery, EmailEntry, EmailRow};

const SELECT_ENTRY: &str = "SELECT id, email, confirmed_at, opt_out FROM emails";

fn failed(op: &'static str, email: &str, err: sqlx::Error) -> StoreError {
    let err = StoreError::from(err);
    tracing::warn!(op, email, error = %err, "email store operation failed");
    err
}

impl EmailStore {
    /// Inserts a new, unconfirmed entry for `email`.
    pub async fn create(&self, email: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO emails (email, confirmed_at, opt_out) VALUES (?, 0, 0)")
            .bind(email)
            .execute(self.pool())
            .await
            .map_err(|e| failed("create", email, e))?;
        Ok(())
    }

    /// Looks up an entry by exact email, opted-out entries included.
    pub async fn get(&self, email: &str) -> Result<Option<EmailEntry>, StoreError> {
        let row = sqlx::query_as::<_, EmailRow>(&format!("{SELECT_ENTRY} WHERE email = ?"))
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| failed("get", email, e))?;
        Ok(row.map(EmailEntry::from))
    }

    /// Subscribed entries in ascending id order, one page at a time.
    pub async fn get_batch(&self, query: BatchQuery) -> Result<Vec<EmailEntry>, StoreError> {
        let rows = sqlx::query_as::<_, EmailRow>(&format!(
            "{SELECT_ENTRY} WHERE opt_out = 0 ORDER BY id ASC LIMIT ? OFFSET ?"
        ))
        .bind(query.count)
        .bind(query.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            let err = StoreError::from(e);
            tracing::warn!(page = query.page, count = query.count, error = %err, "email batch read failed");
            err
        })?;
        Ok(rows.into_iter().map(EmailEntry::from).collect())
    }

    /// Upserts by email: replaces `confirmed_at` and `opt_out` on an existing
    /// row (keeping its id) or inserts a new one. `entry.id` is ignored.
    pub async fn update(&self, entry: &EmailEntry) -> Result<(), StoreError> {
        let row = EmailRow::from(entry);
        sqlx::query(
            r#"INSERT INTO emails (email, confirmed_at, opt_out) VALUES (?, ?, ?)
               ON CONFLICT(email) DO UPDATE SET
                   confirmed_at = excluded.confirmed_at,
                   opt_out = excluded.opt_out"#,
        )
        .bind(&row.email)
        .bind(row.confirmed_at)
        .bind(row.opt_out)
        .execute(self.pool())
        .await
        .map_err(|e| failed("update", &entry.email, e))?;
        Ok(())
    }

    /// Opts the entry out of listings. Unknown emails are a no-op.
    pub async fn delete(&self, email: &str) -> Result<(), StoreError> {
        let res = sqlx::query("UPDATE emails SET opt_out = 1 WHERE email = ?")
            .bind(email)
            .execute(self.pool())
            .await
            .map_err(|e| failed("delete", email, e))?;
        if res.rows_affected() == 0 {
            tracing::debug!(email, "delete of unknown email ignored");
        }
        Ok(())
    }
}
