/// Subscriber entry model shared by the store and both facades
use chrono::{DateTime, Utc};

/// One subscriber in the mailing list.
///
/// `email` is the natural key and is compared exactly as given. An entry whose
/// `confirmed_at` is the Unix epoch has never been confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailEntry {
    pub id: i64,
    pub email: String,
    pub confirmed_at: DateTime<Utc>,
    pub opt_out: bool,
}

impl EmailEntry {
    /// A fresh, unconfirmed and subscribed entry. The id is left at zero until
    /// the store assigns one.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: 0,
            email: email.into(),
            confirmed_at: DateTime::<Utc>::UNIX_EPOCH,
            opt_out: false,
        }
    }

    pub fn with_confirmed_at(mut self, confirmed_at: DateTime<Utc>) -> Self {
        self.confirmed_at = confirmed_at;
        self
    }

    pub fn with_opt_out(mut self, opt_out: bool) -> Self {
        self.opt_out = opt_out;
        self
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at != DateTime::<Utc>::UNIX_EPOCH
    }
}

impl Default for EmailEntry {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Row shape of the `emails` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmailRow {
    pub id: i64,
    pub email: String,
    pub confirmed_at: i64,
    pub opt_out: i64,
}

/// Paging window for batch listing. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchQuery {
    pub page: i64,
    pub count: i64,
}

impl BatchQuery {
    pub fn new(page: i64, count: i64) -> Self {
        Self { page, count }
    }

    /// Rows skipped before this page starts. Never negative.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.count).max(0)
    }

    pub fn is_valid(&self) -> bool {
        self.page > 0 && self.count > 0
    }
}
