pub mod email_entry;

pub use email_entry::{BatchQuery, EmailEntry, EmailRow};
