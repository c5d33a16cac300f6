use core::fmt;
use serde::{Deserialize, Serialize};

/// A persisted catalog entry. `id` is assigned by the store on insert and is unique for the
/// lifetime of the database file. The two date fields hold locale-formatted `day/month/year`
/// strings and are treated as opaque text, never parsed.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub date_from: String,
    pub date_to: String,
    pub is_read: bool,
}

impl Book {
    #[must_use]
    #[inline]
    pub const fn new(
        id: i64,
        title: String,
        author: String,
        date_from: String,
        date_to: String,
        is_read: bool,
    ) -> Self {
        Self {
            id,
            title,
            author,
            date_from,
            date_to,
            is_read,
        }
    }

    /// The read flag is the only field that gets flipped in place by callers; everything else is
    /// overwritten wholesale through [`Db::update_book`](crate::database::queries::Db::update_book).
    #[inline]
    pub const fn set_read(&mut self, read: bool) {
        self.is_read = read;
    }
}

impl fmt::Display for Book {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.author)
    }
}

/// A record that has not been persisted yet, so it carries no id. Insert consumes one of these
/// and hands back a [`Book`] with the store-assigned id filled in.
#[non_exhaustive]
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub date_from: String,
    pub date_to: String,
    pub is_read: bool,
}

impl NewBook {
    #[must_use]
    #[inline]
    pub const fn new(
        title: String,
        author: String,
        date_from: String,
        date_to: String,
        is_read: bool,
    ) -> Self {
        Self {
            title,
            author,
            date_from,
            date_to,
            is_read,
        }
    }
}

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert and update refuse blank titles and authors. Date strings are opaque and accepted
    /// verbatim.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}
