//! Reading report
//!
//! Plain-text rendering of a catalog entry, meant to be handed to whatever share or mail action
//! the embedding front end provides. The front end supplies the transport; this module only
//! supplies the subject line and the body.

use crate::database::types::Book;

/// Subject line to pair with [`book_report`] when the report goes out as an email.
pub const REPORT_SUBJECT: &str = "Book reading report";

/// Render one book as a five-line report: title, author, both reading dates, and the read status.
#[must_use]
#[allow(
    clippy::missing_inline_in_public_items,
    reason = "Called only when the user shares a report"
)]
pub fn book_report(book: &Book) -> String {
    let status = if book.is_read { "Read" } else { "Unread" };
    format!(
        "Title: {}\nAuthor: {}\nStarted reading: {}\nFinished reading: {}\nStatus: {status}",
        book.title, book.author, book.date_from, book.date_to
    )
}
