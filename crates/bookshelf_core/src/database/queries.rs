use crate::database::types::{Book, NewBook, StoreError};
use log::{debug, info};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

/// Schema history, applied in order on open. `PRAGMA user_version` records how many entries have
/// already run, so upgrades are additive and never drop existing rows.
const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        author TEXT,
        date_from TEXT,
        date_to TEXT,
        is_read INTEGER DEFAULT 0
    );",
];

pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (or create) the database file at `path` and bring its schema up to date.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at start of program"
    )]
    pub async fn init(path: &Path) -> Result<Self, StoreError> {
        info!("Opening bookshelf database at {}", path.display());
        let options = SqliteConnectOptions::new()
            .foreign_keys(true)
            .create_if_missing(true)
            .filename(path);
        let pool = SqlitePool::connect_with(options).await?;
        run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Open a store that lives entirely in memory and vanishes on close. A single pooled
    /// connection is pinned forever, as every SQLite in-memory database is private to the
    /// connection that opened it.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called rarely, only for ephemeral stores"
    )]
    pub async fn init_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called once at end of program"
    )]
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Persist `book` and return the stored record, id included. The id comes straight from the
    /// INSERT via RETURNING, so no follow-up lookup is needed.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn insert_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        validate_text_fields(&book.title, &book.author)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO books (title, author, date_from, date_to, is_read)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id;",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.date_from)
        .bind(&book.date_to)
        .bind(book.is_read)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted book '{}' with id {id}", book.title);
        Ok(Book::new(
            id,
            book.title.clone(),
            book.author.clone(),
            book.date_from.clone(),
            book.date_to.clone(),
            book.is_read,
        ))
    }

    /// Exact-match lookup on the title. Titles are not unique; when several rows share one, the
    /// row with the lowest id wins, which is the oldest matching entry.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StoreError> {
        let book: Option<Book> = sqlx::query_as(
            "SELECT id, title, author, date_from, date_to, is_read
             FROM books
             WHERE title = ?
             ORDER BY id
             LIMIT 1;",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Every stored record, in no particular order.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Called only when the shelf re-renders"
    )]
    pub async fn fetch_books(&self) -> Result<Vec<Book>, StoreError> {
        let books: Vec<Book> = sqlx::query_as(
            "SELECT id, title, author, date_from, date_to, is_read FROM books;",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Like [`Self::fetch_books`], restricted to records flagged as read.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn fetch_read_books(&self) -> Result<Vec<Book>, StoreError> {
        let books: Vec<Book> = sqlx::query_as(
            "SELECT id, title, author, date_from, date_to, is_read
             FROM books
             WHERE is_read = 1;",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Overwrite every field of the row whose id matches `book.id`. An id that matches nothing is
    /// a silent no-op.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn update_book(&self, book: &Book) -> Result<(), StoreError> {
        validate_text_fields(&book.title, &book.author)?;

        let result = sqlx::query(
            "UPDATE books
             SET title = ?, author = ?, date_from = ?, date_to = ?, is_read = ?
             WHERE id = ?;",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.date_from)
        .bind(&book.date_to)
        .bind(book.is_read)
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Update of book id {} matched no rows", book.id);
        }
        Ok(())
    }

    /// Remove the row with the given id. An absent id is a silent no-op.
    #[allow(clippy::missing_inline_in_public_items, reason = "Called rarely")]
    pub async fn delete_book(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Delete of book id {id} matched no rows");
        }
        Ok(())
    }

    /// Substring search over title and author. Each non-empty needle becomes a LIKE predicate and
    /// the predicates are ANDed together; with both needles empty every row matches. SQLite's
    /// default LIKE applies, so matching is case-insensitive for ASCII, and `%`/`_` in a needle
    /// keep their wildcard meaning.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "Large function, called only on user-driven searches"
    )]
    pub async fn search_books(&self, title: &str, author: &str) -> Result<Vec<Book>, StoreError> {
        let books: Vec<Book> = match (title.is_empty(), author.is_empty()) {
            (true, true) => return self.fetch_books().await,
            (false, true) => {
                sqlx::query_as(
                    "SELECT id, title, author, date_from, date_to, is_read
                     FROM books
                     WHERE title LIKE ?;",
                )
                .bind(format!("%{title}%"))
                .fetch_all(&self.pool)
                .await?
            }
            (true, false) => {
                sqlx::query_as(
                    "SELECT id, title, author, date_from, date_to, is_read
                     FROM books
                     WHERE author LIKE ?;",
                )
                .bind(format!("%{author}%"))
                .fetch_all(&self.pool)
                .await?
            }
            (false, false) => {
                sqlx::query_as(
                    "SELECT id, title, author, date_from, date_to, is_read
                     FROM books
                     WHERE title LIKE ? AND author LIKE ?;",
                )
                .bind(format!("%{title}%"))
                .bind(format!("%{author}%"))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(books)
    }
}

/// Apply any schema migrations beyond the recorded `user_version`, each in its own transaction.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version;")
        .fetch_one(pool)
        .await?;
    let applied = usize::try_from(version).unwrap_or(0);

    for (index, statement) in MIGRATIONS.iter().enumerate().skip(applied) {
        let mut tx = pool.begin().await?;
        sqlx::query(statement).execute(&mut *tx).await?;
        let next = index + 1;
        sqlx::query(&format!("PRAGMA user_version = {next};"))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("Applied schema migration {next}");
    }

    Ok(())
}

/// Titles and authors must carry visible text; whitespace-only counts as empty. Date strings are
/// opaque to the store and pass through untouched.
fn validate_text_fields(title: &str, author: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::EmptyField { field: "title" });
    }
    if author.trim().is_empty() {
        return Err(StoreError::EmptyField { field: "author" });
    }
    Ok(())
}
