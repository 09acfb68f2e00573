//! Catalog storage backed by SQLite
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Deletion is a soft delete: rows keep their identifier but carry a
//! `deleted_at` marker and are excluded from every query.

use crate::book::{Author, Book};
use crate::error::{BookstoreError, Result};
use crate::seed::SeedRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Columns for a book row joined with its author, in mapping order.
const BOOK_WITH_AUTHOR: &str = "SELECT b.id, b.name, b.stock_code, b.isbn, b.page_count, b.price,
            b.stock_count, b.author_id, b.created_at,
            a.id, a.name, a.surname, a.created_at
     FROM book b
     JOIN author a ON a.id = b.author_id
     WHERE b.deleted_at IS NULL";

/// Sole gateway to persisted book and author state.
///
/// Constructed once at startup and passed explicitly to command handlers;
/// owns the connection for the lifetime of the process.
pub struct BookStore {
    conn: Connection,
}

impl BookStore {
    /// Open (or create) the catalog database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// In-memory catalog, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Ensure the catalog schema exists. Idempotent, called on every start.
    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS author (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                surname TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                deleted_at TEXT
            );

            CREATE TABLE IF NOT EXISTS book (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                stock_code TEXT NOT NULL,
                isbn TEXT NOT NULL,
                page_count INTEGER NOT NULL CHECK (page_count >= 0),
                price REAL NOT NULL CHECK (price >= 0),
                stock_count INTEGER NOT NULL CHECK (stock_count >= 0),
                author_id INTEGER NOT NULL REFERENCES author(id),
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                deleted_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_book_name ON book(name);
            CREATE INDEX IF NOT EXISTS idx_book_author ON book(author_id);
            ",
        )?;

        log::info!("Database schema initialized");
        Ok(())
    }

    /// Every live book with its author populated, in identifier order.
    pub fn get_all_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_WITH_AUTHOR} ORDER BY b.id"))?;
        let books: rusqlite::Result<Vec<Book>> =
            stmt.query_map([], book_with_author_from_row)?.collect();
        Ok(books?)
    }

    /// Fetch one book by identifier, author populated.
    ///
    /// Fails with `NotFound` for unknown or soft-deleted identifiers.
    pub fn get_book_by_id(&self, id: i64) -> Result<Book> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_WITH_AUTHOR} AND b.id = ?1"))?;
        stmt.query_row(params![id], book_with_author_from_row)
            .optional()?
            .ok_or(BookstoreError::NotFound(id))
    }

    /// Exact-match lookup by name. `None` means no live record exists.
    pub fn get_book_by_name(&self, name: &str) -> Result<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_WITH_AUTHOR} AND b.name = ?1"))?;
        Ok(stmt
            .query_row(params![name], book_with_author_from_row)
            .optional()?)
    }

    /// Unfiltered fetch without author population. Internal use only
    /// (seed verification); not part of the console surface.
    pub fn find_all_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, stock_code, isbn, page_count, price,
                    stock_count, author_id, created_at
             FROM book
             WHERE deleted_at IS NULL
             ORDER BY id",
        )?;
        let books: rusqlite::Result<Vec<Book>> = stmt.query_map([], book_from_row)?.collect();
        Ok(books?)
    }

    /// Case-insensitive substring search over name, stock code and ISBN.
    ///
    /// An empty query matches every live book; no match returns an empty
    /// vector, never an error. Authors are populated.
    pub fn find_books_by_query(&self, query: &str) -> Result<Vec<Book>> {
        let pattern = format!("%{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_WITH_AUTHOR}
               AND (b.name LIKE ?1 COLLATE NOCASE
                    OR b.stock_code LIKE ?1 COLLATE NOCASE
                    OR b.isbn LIKE ?1 COLLATE NOCASE)
             ORDER BY b.id"
        ))?;
        let books: rusqlite::Result<Vec<Book>> = stmt
            .query_map(params![pattern], book_with_author_from_row)?
            .collect();
        Ok(books?)
    }

    /// Decrement a book's stock by exactly one, provided at least
    /// `requested` copies are on hand.
    ///
    /// The stock check and the decrement are a single conditional UPDATE,
    /// so concurrent invocations cannot drive the count negative. The
    /// caller validates `requested > 0` before calling.
    pub fn decrement_stock(&self, id: i64, requested: i64) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE book SET stock_count = stock_count - 1
             WHERE id = ?1 AND stock_count >= ?2 AND deleted_at IS NULL",
            params![id, requested],
        )?;
        if affected == 1 {
            log::info!("Stock decremented for book {}", id);
            return Ok(());
        }

        // Nothing updated: either the book is gone or stock is short.
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM book WHERE id = ?1 AND deleted_at IS NULL",
                params![id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            Err(BookstoreError::NotEnoughStock {
                book_id: id,
                requested,
            })
        } else {
            Err(BookstoreError::NotFound(id))
        }
    }

    /// Soft-delete a book. A second delete of the same identifier fails
    /// with `NotFound`, as does deleting an identifier that never existed.
    pub fn delete_book(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE book SET deleted_at = datetime('now')
             WHERE id = ?1 AND deleted_at IS NULL",
            params![id],
        )?;
        if affected == 0 {
            return Err(BookstoreError::NotFound(id));
        }
        log::info!("Deleted book {}", id);
        Ok(())
    }

    /// Insert seed rows using first-or-create semantics keyed on book name.
    ///
    /// A row whose book name already exists in the catalog is skipped
    /// entirely (the existing record and its author stay untouched), so
    /// re-seeding the same file never duplicates or overwrites rows.
    /// Runs in one transaction. Returns `(inserted, skipped_existing)`.
    pub fn insert_seed_records(&mut self, records: &[SeedRecord]) -> Result<(usize, usize)> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        let mut skipped = 0;
        {
            let mut existing =
                tx.prepare_cached("SELECT 1 FROM book WHERE name = ?1 AND deleted_at IS NULL")?;
            let mut insert_author =
                tx.prepare_cached("INSERT INTO author (name, surname) VALUES (?1, ?2)")?;
            let mut insert_book = tx.prepare_cached(
                "INSERT INTO book (name, stock_code, isbn, page_count, price, stock_count, author_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;

            for record in records {
                let found = existing
                    .query_row(params![&record.name], |_| Ok(()))
                    .optional()?;
                if found.is_some() {
                    skipped += 1;
                    continue;
                }

                insert_author.execute(params![&record.author_name, &record.author_surname])?;
                let author_id = tx.last_insert_rowid();
                insert_book.execute(params![
                    &record.name,
                    &record.stock_code,
                    &record.isbn,
                    record.page_count,
                    record.price,
                    record.stock_count,
                    author_id,
                ])?;
                inserted += 1;
            }
        }
        tx.commit()?;

        log::info!(
            "Seeded {} books into catalog ({} already present)",
            inserted,
            skipped
        );
        Ok((inserted, skipped))
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        name: row.get(1)?,
        stock_code: row.get(2)?,
        isbn: row.get(3)?,
        page_count: row.get(4)?,
        price: row.get(5)?,
        stock_count: row.get(6)?,
        author_id: row.get(7)?,
        created_at: row.get(8)?,
        author: None,
    })
}

fn book_with_author_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    let mut book = book_from_row(row)?;
    book.author = Some(Author {
        id: row.get(9)?,
        name: row.get(10)?,
        surname: row.get(11)?,
        created_at: row.get(12)?,
    });
    Ok(book)
}
