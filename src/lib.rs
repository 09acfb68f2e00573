//! Bookstore - CLI catalog and inventory manager
//!
//! Manages a book catalog in a SQLite database: keyword search, listing,
//! stock decrements on purchase and catalog deletion. The catalog can be
//! seeded from a semicolon-delimited csv export.

pub mod book;
pub mod commands;
pub mod database;
pub mod error;
pub mod seed;

pub use book::{Author, Book};
pub use database::BookStore;
pub use error::{BookstoreError, Result};
