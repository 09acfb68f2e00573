//! Catalog record types: authors and books
//!
//! Plain data carriers read from and written to the database. Display impls
//! produce the one-line console format used by `list` and `search`.

use std::fmt;

/// A book author. Identifier and creation timestamp are assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub created_at: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID : {}, Name : {}, Surname : {}, CreatedAt : {}",
            self.id, self.name, self.surname, self.created_at
        )
    }
}

/// A catalog entry. `author` is populated on every display-facing query;
/// only the internal unfiltered fetch leaves it `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub stock_code: String,
    pub isbn: String,
    pub page_count: i64,
    pub price: f64,
    pub stock_count: i64,
    pub author_id: i64,
    pub created_at: String,
    pub author: Option<Author>,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let author = self
            .author
            .as_ref()
            .map(Author::full_name)
            .unwrap_or_default();
        write!(
            f,
            "ID: {} => Name: {}, Author: {}, Pages: {}, Stock Count: {}, ISBN: {}, Stock Code: {}, CreatedAt: {}",
            self.id,
            self.name,
            author,
            self.page_count,
            self.stock_count,
            self.isbn,
            self.stock_code,
            self.created_at
        )
    }
}
