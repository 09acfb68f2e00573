//! Bulk catalog seeding from a semicolon-delimited csv export
//!
//! Expected columns, after a header row that is discarded:
//! name;stock_code;isbn;page_count;price;stock_count;author_name;author_surname
//!
//! Numeric cells that fail to parse default to zero. The defaults are
//! counted and reported rather than silently swallowed, so a bad export
//! shows up in the logs and in the returned report.

use crate::database::BookStore;
use crate::error::{BookstoreError, Result};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// One parsed seed row: a book together with its author's name parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRecord {
    pub name: String,
    pub stock_code: String,
    pub isbn: String,
    pub page_count: i64,
    pub price: f64,
    pub stock_count: i64,
    pub author_name: String,
    pub author_surname: String,
}

/// Outcome of a seeding run.
#[derive(Debug)]
pub struct SeedReport {
    /// Books newly inserted
    pub inserted: usize,
    /// Rows skipped because a book with that name already exists
    pub skipped_existing: usize,
    /// Numeric cells that failed to parse and were defaulted to zero
    pub defaulted_fields: usize,
}

/// Read and seed in one step: parse `path` and upsert every row into the
/// catalog with first-or-create semantics. Re-running with the same file
/// leaves existing records untouched.
pub fn seed_from_file<P: AsRef<Path>>(store: &mut BookStore, path: P) -> Result<SeedReport> {
    let (records, defaulted_fields) = read_seed_file(path)?;
    let (inserted, skipped_existing) = store.insert_seed_records(&records)?;

    if defaulted_fields > 0 {
        log::warn!(
            "{} numeric cells could not be parsed and were defaulted to zero",
            defaulted_fields
        );
    }

    Ok(SeedReport {
        inserted,
        skipped_existing,
        defaulted_fields,
    })
}

/// Parse the seed file into records.
///
/// Fails if the file cannot be opened or a row is structurally malformed
/// (wrong column count); per-cell numeric failures are non-fatal and are
/// returned as a count alongside the records.
pub fn read_seed_file<P: AsRef<Path>>(path: P) -> Result<(Vec<SeedRecord>, usize)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BookstoreError::SeedFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(file);

    let mut records = Vec::new();
    let mut defaulted = 0;
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1, first data row is line 2.
        let line = index + 2;
        records.push(parse_row(&row, line, &mut defaulted));
    }

    log::info!(
        "Read {} seed rows from {} ({} numeric cells defaulted)",
        records.len(),
        path.display(),
        defaulted
    );
    Ok((records, defaulted))
}

fn parse_row(row: &StringRecord, line: usize, defaulted: &mut usize) -> SeedRecord {
    // Price cells may carry a comma decimal separator, as in other exports.
    let price_cell = cell(row, 4).replace(',', ".");
    SeedRecord {
        name: cell(row, 0),
        stock_code: cell(row, 1),
        isbn: cell(row, 2),
        page_count: parse_or_zero(&cell(row, 3), line, "page count", defaulted),
        price: parse_or_zero(&price_cell, line, "price", defaulted),
        stock_count: parse_or_zero(&cell(row, 5), line, "stock count", defaulted),
        author_name: cell(row, 6),
        author_surname: cell(row, 7),
    }
}

fn cell(row: &StringRecord, index: usize) -> String {
    row.get(index).unwrap_or("").trim().to_string()
}

fn parse_or_zero<T: FromStr + Default>(
    raw: &str,
    line: usize,
    column: &str,
    defaulted: &mut usize,
) -> T {
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!(
                "Line {}: {} '{}' is not numeric, defaulting to zero",
                line,
                column,
                raw
            );
            *defaulted += 1;
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_seed_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const HEADER: &str =
        "name;stock_code;isbn;page_count;price;stock_count;author_name;author_surname";

    fn test_store() -> BookStore {
        let store = BookStore::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn reads_rows_and_discards_header() {
        let file = write_seed_file(&format!(
            "{HEADER}\nDune;SK1;978-0;412;15.99;3;Frank;Herbert\nHyperion;SK2;978-1;482;12.50;2;Dan;Simmons"
        ));

        let (records, defaulted) = read_seed_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(defaulted, 0);
        assert_eq!(records[0].name, "Dune");
        assert_eq!(records[0].page_count, 412);
        assert_eq!(records[0].stock_count, 3);
        assert_eq!(records[1].author_surname, "Simmons");
    }

    #[test]
    fn price_accepts_comma_decimal_separator() {
        let file = write_seed_file(&format!("{HEADER}\nDune;SK1;978-0;412;15,99;3;Frank;Herbert"));

        let (records, defaulted) = read_seed_file(file.path()).unwrap();
        assert_eq!(defaulted, 0);
        assert!((records[0].price - 15.99).abs() < 1e-9);
    }

    #[test]
    fn bad_numeric_cells_default_to_zero_and_are_counted() {
        let file = write_seed_file(&format!(
            "{HEADER}\nDune;SK1;978-0;lots;free;3;Frank;Herbert"
        ));

        let (records, defaulted) = read_seed_file(file.path()).unwrap();
        assert_eq!(defaulted, 2);
        assert_eq!(records[0].page_count, 0);
        assert_eq!(records[0].price, 0.0);
        assert_eq!(records[0].stock_count, 3);
    }

    #[test]
    fn wrong_column_count_is_a_structural_error() {
        let file = write_seed_file(&format!("{HEADER}\nDune;SK1;978-0"));

        match read_seed_file(file.path()) {
            Err(BookstoreError::Csv(_)) => {}
            other => panic!("expected Csv error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_file_error() {
        match read_seed_file("/no/such/seed-file.csv") {
            Err(BookstoreError::SeedFile { .. }) => {}
            other => panic!("expected SeedFile error, got {:?}", other),
        }
    }

    #[test]
    fn double_seed_does_not_duplicate_rows() {
        let file = write_seed_file(&format!(
            "{HEADER}\nDune;SK1;978-0;412;15.99;3;Frank;Herbert\nHyperion;SK2;978-1;482;12.50;2;Dan;Simmons"
        ));
        let mut store = test_store();

        let report = seed_from_file(&mut store, file.path()).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped_existing, 0);

        let report = seed_from_file(&mut store, file.path()).unwrap();
        assert_eq!(report.inserted, 0);
        assert_eq!(report.skipped_existing, 2);

        assert_eq!(store.find_all_books().unwrap().len(), 2);
    }

    #[test]
    fn seeded_book_round_trips_through_lookup() {
        let file = write_seed_file(&format!("{HEADER}\nDune;SK1;978-0;412;15.99;3;Frank;Herbert"));
        let mut store = test_store();
        seed_from_file(&mut store, file.path()).unwrap();

        let book = store
            .get_book_by_name("Dune")
            .unwrap()
            .expect("seeded book exists");
        assert_eq!(book.stock_count, 3);
        assert_eq!(book.page_count, 412);
        assert_eq!(
            book.author.as_ref().unwrap().full_name(),
            "Frank Herbert"
        );
    }
}
