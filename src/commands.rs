//! Console command parsing and handlers
//!
//! Command words are matched case-insensitively. Handlers take the store
//! explicitly and return the text to print; the binary decides what to do
//! with it. Errors carry their own console message via Display.

use crate::database::BookStore;
use crate::error::{BookstoreError, Result};

const HELP_TEXT: &str = "Command List
-----------------
Search Operation: \"search {keyword}\"
List Operation: \"list\"
Buy Operation: \"buy {bookId} {count}\"
Delete Operation: \"delete {bookId}\"
-----------------";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// No command given: print the command list.
    Help,
    /// An incomplete or unrecognized command, with the prompt to print.
    Usage(&'static str),
    List,
    Search { query: String },
    Buy { book_id: i64, count: i64 },
    Delete { book_id: i64 },
}

impl Command {
    /// Parse command words (everything after the program's own flags).
    ///
    /// Fails only when an argument that must be an integer is not one;
    /// wrong arities come back as `Usage` prompts, matching the console
    /// contract of printing a message and exiting cleanly.
    pub fn parse(args: &[String]) -> Result<Command> {
        let lower: Vec<String> = args.iter().map(|arg| arg.to_lowercase()).collect();

        let Some(command) = lower.first() else {
            return Ok(Command::Help);
        };

        match command.as_str() {
            "search" => {
                if lower.len() < 2 {
                    Ok(Command::Usage("Enter a book name to search!"))
                } else {
                    Ok(Command::Search {
                        query: lower[1..].join(" "),
                    })
                }
            }
            "list" => Ok(Command::List),
            "buy" => {
                if lower.len() != 3 {
                    return Ok(Command::Usage("Enter a book id and amount!"));
                }
                Ok(Command::Buy {
                    book_id: parse_int(&lower[1])?,
                    count: parse_int(&lower[2])?,
                })
            }
            "delete" => {
                if lower.len() != 2 {
                    return Ok(Command::Usage("Enter a book id to delete!"));
                }
                Ok(Command::Delete {
                    book_id: parse_int(&lower[1])?,
                })
            }
            _ => Ok(Command::Usage("Unknown command!")),
        }
    }
}

fn parse_int(arg: &str) -> Result<i64> {
    arg.parse()
        .map_err(|_| BookstoreError::InvalidArgument(arg.to_string()))
}

/// Execute a command against the store and render the console output.
pub fn run(store: &mut BookStore, command: Command) -> Result<String> {
    match command {
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Usage(prompt) => Ok(prompt.to_string()),
        Command::List => {
            let books = store.get_all_books()?;
            let mut out = String::from("List of books:");
            for book in &books {
                out.push('\n');
                out.push_str(&book.to_string());
            }
            Ok(out)
        }
        Command::Search { query } => {
            let books = store.find_books_by_query(&query)?;
            Ok(books
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Buy { book_id, count } => {
            if count <= 0 {
                return Err(BookstoreError::NonPositiveCount(count));
            }
            store.decrement_stock(book_id, count)?;
            Ok("Operation completed successfully!".to_string())
        }
        Command::Delete { book_id } => {
            store.delete_book(book_id)?;
            Ok("Operation completed successfully!".to_string())
        }
    }
}
