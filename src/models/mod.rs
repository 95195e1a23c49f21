mod author;
mod book;

pub use author::{Author, NewAuthor, DATE_FORMAT};
pub use book::{Book, BookSubmission, NewBook};
