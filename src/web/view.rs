//! HTML pages rendered through [upon] templates.
//!
//! Every value interpolated into a page goes through [`escape_html`], which is
//! installed as the engine's default formatter.

use std::fmt::Write;

use serde::Serialize;
use upon::{fmt as upon_fmt, Engine, Value};

use crate::app::Listing;
use crate::error::{ErrorPage, Result};
use crate::models::{Author, Book};

const HOME: &str = "home";
const ADD_AUTHOR: &str = "add_author";
const ADD_BOOK: &str = "add_book";
const ERROR: &str = "error";

#[derive(Serialize)]
struct HomePage<'a> {
    books: Vec<BookRow<'a>>,
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct BookRow<'a> {
    id: i64,
    title: &'a str,
    isbn: &'a str,
    publication_year: i32,
    author: &'a str,
    cover: Option<&'a str>,
}

impl<'a> From<&'a Book> for BookRow<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            id: book.id,
            title: &book.title,
            isbn: &book.isbn,
            publication_year: book.publication_year,
            author: book.author_name.as_deref().unwrap_or("Unknown author"),
            cover: Some(book.cover_image_url.as_str()).filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Serialize)]
struct AuthorPage<'a> {
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct ErrorView<'a> {
    status: String,
    message: &'a str,
}

#[derive(Serialize)]
struct BookFormPage<'a> {
    authors: &'a [Author],
    message: Option<&'a str>,
}

pub struct View {
    engine: Engine<'static>,
}

impl View {
    pub fn new() -> Result<Self> {
        let mut engine = Engine::new();
        engine.set_default_formatter(&escape_html);
        engine.add_template(HOME, include_str!("../../templates/home.html"))?;
        engine.add_template(ADD_AUTHOR, include_str!("../../templates/add_author.html"))?;
        engine.add_template(ADD_BOOK, include_str!("../../templates/add_book.html"))?;
        engine.add_template(ERROR, include_str!("../../templates/error.html"))?;
        Ok(Self { engine })
    }

    pub fn home(&self, listing: &Listing) -> Result<String> {
        let page = HomePage {
            books: listing.books.iter().map(BookRow::from).collect(),
            message: listing.message.as_deref(),
        };
        Ok(self.engine.template(HOME).render(&page).to_string()?)
    }

    pub fn add_author(&self, message: Option<&str>) -> Result<String> {
        let page = AuthorPage { message };
        Ok(self.engine.template(ADD_AUTHOR).render(&page).to_string()?)
    }

    pub fn add_book(&self, authors: &[Author], message: Option<&str>) -> Result<String> {
        let page = BookFormPage { authors, message };
        Ok(self.engine.template(ADD_BOOK).render(&page).to_string()?)
    }

    pub fn error(&self, page: &ErrorPage) -> Result<String> {
        let page = ErrorView {
            status: page.status.to_string(),
            message: &page.message,
        };
        Ok(self.engine.template(ERROR).render(&page).to_string()?)
    }
}

fn escape_html(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
    match value {
        Value::String(s) => {
            for c in s.chars() {
                match c {
                    '&' => f.write_str("&amp;")?,
                    '<' => f.write_str("&lt;")?,
                    '>' => f.write_str("&gt;")?,
                    '"' => f.write_str("&quot;")?,
                    '\'' => f.write_str("&#39;")?,
                    c => f.write_char(c)?,
                }
            }
        }
        v => upon_fmt::default(f, v)?,
    };
    Ok(())
}
