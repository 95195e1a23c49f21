use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Author, Book, NewAuthor, NewBook, DATE_FORMAT};

use super::schema::SCHEMA;

const BOOK_COLUMNS: &str = r#"b.id, b.isbn, b.title, b.publication_year, b.cover_image_url,
                              b.author_id, a.name AS author_name
                       FROM book b
                       LEFT JOIN author a ON a.id = b.author_id"#;

/// Storage access for the catalog. Each mutation runs in its own
/// transaction; a transaction dropped before `commit` is rolled back.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    /// Runs raw SQL against the connection, e.g. to install failure triggers.
    #[cfg(test)]
    pub async fn execute_batch(&self, sql: &'static str) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute_batch(sql)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Author operations

    pub async fn insert_author(&self, author: NewAuthor) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO author (name, birth_date, date_of_death) VALUES (?1, ?2, ?3)",
                    params![
                        author.name,
                        author.birth_date.to_string(),
                        author.date_of_death.map(|d| d.to_string()),
                    ],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await?;
        Ok(id)
    }

    pub async fn get_authors_by_name(&self) -> Result<Vec<Author>> {
        let authors = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, birth_date, date_of_death FROM author ORDER BY name ASC",
                )?;
                let authors = stmt
                    .query_map([], author_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(authors)
            })
            .await?;
        Ok(authors)
    }

    // Book operations

    pub async fn insert_book(&self, book: NewBook) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    r#"INSERT INTO book (isbn, title, publication_year, cover_image_url, author_id)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![
                        book.isbn,
                        book.title,
                        book.publication_year,
                        book.cover_image_url,
                        book.author_id,
                    ],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await?;
        Ok(id)
    }

    pub async fn get_books_by_title(&self) -> Result<Vec<Book>> {
        let books = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} ORDER BY b.title ASC",
                    BOOK_COLUMNS
                ))?;
                let books = stmt
                    .query_map([], book_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(books)
            })
            .await?;
        Ok(books)
    }

    /// Books whose title contains `keyword`. No ordering is applied.
    pub async fn search_books(&self, keyword: &str) -> Result<Vec<Book>> {
        let keyword = keyword.to_string();
        let books = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} WHERE b.title LIKE '%' || ?1 || '%'",
                    BOOK_COLUMNS
                ))?;
                let books = stmt
                    .query_map(params![keyword], book_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(books)
            })
            .await?;
        Ok(books)
    }

    /// Deletes the book if it exists. Returns whether a book was found.
    pub async fn delete_book(&self, id: i64) -> Result<bool> {
        let found = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let found = tx
                    .query_row("SELECT id FROM book WHERE id = ?1", params![id], |row| {
                        row.get::<_, i64>(0)
                    })
                    .optional()?
                    .is_some();
                if found {
                    tx.execute("DELETE FROM book WHERE id = ?1", params![id])?;
                }
                tx.commit()?;
                Ok(found)
            })
            .await?;
        Ok(found)
    }
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        })
        .transpose()
}

fn author_from_row(row: &Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        birth_date: date_column(row, 2)?
            .ok_or_else(|| rusqlite::Error::InvalidColumnType(2, "birth_date".to_string(), Type::Null))?,
        date_of_death: date_column(row, 3)?,
    })
}

fn book_from_row(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        isbn: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        publication_year: row.get::<_, Option<i32>>(3)?.unwrap_or_default(),
        cover_image_url: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        author_id: row.get(5)?,
        author_name: row.get(6)?,
    })
}
