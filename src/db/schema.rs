pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- author table
CREATE TABLE IF NOT EXISTS author (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    birth_date TEXT NOT NULL,
    date_of_death TEXT
);

CREATE INDEX IF NOT EXISTS idx_author_name ON author(name);

-- book table
CREATE TABLE IF NOT EXISTS book (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn VARCHAR(13) CHECK (isbn IS NULL OR length(isbn) <= 13),
    title TEXT,
    publication_year INTEGER,
    cover_image_url TEXT,
    author_id INTEGER REFERENCES author(id)
);

CREATE INDEX IF NOT EXISTS idx_book_title ON book(title);
CREATE INDEX IF NOT EXISTS idx_book_author_id ON book(author_id);
"#;
