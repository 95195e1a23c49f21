use serde::Serialize;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub publication_year: i32,
    pub cover_image_url: String,
    pub author_id: Option<i64>,
    // Joined from the author table
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub publication_year: i32,
    pub cover_image_url: String,
    pub author_id: i64,
}

/// A book as submitted through the form, before its cover is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSubmission {
    pub isbn: String,
    pub title: String,
    pub publication_year: i32,
    pub author_id: i64,
}

impl BookSubmission {
    pub fn parse(isbn: &str, title: &str, publication_year: &str, author: &str) -> Result<Self> {
        let publication_year = publication_year.trim().parse().map_err(|_| {
            AppError::InvalidInput(format!(
                "publication_year must be a whole number, got {:?}",
                publication_year
            ))
        })?;
        let author_id = author.trim().parse().map_err(|_| {
            AppError::InvalidInput(format!("author must be an author id, got {:?}", author))
        })?;

        Ok(Self {
            isbn: isbn.trim().to_string(),
            title: title.to_string(),
            publication_year,
            author_id,
        })
    }

    pub fn with_cover(self, cover_image_url: String) -> NewBook {
        NewBook {
            isbn: self.isbn,
            title: self.title,
            publication_year: self.publication_year,
            cover_image_url,
            author_id: self.author_id,
        }
    }
}
