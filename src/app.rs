use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::Repository;
use crate::error::Result;
use crate::models::{Author, Book, BookSubmission, NewAuthor};
use crate::services::{CoverLookup, DisabledCover, GoogleBooksClient};

const AUTHOR_ADDED: &str = "Author has successfully added to the database.";
const AUTHOR_FAILED: &str = "Failed to add author to the database.";
const BOOK_ADDED: &str = "Book has successfully been added to the database.";
const BOOK_FAILED: &str = "Failed to add the book to the database.";

/// Books to show on the home page, with an optional notice above them.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub books: Vec<Book>,
    pub message: Option<String>,
}

/// The catalog operations behind every page. Storage failures of a mutation
/// are turned into a message for the user; any other error is returned.
pub struct App {
    repository: Repository,
    covers: Arc<dyn CoverLookup>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = Repository::new(&config.db_path).await?;

        let covers: Arc<dyn CoverLookup> = if config.cover_lookup_enabled {
            Arc::new(GoogleBooksClient::new(
                &config.cover_api_url,
                Duration::from_secs(config.cover_timeout_secs),
            )?)
        } else {
            tracing::info!("Cover lookup disabled");
            Arc::new(DisabledCover)
        };

        Ok(Self::with_parts(repository, covers))
    }

    pub fn with_parts(repository: Repository, covers: Arc<dyn CoverLookup>) -> Self {
        Self { repository, covers }
    }

    pub async fn catalog(&self) -> Result<Vec<Book>> {
        self.repository.get_books_by_title().await
    }

    pub async fn authors(&self) -> Result<Vec<Author>> {
        self.repository.get_authors_by_name().await
    }

    pub async fn search(&self, keyword: &str) -> Result<Listing> {
        let books = self.repository.search_books(keyword).await?;
        let message = books
            .is_empty()
            .then(|| format!("There were no books that match {}.", keyword));
        Ok(Listing { books, message })
    }

    /// Inserts the author and returns the message to show on the form.
    pub async fn add_author(&self, author: NewAuthor) -> Result<String> {
        match self.repository.insert_author(author).await {
            Ok(id) => {
                tracing::info!("Added author {}", id);
                Ok(AUTHOR_ADDED.to_string())
            }
            Err(e) if e.is_database() => {
                tracing::warn!("Rolled back author insert: {}", e);
                Ok(AUTHOR_FAILED.to_string())
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves the cover, inserts the book and returns the refreshed catalog.
    /// A failed cover lookup aborts before anything is written.
    pub async fn add_book(&self, submission: BookSubmission) -> Result<Listing> {
        let cover_image_url = self.covers.cover_url(&submission.title).await?;
        let book = submission.with_cover(cover_image_url);

        let message = match self.repository.insert_book(book).await {
            Ok(id) => {
                tracing::info!("Added book {}", id);
                BOOK_ADDED.to_string()
            }
            Err(e) if e.is_database() => {
                tracing::warn!("Rolled back book insert: {}", e);
                BOOK_FAILED.to_string()
            }
            Err(e) => return Err(e),
        };

        Ok(Listing {
            books: self.catalog().await?,
            message: Some(message),
        })
    }

    pub async fn delete_book(&self, id: i64) -> Result<Listing> {
        let message = match self.repository.delete_book(id).await {
            Ok(true) => {
                tracing::info!("Deleted book {}", id);
                format!("Book {} has been deleted from the database.", id)
            }
            Ok(false) => format!("Book {} not found.", id),
            Err(e) if e.is_database() => {
                tracing::warn!("Rolled back delete of book {}: {}", id, e);
                format!("Failed to delete book {}.", id)
            }
            Err(e) => return Err(e),
        };

        Ok(Listing {
            books: self.catalog().await?,
            message: Some(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::cover::{FailingCover, FixedCover};

    async fn app_with_cover(cover: &str) -> App {
        let repository = Repository::in_memory().await.unwrap();
        App::with_parts(repository, Arc::new(FixedCover(cover.to_string())))
    }

    async fn add_austen(app: &App) -> i64 {
        let message = app
            .add_author(NewAuthor::parse("Jane Austen", "1775-12-16", None).unwrap())
            .await
            .unwrap();
        assert_eq!(message, AUTHOR_ADDED);
        app.authors().await.unwrap()[0].id
    }

    fn emma(author_id: i64) -> BookSubmission {
        BookSubmission::parse("9780141439587", "Emma", "1815", &author_id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_added_book_is_listed_with_author() {
        let app = app_with_cover("http://covers/emma.jpg").await;
        let author_id = add_austen(&app).await;

        let listing = app.add_book(emma(author_id)).await.unwrap();
        assert_eq!(listing.message.as_deref(), Some(BOOK_ADDED));
        assert_eq!(listing.books.len(), 1);
        assert_eq!(listing.books[0].title, "Emma");
        assert_eq!(listing.books[0].author_name.as_deref(), Some("Jane Austen"));
        assert_eq!(listing.books[0].cover_image_url, "http://covers/emma.jpg");
    }

    #[tokio::test]
    async fn test_book_without_cover_stores_empty_url() {
        let app = app_with_cover("").await;
        let author_id = add_austen(&app).await;

        let listing = app.add_book(emma(author_id)).await.unwrap();
        assert_eq!(listing.message.as_deref(), Some(BOOK_ADDED));
        assert_eq!(listing.books[0].cover_image_url, "");
    }

    #[tokio::test]
    async fn test_unknown_author_reports_failure() {
        let app = app_with_cover("").await;
        add_austen(&app).await;

        let listing = app.add_book(emma(999)).await.unwrap();
        assert_eq!(listing.message.as_deref(), Some(BOOK_FAILED));
        assert!(listing.books.is_empty());
    }

    #[tokio::test]
    async fn test_search_reports_missing_keyword() {
        let app = app_with_cover("").await;
        let author_id = add_austen(&app).await;
        app.add_book(emma(author_id)).await.unwrap();
        let mut persuasion = emma(author_id);
        persuasion.title = "Persuasion".to_string();
        app.add_book(persuasion).await.unwrap();

        let listing = app.search("Persu").await.unwrap();
        assert_eq!(listing.message, None);
        assert_eq!(listing.books.len(), 1);
        assert_eq!(listing.books[0].title, "Persuasion");

        let listing = app.search("Dracula").await.unwrap();
        assert!(listing.books.is_empty());
        assert_eq!(
            listing.message.as_deref(),
            Some("There were no books that match Dracula.")
        );
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing_book() {
        let app = app_with_cover("").await;
        let author_id = add_austen(&app).await;
        let id = app.add_book(emma(author_id)).await.unwrap().books[0].id;

        let listing = app.delete_book(id).await.unwrap();
        assert_eq!(
            listing.message,
            Some(format!("Book {} has been deleted from the database.", id))
        );
        assert!(listing.books.is_empty());

        let listing = app.delete_book(id).await.unwrap();
        assert_eq!(listing.message, Some(format!("Book {} not found.", id)));
        assert!(listing.books.is_empty());
    }

    #[tokio::test]
    async fn test_failed_author_insert_is_rolled_back() {
        let app = app_with_cover("").await;
        add_austen(&app).await;
        app.repository
            .execute_batch(
                "CREATE TRIGGER reject_author BEFORE INSERT ON author
                 BEGIN SELECT RAISE(ABORT, 'author table is read-only'); END;",
            )
            .await
            .unwrap();

        let message = app
            .add_author(NewAuthor::parse("Mary Shelley", "1797-08-30", None).unwrap())
            .await
            .unwrap();
        assert_eq!(message, AUTHOR_FAILED);

        let names: Vec<_> = app
            .authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Jane Austen"]);
    }

    #[tokio::test]
    async fn test_failed_delete_is_rolled_back() {
        let app = app_with_cover("").await;
        let author_id = add_austen(&app).await;
        let id = app.add_book(emma(author_id)).await.unwrap().books[0].id;
        app.repository
            .execute_batch(
                "CREATE TRIGGER keep_books BEFORE DELETE ON book
                 BEGIN SELECT RAISE(ABORT, 'books cannot be deleted'); END;",
            )
            .await
            .unwrap();

        let listing = app.delete_book(id).await.unwrap();
        assert_eq!(listing.message, Some(format!("Failed to delete book {}.", id)));
        assert_eq!(listing.books.len(), 1);
        assert_eq!(listing.books[0].id, id);
    }

    #[tokio::test]
    async fn test_failed_cover_lookup_writes_nothing() {
        let repository = Repository::in_memory().await.unwrap();
        let app = App::with_parts(repository, Arc::new(FailingCover));
        let author_id = add_austen(&app).await;

        let err = app.add_book(emma(author_id)).await.unwrap_err();
        assert!(matches!(err, AppError::CoverLookup(_)));
        assert!(!err.is_database());
        assert!(app.catalog().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authors_are_ordered_by_name() {
        let app = app_with_cover("").await;
        for (name, born) in [("Virginia Woolf", "1882-01-25"), ("Charlotte Bronte", "1816-04-21")] {
            app.add_author(NewAuthor::parse(name, born, None).unwrap())
                .await
                .unwrap();
        }

        let names: Vec<_> = app
            .authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Charlotte Bronte", "Virginia Woolf"]);
    }
}
