use axum::extract::{Path, State};
use axum::response::Html;
use axum::Form;
use serde::Deserialize;

use crate::app::Listing;
use crate::error::Result;
use crate::models::{BookSubmission, NewAuthor};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    search: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorForm {
    name: String,
    birthdate: String,
    #[serde(default)]
    date_of_death: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookForm {
    title: String,
    isbn: String,
    publication_year: String,
    author: String,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let listing = Listing {
        books: state.app.catalog().await?,
        message: None,
    };
    Ok(Html(state.view.home(&listing)?))
}

pub async fn search_book(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>> {
    let listing = state.app.search(&form.search).await?;
    Ok(Html(state.view.home(&listing)?))
}

pub async fn author_form(State(state): State<AppState>) -> Result<Html<String>> {
    Ok(Html(state.view.add_author(None)?))
}

pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Result<Html<String>> {
    let author = NewAuthor::parse(&form.name, &form.birthdate, form.date_of_death.as_deref())?;
    let message = state.app.add_author(author).await?;
    Ok(Html(state.view.add_author(Some(&message))?))
}

pub async fn book_form(State(state): State<AppState>) -> Result<Html<String>> {
    let authors = state.app.authors().await?;
    Ok(Html(state.view.add_book(&authors, None)?))
}

pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> Result<Html<String>> {
    let submission =
        BookSubmission::parse(&form.isbn, &form.title, &form.publication_year, &form.author)?;
    let listing = state.app.add_book(submission).await?;
    Ok(Html(state.view.home(&listing)?))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    let listing = state.app.delete_book(id).await?;
    Ok(Html(state.view.home(&listing)?))
}
