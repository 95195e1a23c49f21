mod handler;
mod view;

use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::error::{ErrorPage, Result};

pub use view::View;

/// Shared, cloneable handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub view: Arc<View>,
}

impl AppState {
    pub fn new(app: App) -> Result<Self> {
        Ok(Self {
            app: Arc::new(app),
            view: Arc::new(View::new()?),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::index))
        .route("/search_book", post(handler::search_book))
        .route("/authors", get(handler::author_form).post(handler::create_author))
        .route("/books", get(handler::book_form).post(handler::create_book))
        .route("/book/:id/delete", get(handler::delete_book))
        .layer(middleware::map_response_with_state(state.clone(), render_error_page))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Replaces the plain-text body of a failed request with the error page.
async fn render_error_page(State(state): State<AppState>, mut response: Response) -> Response {
    let Some(page) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };
    match state.view.error(&page) {
        Ok(html) => (page.status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            response
        }
    }
}
