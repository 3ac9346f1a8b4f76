use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod chapter;
pub mod config;
pub mod error;
pub mod identity;
pub mod json;

use chapter::comment::store::CommentStore;

#[derive(Clone, Default)]
pub struct App {
    pub store: Arc<CommentStore>,
}

pub fn router(app: App) -> Router {
    Router::new()
        .nest("/chapters", chapter::routes::route())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
