use axum::{
    Router,
    routing::{get, patch},
};

use crate::App;

use super::comment::{
    create::create_comment, delete::delete_comment, get::get_comments, patch::patch_comment,
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route(
            "/{chapter_id}/comments",
            get(get_comments).post(create_comment),
        )
        .route(
            "/{chapter_id}/comments/{id}",
            patch(patch_comment).delete(delete_comment),
        )
}
