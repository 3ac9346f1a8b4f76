use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{App, error::Error, identity::AuthUser};

use super::{CommentRecord, clean_content, store::NewComment};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSubmission {
    content: String,
    parent_id: Option<i32>,
}

#[debug_handler]
pub async fn create_comment(
    State(ctx): State<App>,
    Path(chapter_id): Path<i32>,
    AuthUser(auth_user): AuthUser,
    crate::json::Json(comment): crate::json::Json<CommentSubmission>,
) -> Result<(StatusCode, Json<CommentRecord>), Error> {
    let content = clean_content(&comment.content).map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let record = ctx
        .store
        .create(
            &auth_user,
            NewComment {
                chapter_id,
                parent_id: comment.parent_id,
                content,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}
