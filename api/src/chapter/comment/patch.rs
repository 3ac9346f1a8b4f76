use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{App, error::Error, identity::AuthUser};

use super::{CommentRecord, clean_content};

#[derive(Deserialize)]
pub struct CommentPatch {
    content: String,
}

#[debug_handler]
pub async fn patch_comment(
    State(ctx): State<App>,
    Path((chapter_id, id)): Path<(i32, i32)>,
    AuthUser(auth_user): AuthUser,
    crate::json::Json(comment): crate::json::Json<CommentPatch>,
) -> Result<Json<CommentRecord>, Error> {
    let content = clean_content(&comment.content).map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    if ctx.store.get(id).await?.chapter_id != chapter_id {
        return Err(("Comment does not belong to this chapter", StatusCode::NOT_FOUND))?;
    }

    let record = ctx.store.update_content(auth_user.id, id, content).await?;

    Ok(Json(record))
}
