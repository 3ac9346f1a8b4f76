use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{App, error::Error, identity::AuthUser};

#[debug_handler]
pub async fn delete_comment(
    State(ctx): State<App>,
    Path((chapter_id, id)): Path<(i32, i32)>,
    AuthUser(auth_user): AuthUser,
) -> Result<StatusCode, Error> {
    if ctx.store.get(id).await?.chapter_id != chapter_id {
        return Err(("Comment does not belong to this chapter", StatusCode::NOT_FOUND))?;
    }

    ctx.store.soft_delete(auth_user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
