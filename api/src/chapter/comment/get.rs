use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{App, error::Error};

use super::{
    CommentNode,
    tree::{SortOrder, build_comment_tree, count_nodes, redact_deleted, sort_tree},
};

#[derive(Deserialize)]
pub struct Queries {
    sort: Option<SortOrder>,
}

pub async fn get_comments(
    State(ctx): State<App>,
    Path(chapter_id): Path<i32>,
    q: Query<Queries>,
) -> Result<Json<Vec<CommentNode>>, Error> {
    let sort = q.sort.unwrap_or_default();

    let rows = ctx.store.list_by_chapter(chapter_id).await;
    let total = rows.len();

    let mut forest = build_comment_tree(rows);
    sort_tree(&mut forest, sort);
    redact_deleted(&mut forest);

    debug_assert_eq!(count_nodes(&forest), total);
    tracing::debug!(chapter_id, total, roots = forest.len(), ?sort, "Built comment tree");

    Ok(Json(forest))
}
