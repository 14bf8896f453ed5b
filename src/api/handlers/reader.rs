use crate::api::types::{AppError, AppState};
use crate::reader::{next_chapter_number, previous_chapter_number};
use axum::{
    extract::{Path, State},
    Json,
};
use manga_den_common::{Chapter, Manga};
use serde::Serialize;

#[derive(Serialize)]
pub struct ReadChapterResponse {
    pub manga: Manga,
    pub chapter: Chapter,
    /// None at chapter 1.
    pub previous_chapter: Option<i64>,
    /// Always present; the target may not exist yet.
    pub next_chapter: i64,
}

pub async fn read_chapter(
    State(state): State<AppState>,
    Path((manga_id, chapter_number)): Path<(String, i64)>,
) -> Result<Json<ReadChapterResponse>, AppError> {
    let (manga, chapter) = state.reader.resolve(&manga_id, chapter_number).await?;

    Ok(Json(ReadChapterResponse {
        previous_chapter: previous_chapter_number(chapter.chapter_number),
        next_chapter: next_chapter_number(chapter.chapter_number),
        manga,
        chapter,
    }))
}
