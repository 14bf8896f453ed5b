use crate::api::types::{AppError, AppState};
use crate::library::ChapterPatch;
use axum::{
    extract::{Path, State},
    Json,
};
use manga_den_common::Chapter;
use serde::Deserialize;
use serde_json::json;

pub async fn list_chapters(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
) -> Result<Json<Vec<Chapter>>, AppError> {
    Ok(Json(state.reader.chapter_list(&manga_id).await?))
}

#[derive(Deserialize)]
pub struct AddChapterRequest {
    pub chapter_number: Option<i64>,
    pub title: Option<String>,
    pub images: Vec<String>,
}

pub async fn add_chapter(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
    Json(payload): Json<AddChapterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let chapter = state
        .library
        .add_chapter(
            &manga_id,
            payload.chapter_number,
            payload.title,
            payload.images,
        )
        .await?;
    Ok(Json(json!({
        "id": chapter.id,
        "chapter_number": chapter.chapter_number,
    })))
}

pub async fn get_chapter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Chapter>, AppError> {
    match state.library.get_chapter(&id).await? {
        Some(chapter) => Ok(Json(chapter)),
        None => Err(AppError::NotFound(format!("chapter {id} not found"))),
    }
}

#[derive(Deserialize)]
pub struct UpdateChapterRequest {
    pub chapter_number: Option<i64>,
    pub title: Option<String>,
    pub images: Option<Vec<String>>,
}

pub async fn update_chapter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateChapterRequest>,
) -> Result<Json<Chapter>, AppError> {
    let chapter = state
        .library
        .update_chapter(
            &id,
            ChapterPatch {
                chapter_number: payload.chapter_number,
                title: payload.title,
                images: payload.images,
            },
        )
        .await?;
    Ok(Json(chapter))
}

pub async fn delete_chapter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.library.delete_chapter(&id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
