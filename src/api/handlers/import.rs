use crate::api::types::{AppError, AppState};
use crate::import::{auto_detect, parse_json, parse_multi_chapter_block, parse_url_list};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    Urls,
    Json,
    #[default]
    Auto,
    /// Blank-line-separated blocks, one chapter per block.
    Multi,
}

#[derive(Deserialize)]
pub struct BulkImportRequest {
    pub text: String,
    #[serde(default)]
    pub mode: ImportMode,
    pub start_chapter: Option<i64>,
    pub title_prefix: Option<String>,
}

/// Imports pasted page-URL data as one or more chapters of a manga.
pub async fn bulk_import(
    State(state): State<AppState>,
    Path(manga_id): Path<String>,
    Json(payload): Json<BulkImportRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let start = match payload.start_chapter {
        Some(n) if n >= 1 => Some(n),
        Some(n) => {
            return Err(AppError::BadRequest(format!(
                "start_chapter {n} must be positive"
            )))
        }
        None => None,
    };
    let start = match start {
        Some(n) => n,
        None => state.library.next_chapter_number(&manga_id).await?,
    };
    let prefix = payload.title_prefix.as_deref();

    let imported = match payload.mode {
        ImportMode::Urls => {
            let images = parse_url_list(&payload.text);
            vec![import_one(&state, &manga_id, start, prefix, images).await?]
        }
        ImportMode::Json => {
            let images = parse_json(&payload.text)?;
            vec![import_one(&state, &manga_id, start, prefix, images).await?]
        }
        ImportMode::Auto => {
            let images = auto_detect(&payload.text)?;
            vec![import_one(&state, &manga_id, start, prefix, images).await?]
        }
        ImportMode::Multi => {
            let blocks = parse_multi_chapter_block(&payload.text)?;
            if blocks.is_empty() {
                return Err(AppError::BadRequest("no image urls found".to_string()));
            }
            let mut chapters = Vec::new();
            for (offset, images) in blocks {
                let number = start + offset as i64;
                chapters.push(import_one(&state, &manga_id, number, prefix, images).await?);
            }
            chapters
        }
    };

    Ok(Json(json!({ "chapters": imported })))
}

/// Creates one chapter at the given number from an already-parsed image list.
async fn import_one(
    state: &AppState,
    manga_id: &str,
    number: i64,
    title_prefix: Option<&str>,
    images: Vec<String>,
) -> Result<Value, AppError> {
    if images.is_empty() {
        return Err(AppError::BadRequest("no image urls found".to_string()));
    }

    let title = title_prefix.map(|prefix| format!("{prefix} {number}"));
    let chapter = state
        .library
        .add_chapter(manga_id, Some(number), title, images)
        .await?;

    Ok(json!({
        "id": chapter.id,
        "chapter_number": chapter.chapter_number,
        "pages": chapter.images.len(),
    }))
}
