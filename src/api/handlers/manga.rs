use crate::api::types::{AppError, AppState};
use crate::library::{MangaPatch, NewManga};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use manga_den_common::{Manga, MangaKind, MangaStatus};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub genre: Option<String>,
}

pub async fn list_mangas(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Manga>>, AppError> {
    let mangas = state
        .library
        .list_mangas(query.q.as_deref(), query.genre.as_deref())
        .await?;
    Ok(Json(mangas))
}

#[derive(Deserialize)]
pub struct CreateMangaRequest {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<MangaStatus>,
    #[serde(rename = "type")]
    pub kind: Option<MangaKind>,
    pub rating: Option<f64>,
    pub cover_image_url: Option<String>,
}

pub async fn create_manga(
    State(state): State<AppState>,
    Json(payload): Json<CreateMangaRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let manga = state
        .library
        .create_manga(NewManga {
            title: payload.title,
            authors: payload.authors,
            genres: payload.genres,
            status: payload.status.unwrap_or(MangaStatus::Ongoing),
            kind: payload.kind.unwrap_or(MangaKind::Manga),
            rating: payload.rating.unwrap_or(0.0),
            cover_image_url: payload.cover_image_url.unwrap_or_default(),
        })
        .await?;
    Ok(Json(json!({ "id": manga.id })))
}

pub async fn get_manga(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Manga>, AppError> {
    Ok(Json(state.library.get_manga(&id).await?))
}

#[derive(Deserialize)]
pub struct UpdateMangaRequest {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub status: Option<MangaStatus>,
    #[serde(rename = "type")]
    pub kind: Option<MangaKind>,
    pub rating: Option<f64>,
    pub cover_image_url: Option<String>,
}

pub async fn update_manga(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMangaRequest>,
) -> Result<Json<Manga>, AppError> {
    let manga = state
        .library
        .update_manga(
            &id,
            MangaPatch {
                title: payload.title,
                authors: payload.authors,
                genres: payload.genres,
                status: payload.status,
                kind: payload.kind,
                rating: payload.rating,
                cover_image_url: payload.cover_image_url,
            },
        )
        .await?;
    Ok(Json(manga))
}

pub async fn delete_manga(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.library.delete_manga(&id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
