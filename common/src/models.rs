use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MangaStatus {
    Ongoing,
    Completed,
    Hiatus,
}

impl MangaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MangaStatus::Ongoing => "ongoing",
            MangaStatus::Completed => "completed",
            MangaStatus::Hiatus => "hiatus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ongoing" => Some(MangaStatus::Ongoing),
            "completed" => Some(MangaStatus::Completed),
            "hiatus" => Some(MangaStatus::Hiatus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MangaKind {
    Manga,
    Manhwa,
    Manhua,
    Novel,
}

impl MangaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MangaKind::Manga => "manga",
            MangaKind::Manhwa => "manhwa",
            MangaKind::Manhua => "manhua",
            MangaKind::Novel => "novel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manga" => Some(MangaKind::Manga),
            "manhwa" => Some(MangaKind::Manhwa),
            "manhua" => Some(MangaKind::Manhua),
            "novel" => Some(MangaKind::Novel),
            _ => None,
        }
    }
}

/// A manga series. `chapter_count` is denormalized: the library service keeps
/// it in step with the chapter rows after every add/delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manga {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub status: MangaStatus,
    #[serde(rename = "type")]
    pub kind: MangaKind,
    pub rating: f64,
    pub chapter_count: i64,
    pub cover_image_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A chapter of a manga. `images` is the ordered page list; a chapter with no
/// pages is invalid and is rejected before it ever reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub manga_id: String,
    pub chapter_number: i64,
    pub title: String,
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
