use manga_den_common::{Chapter, Manga, MangaKind, MangaStatus, StoreError};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use std::path::PathBuf;
use tokio::fs;

type Result<T> = std::result::Result<T, StoreError>;

/// Typed entity store for manga and chapters, backed by SQLite.
///
/// List-valued fields (`authors`, `genres`, `images`) are stored as JSON text
/// columns and decoded on the way out.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

#[derive(FromRow)]
struct MangaRow {
    id: String,
    title: String,
    authors: String,
    genres: String,
    status: String,
    kind: String,
    rating: f64,
    chapter_count: i64,
    cover_image_url: String,
    created_at: i64,
    updated_at: i64,
}

impl MangaRow {
    fn into_manga(self) -> Result<Manga> {
        let status = MangaStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown manga status {:?}", self.status)))?;
        let kind = MangaKind::parse(&self.kind)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown manga kind {:?}", self.kind)))?;
        Ok(Manga {
            id: self.id,
            title: self.title,
            authors: serde_json::from_str(&self.authors)?,
            genres: serde_json::from_str(&self.genres)?,
            status,
            kind,
            rating: self.rating,
            chapter_count: self.chapter_count,
            cover_image_url: self.cover_image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    manga_id: String,
    chapter_number: i64,
    title: String,
    images: String,
    created_at: i64,
    updated_at: i64,
}

impl ChapterRow {
    fn into_chapter(self) -> Result<Chapter> {
        Ok(Chapter {
            id: self.id,
            manga_id: self.manga_id,
            chapter_number: self.chapter_number,
            title: self.title,
            images: serde_json::from_str(&self.images)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub struct CreateMangaParams {
    pub title: String,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub status: MangaStatus,
    pub kind: MangaKind,
    pub rating: f64,
    pub cover_image_url: String,
}

pub struct CreateChapterParams {
    pub manga_id: String,
    pub chapter_number: i64,
    pub title: String,
    pub images: Vec<String>,
}

impl Store {
    pub async fn new(data_dir: &str) -> Result<Self> {
        let path = PathBuf::from(data_dir);
        if !path.exists() {
            fs::create_dir_all(&path).await?;
        }

        let db_path = path.join("manga.db");
        let db_url = format!("sqlite://{}", db_path.to_string_lossy());

        // Create DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        tracing::info!("manga database at {}", db_path.display());

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// In-memory store for tests. A single connection, so every query sees
    /// the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS manga (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                authors TEXT NOT NULL,
                genres TEXT NOT NULL,
                status TEXT NOT NULL,
                kind TEXT NOT NULL,
                rating REAL NOT NULL,
                chapter_count INTEGER NOT NULL DEFAULT 0,
                cover_image_url TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        // No referential or uniqueness constraints here: the library service
        // owns those invariants, and orphan rows must stay representable so
        // a partial cascade can be swept on a re-run.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chapters (
                id TEXT PRIMARY KEY,
                manga_id TEXT NOT NULL,
                chapter_number INTEGER NOT NULL,
                title TEXT NOT NULL,
                images TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn create_manga(&self, params: CreateMangaParams) -> Result<Manga> {
        let manga = Manga {
            id: uuid::Uuid::new_v4().to_string(),
            title: params.title,
            authors: params.authors,
            genres: params.genres,
            status: params.status,
            kind: params.kind,
            rating: params.rating,
            chapter_count: 0,
            cover_image_url: params.cover_image_url,
            created_at: chrono::Utc::now().timestamp(),
            updated_at: chrono::Utc::now().timestamp(),
        };

        sqlx::query(
            "INSERT INTO manga (id, title, authors, genres, status, kind, rating, chapter_count, cover_image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&manga.id)
        .bind(&manga.title)
        .bind(serde_json::to_string(&manga.authors)?)
        .bind(serde_json::to_string(&manga.genres)?)
        .bind(manga.status.as_str())
        .bind(manga.kind.as_str())
        .bind(manga.rating)
        .bind(manga.chapter_count)
        .bind(&manga.cover_image_url)
        .bind(manga.created_at)
        .bind(manga.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(manga)
    }

    pub async fn get_manga(&self, id: &str) -> Result<Option<Manga>> {
        let row = sqlx::query_as::<_, MangaRow>("SELECT * FROM manga WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(MangaRow::into_manga).transpose()
    }

    pub async fn list_mangas(&self) -> Result<Vec<Manga>> {
        let rows = sqlx::query_as::<_, MangaRow>("SELECT * FROM manga ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(MangaRow::into_manga).collect()
    }

    /// Full-row update. The caller reads, modifies and writes back.
    pub async fn update_manga(&self, manga: &Manga) -> Result<()> {
        sqlx::query(
            "UPDATE manga SET title = ?, authors = ?, genres = ?, status = ?, kind = ?, rating = ?, cover_image_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&manga.title)
        .bind(serde_json::to_string(&manga.authors)?)
        .bind(serde_json::to_string(&manga.genres)?)
        .bind(manga.status.as_str())
        .bind(manga.kind.as_str())
        .bind(manga.rating)
        .bind(&manga.cover_image_url)
        .bind(manga.updated_at)
        .bind(&manga.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Writes the denormalized chapter counter and touches `updated_at`.
    /// Returns false when the manga row no longer exists.
    pub async fn touch_manga(&self, id: &str, chapter_count: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE manga SET chapter_count = ?, updated_at = ? WHERE id = ?")
            .bind(chapter_count)
            .bind(chrono::Utc::now().timestamp())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_manga(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM manga WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_chapter(&self, params: CreateChapterParams) -> Result<Chapter> {
        let chapter = Chapter {
            id: uuid::Uuid::new_v4().to_string(),
            manga_id: params.manga_id,
            chapter_number: params.chapter_number,
            title: params.title,
            images: params.images,
            created_at: chrono::Utc::now().timestamp(),
            updated_at: chrono::Utc::now().timestamp(),
        };

        sqlx::query(
            "INSERT INTO chapters (id, manga_id, chapter_number, title, images, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&chapter.id)
        .bind(&chapter.manga_id)
        .bind(chapter.chapter_number)
        .bind(&chapter.title)
        .bind(serde_json::to_string(&chapter.images)?)
        .bind(chapter.created_at)
        .bind(chapter.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(chapter)
    }

    pub async fn get_chapter(&self, id: &str) -> Result<Option<Chapter>> {
        let row = sqlx::query_as::<_, ChapterRow>("SELECT * FROM chapters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ChapterRow::into_chapter).transpose()
    }

    /// Chapters of a manga, ascending by number. Ties broken by id so the
    /// order is deterministic even on corrupt data.
    pub async fn list_chapters(&self, manga_id: &str) -> Result<Vec<Chapter>> {
        let rows = sqlx::query_as::<_, ChapterRow>(
            "SELECT * FROM chapters WHERE manga_id = ? ORDER BY chapter_number ASC, id ASC",
        )
        .bind(manga_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ChapterRow::into_chapter).collect()
    }

    pub async fn find_chapters_by_number(
        &self,
        manga_id: &str,
        chapter_number: i64,
    ) -> Result<Vec<Chapter>> {
        let rows = sqlx::query_as::<_, ChapterRow>(
            "SELECT * FROM chapters WHERE manga_id = ? AND chapter_number = ? ORDER BY id ASC",
        )
        .bind(manga_id)
        .bind(chapter_number)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ChapterRow::into_chapter).collect()
    }

    pub async fn count_chapters(&self, manga_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chapters WHERE manga_id = ?")
            .bind(manga_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn update_chapter(&self, chapter: &Chapter) -> Result<()> {
        sqlx::query(
            "UPDATE chapters SET chapter_number = ?, title = ?, images = ?, updated_at = ? WHERE id = ?",
        )
        .bind(chapter.chapter_number)
        .bind(&chapter.title)
        .bind(serde_json::to_string(&chapter.images)?)
        .bind(chapter.updated_at)
        .bind(&chapter.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deleting an absent chapter is a no-op.
    pub async fn delete_chapter(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
