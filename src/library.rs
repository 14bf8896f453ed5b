use futures::future::join_all;
use manga_den_common::{Chapter, EntityKind, LibraryError, Manga, MangaKind, MangaStatus};
use manga_den_storage::{CreateChapterParams, CreateMangaParams, Store};

type Result<T> = std::result::Result<T, LibraryError>;

/// Admin-facing service over the store. Owns the invariants the store itself
/// does not enforce: a manga's denormalized chapter counter, chapter number
/// uniqueness, non-empty page lists, and cascade deletes.
#[derive(Clone)]
pub struct Library {
    store: Store,
}

pub struct NewManga {
    pub title: String,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub status: MangaStatus,
    pub kind: MangaKind,
    pub rating: f64,
    pub cover_image_url: String,
}

#[derive(Default)]
pub struct MangaPatch {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub status: Option<MangaStatus>,
    pub kind: Option<MangaKind>,
    pub rating: Option<f64>,
    pub cover_image_url: Option<String>,
}

#[derive(Default)]
pub struct ChapterPatch {
    pub chapter_number: Option<i64>,
    pub title: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Drops blank and whitespace-only entries, keeping the original order.
fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(LibraryError::Validation("title must not be empty".into()));
    }
    Ok(())
}

fn check_rating(rating: f64) -> Result<()> {
    if !(0.0..=10.0).contains(&rating) {
        return Err(LibraryError::Validation(format!(
            "rating {rating} outside 0.0-10.0"
        )));
    }
    Ok(())
}

impl Library {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_manga(&self, params: NewManga) -> Result<Manga> {
        check_title(&params.title)?;
        check_rating(params.rating)?;

        let manga = self
            .store
            .create_manga(CreateMangaParams {
                title: params.title,
                authors: params.authors,
                genres: params.genres,
                status: params.status,
                kind: params.kind,
                rating: params.rating,
                cover_image_url: params.cover_image_url,
            })
            .await?;
        Ok(manga)
    }

    pub async fn get_manga(&self, id: &str) -> Result<Manga> {
        self.store
            .get_manga(id)
            .await?
            .ok_or_else(|| LibraryError::not_found(EntityKind::Manga, id))
    }

    /// Catalog listing with optional title-substring and genre filters,
    /// applied as a linear scan over the fetched list.
    pub async fn list_mangas(&self, q: Option<&str>, genre: Option<&str>) -> Result<Vec<Manga>> {
        let mut mangas = self.store.list_mangas().await?;

        if let Some(q) = q {
            let needle = q.to_lowercase();
            mangas.retain(|m| m.title.to_lowercase().contains(&needle));
        }
        if let Some(genre) = genre {
            mangas.retain(|m| m.genres.iter().any(|g| g == genre));
        }
        Ok(mangas)
    }

    pub async fn update_manga(&self, id: &str, patch: MangaPatch) -> Result<Manga> {
        let mut manga = self.get_manga(id).await?;

        if let Some(title) = patch.title {
            check_title(&title)?;
            manga.title = title;
        }
        if let Some(rating) = patch.rating {
            check_rating(rating)?;
            manga.rating = rating;
        }
        if let Some(authors) = patch.authors {
            manga.authors = authors;
        }
        if let Some(genres) = patch.genres {
            manga.genres = genres;
        }
        if let Some(status) = patch.status {
            manga.status = status;
        }
        if let Some(kind) = patch.kind {
            manga.kind = kind;
        }
        if let Some(cover) = patch.cover_image_url {
            manga.cover_image_url = cover;
        }
        manga.updated_at = chrono::Utc::now().timestamp();

        self.store.update_manga(&manga).await?;
        Ok(manga)
    }

    /// Deletes all chapters of the manga, then the manga itself. Chapter
    /// deletes fan out concurrently; the manga row only goes away once every
    /// chapter delete has settled. Safe to re-run after a partial failure.
    pub async fn delete_manga(&self, manga_id: &str) -> Result<()> {
        let chapters = self.store.list_chapters(manga_id).await?;

        let deletes = chapters.iter().map(|chapter| {
            let store = self.store.clone();
            let id = chapter.id.clone();
            async move { store.delete_chapter(&id).await }
        });

        let mut failed = None;
        for result in join_all(deletes).await {
            if let Err(e) = result {
                tracing::error!("chapter delete failed during cascade: {e}");
                failed.get_or_insert(e);
            }
        }
        if let Some(e) = failed {
            // Leave the manga row in place so a re-run picks up the leftovers.
            return Err(e.into());
        }

        self.store.delete_manga(manga_id).await?;
        Ok(())
    }

    /// Adds a chapter and bumps the parent manga's counter. With no explicit
    /// number the chapter lands at `next_chapter_number`.
    pub async fn add_chapter(
        &self,
        manga_id: &str,
        chapter_number: Option<i64>,
        title: Option<String>,
        images: Vec<String>,
    ) -> Result<Chapter> {
        let images = clean_images(images);
        if images.is_empty() {
            return Err(LibraryError::Validation(
                "chapter must have at least one image".into(),
            ));
        }
        if let Some(n) = chapter_number {
            if n < 1 {
                return Err(LibraryError::Validation(format!(
                    "chapter number {n} must be positive"
                )));
            }
        }

        let manga = self.get_manga(manga_id).await?;

        let chapter_number = match chapter_number {
            Some(n) => n,
            None => self.next_chapter_number(manga_id).await?,
        };

        if !self
            .store
            .find_chapters_by_number(manga_id, chapter_number)
            .await?
            .is_empty()
        {
            return Err(LibraryError::Conflict(format!(
                "chapter {chapter_number} already exists for manga {manga_id}"
            )));
        }

        let chapter = self
            .store
            .create_chapter(CreateChapterParams {
                manga_id: manga_id.to_string(),
                chapter_number,
                title: title.unwrap_or_else(|| format!("Chapter {chapter_number}")),
                images,
            })
            .await?;

        let count = manga.chapter_count.max(chapter_number);
        self.store.touch_manga(manga_id, count).await?;

        Ok(chapter)
    }

    pub async fn get_chapter(&self, chapter_id: &str) -> Result<Option<Chapter>> {
        Ok(self.store.get_chapter(chapter_id).await?)
    }

    pub async fn update_chapter(&self, chapter_id: &str, patch: ChapterPatch) -> Result<Chapter> {
        let mut chapter = self
            .store
            .get_chapter(chapter_id)
            .await?
            .ok_or_else(|| LibraryError::not_found(EntityKind::Chapter, chapter_id))?;

        if let Some(images) = patch.images {
            let images = clean_images(images);
            if images.is_empty() {
                return Err(LibraryError::Validation(
                    "chapter must have at least one image".into(),
                ));
            }
            chapter.images = images;
        }
        if let Some(n) = patch.chapter_number {
            if n < 1 {
                return Err(LibraryError::Validation(format!(
                    "chapter number {n} must be positive"
                )));
            }
            if n != chapter.chapter_number {
                let clash = self
                    .store
                    .find_chapters_by_number(&chapter.manga_id, n)
                    .await?
                    .iter()
                    .any(|c| c.id != chapter.id);
                if clash {
                    return Err(LibraryError::Conflict(format!(
                        "chapter {n} already exists for manga {}",
                        chapter.manga_id
                    )));
                }
                chapter.chapter_number = n;
            }
        }
        if let Some(title) = patch.title {
            chapter.title = title;
        }
        chapter.updated_at = chrono::Utc::now().timestamp();

        self.store.update_chapter(&chapter).await?;
        Ok(chapter)
    }

    /// Idempotent: deleting an absent chapter is a no-op. The parent counter
    /// is recomputed from the surviving rows rather than decremented, so
    /// repeated deletes cannot make it drift.
    pub async fn delete_chapter(&self, chapter_id: &str) -> Result<()> {
        let chapter = match self.store.get_chapter(chapter_id).await? {
            Some(c) => c,
            None => return Ok(()),
        };

        self.store.delete_chapter(chapter_id).await?;

        let remaining = self.store.count_chapters(&chapter.manga_id).await?;
        if !self.store.touch_manga(&chapter.manga_id, remaining).await? {
            // Parent may have been deleted concurrently. Non-fatal.
            tracing::warn!(
                "manga {} missing while recounting after chapter delete",
                chapter.manga_id
            );
        }
        Ok(())
    }

    /// 1 for a manga with no chapters, else max chapter number + 1. Gaps from
    /// deletions are ignored, so numbers are never reused.
    pub async fn next_chapter_number(&self, manga_id: &str) -> Result<i64> {
        let chapters = self.store.list_chapters(manga_id).await?;
        Ok(chapters
            .iter()
            .map(|c| c.chapter_number)
            .max()
            .map_or(1, |max| max + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn library_with_manga() -> (Library, Manga) {
        let store = Store::in_memory().await.unwrap();
        let library = Library::new(store);
        let manga = library
            .create_manga(NewManga {
                title: "Tower of Dawn".to_string(),
                authors: vec!["Kim Doyun".to_string()],
                genres: vec!["Action".to_string()],
                status: MangaStatus::Ongoing,
                kind: MangaKind::Manhwa,
                rating: 7.9,
                cover_image_url: String::new(),
            })
            .await
            .unwrap();
        (library, manga)
    }

    fn pages(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("https://img.example/p{i}.jpg"))
            .collect()
    }

    #[tokio::test]
    async fn add_chapter_defaults_number_and_title() {
        let (library, manga) = library_with_manga().await;

        let chapter = library
            .add_chapter(&manga.id, None, None, pages(2))
            .await
            .unwrap();
        assert_eq!(chapter.chapter_number, 1);
        assert_eq!(chapter.title, "Chapter 1");

        let manga = library.get_manga(&manga.id).await.unwrap();
        assert_eq!(manga.chapter_count, 1);
    }

    #[tokio::test]
    async fn add_chapter_rejects_empty_images_without_mutating() {
        let (library, manga) = library_with_manga().await;

        let result = library
            .add_chapter(&manga.id, None, None, vec!["   ".to_string(), "".to_string()])
            .await;
        assert!(matches!(result, Err(LibraryError::Validation(_))));

        let manga = library.get_manga(&manga.id).await.unwrap();
        assert_eq!(manga.chapter_count, 0);
        assert_eq!(library.next_chapter_number(&manga.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_chapter_number_conflicts() {
        let (library, manga) = library_with_manga().await;

        library
            .add_chapter(&manga.id, Some(1), None, pages(1))
            .await
            .unwrap();
        let result = library.add_chapter(&manga.id, Some(1), None, pages(1)).await;
        assert!(matches!(result, Err(LibraryError::Conflict(_))));

        let manga = library.get_manga(&manga.id).await.unwrap();
        assert_eq!(manga.chapter_count, 1);
    }

    #[tokio::test]
    async fn next_number_skips_gaps() {
        let (library, manga) = library_with_manga().await;

        for n in [1, 2, 4] {
            library
                .add_chapter(&manga.id, Some(n), None, pages(1))
                .await
                .unwrap();
        }
        assert_eq!(library.next_chapter_number(&manga.id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn delete_chapter_recounts_and_is_idempotent() {
        let (library, manga) = library_with_manga().await;

        let first = library.add_chapter(&manga.id, None, None, pages(2)).await.unwrap();
        library.add_chapter(&manga.id, None, None, pages(1)).await.unwrap();

        library.delete_chapter(&first.id).await.unwrap();
        let fetched = library.get_manga(&manga.id).await.unwrap();
        assert_eq!(fetched.chapter_count, 1);

        // Second delete of the same chapter: no error, no further change.
        library.delete_chapter(&first.id).await.unwrap();
        let fetched = library.get_manga(&manga.id).await.unwrap();
        assert_eq!(fetched.chapter_count, 1);
    }

    #[tokio::test]
    async fn delete_manga_cascades() {
        let (library, manga) = library_with_manga().await;

        for _ in 0..3 {
            library.add_chapter(&manga.id, None, None, pages(1)).await.unwrap();
        }

        library.delete_manga(&manga.id).await.unwrap();

        let store = library.store.clone();
        assert!(store.get_manga(&manga.id).await.unwrap().is_none());
        assert!(store.list_chapters(&manga.id).await.unwrap().is_empty());
        assert_eq!(store.count_chapters(&manga.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_chapter_revalidates_number_and_images() {
        let (library, manga) = library_with_manga().await;

        let c1 = library.add_chapter(&manga.id, Some(1), None, pages(1)).await.unwrap();
        library.add_chapter(&manga.id, Some(2), None, pages(1)).await.unwrap();

        let clash = library
            .update_chapter(
                &c1.id,
                ChapterPatch {
                    chapter_number: Some(2),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(clash, Err(LibraryError::Conflict(_))));

        let empty = library
            .update_chapter(
                &c1.id,
                ChapterPatch {
                    images: Some(vec![" ".to_string()]),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(empty, Err(LibraryError::Validation(_))));

        let moved = library
            .update_chapter(
                &c1.id,
                ChapterPatch {
                    chapter_number: Some(3),
                    title: Some("Prologue".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.chapter_number, 3);
        assert_eq!(moved.title, "Prologue");
    }

    #[tokio::test]
    async fn end_to_end_counter_stays_consistent() {
        let (library, manga) = library_with_manga().await;

        let c1 = library
            .add_chapter(&manga.id, None, None, pages(2))
            .await
            .unwrap();
        assert_eq!(c1.chapter_number, 1);
        assert_eq!(library.get_manga(&manga.id).await.unwrap().chapter_count, 1);

        let c2 = library
            .add_chapter(&manga.id, None, None, pages(1))
            .await
            .unwrap();
        assert_eq!(c2.chapter_number, 2);
        assert_eq!(library.get_manga(&manga.id).await.unwrap().chapter_count, 2);

        library.delete_chapter(&c1.id).await.unwrap();
        assert_eq!(library.get_manga(&manga.id).await.unwrap().chapter_count, 1);

        library.delete_manga(&manga.id).await.unwrap();
        assert!(library
            .store
            .list_chapters(&manga.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn create_manga_validates_fields() {
        let store = Store::in_memory().await.unwrap();
        let library = Library::new(store);

        let blank = library
            .create_manga(NewManga {
                title: "  ".to_string(),
                authors: vec![],
                genres: vec![],
                status: MangaStatus::Ongoing,
                kind: MangaKind::Manga,
                rating: 5.0,
                cover_image_url: String::new(),
            })
            .await;
        assert!(matches!(blank, Err(LibraryError::Validation(_))));

        let out_of_range = library
            .create_manga(NewManga {
                title: "Ok".to_string(),
                authors: vec![],
                genres: vec![],
                status: MangaStatus::Ongoing,
                kind: MangaKind::Manga,
                rating: 11.0,
                cover_image_url: String::new(),
            })
            .await;
        assert!(matches!(out_of_range, Err(LibraryError::Validation(_))));
    }
}
