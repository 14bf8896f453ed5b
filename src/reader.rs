use manga_den_common::{Chapter, EntityKind, LibraryError, Manga};
use manga_den_storage::Store;

type Result<T> = std::result::Result<T, LibraryError>;

/// Resolves reader-route parameters `(manga id, chapter number)` to the
/// content to render, plus the adjacent chapter numbers for navigation.
#[derive(Clone)]
pub struct Reader {
    store: Store,
}

/// `current - 1`, or None at the first chapter. Existence of the target is
/// not checked: links are generated optimistically and validated on resolve.
pub fn previous_chapter_number(current: i64) -> Option<i64> {
    (current > 1).then_some(current - 1)
}

/// Always `current + 1`; whether that chapter exists is only discovered when
/// someone tries to resolve it.
pub fn next_chapter_number(current: i64) -> i64 {
    current + 1
}

impl Reader {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Looks up the manga, then the unique chapter with that number. A
    /// duplicate number is a data-integrity violation and resolves to not
    /// found rather than silently picking one of the matches.
    pub async fn resolve(&self, manga_id: &str, chapter_number: i64) -> Result<(Manga, Chapter)> {
        let manga = self
            .store
            .get_manga(manga_id)
            .await?
            .ok_or_else(|| LibraryError::not_found(EntityKind::Manga, manga_id))?;

        let mut matches = self
            .store
            .find_chapters_by_number(manga_id, chapter_number)
            .await?;

        if matches.len() > 1 {
            tracing::error!(
                "manga {manga_id} has {} chapters numbered {chapter_number}",
                matches.len()
            );
            return Err(LibraryError::not_found(
                EntityKind::Chapter,
                format!("{manga_id}/{chapter_number}"),
            ));
        }
        let chapter = matches.pop().ok_or_else(|| {
            LibraryError::not_found(EntityKind::Chapter, format!("{manga_id}/{chapter_number}"))
        })?;

        Ok((manga, chapter))
    }

    /// Chapter list for a manga, ascending by number.
    pub async fn chapter_list(&self, manga_id: &str) -> Result<Vec<Chapter>> {
        Ok(self.store.list_chapters(manga_id).await?)
    }
}
