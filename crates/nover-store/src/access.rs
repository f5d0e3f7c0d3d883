//! Coin-gated chapter delivery

use crate::chapter::{Chapter, ChapterStore};
use crate::error::{ContentLock, StoreError, StoreResult};

/// Return a chapter's content if the caller may read it.
///
/// Free chapters are open to everyone. Paid chapters need a signed-in
/// reader holding an unlock record. Unlock records are only read here.
pub async fn chapter_content(
    chapters: &dyn ChapterStore,
    chapter_id: i64,
    caller: Option<i64>,
) -> StoreResult<Chapter> {
    let chapter = chapters
        .find_by_id(chapter_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("chapter {chapter_id}")))?;

    if chapter.is_free() {
        return Ok(chapter);
    }

    let Some(user_id) = caller else {
        return Err(StoreError::Locked(ContentLock::LoginRequired));
    };
    if !chapters.is_unlocked(user_id, chapter_id).await? {
        tracing::debug!(user_id, chapter_id, "Paid chapter not unlocked");
        return Err(StoreError::Locked(ContentLock::UnlockRequired));
    }
    Ok(chapter)
}
