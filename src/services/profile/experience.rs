/*
 * Responsibility
 * - 経歴 (experience) サブドキュメントの編集
 * - 先頭挿入 (most-recent-first) を不変条件として維持する
 */
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::store::{Experience, ProfileRecord, ProfileStore};

const NO_PROFILE: &str = "There is no profile for this user";

/// Prepend an entry to the owner's experience list and persist it.
///
/// A missing profile is an error here; experience edits never auto-create
/// the profile (unlike the upsert entry point).
pub async fn add_experience(
    store: &dyn ProfileStore,
    owner_id: Uuid,
    entry: Experience,
) -> Result<ProfileRecord, AppError> {
    let profile = store
        .find_by_owner(owner_id)
        .await?
        .ok_or(AppError::not_found(NO_PROFILE))?;

    // Newest first.
    let mut experience = profile.experience;
    experience.insert(0, entry);

    store
        .set_experience(owner_id, &experience)
        .await?
        .ok_or(AppError::not_found(NO_PROFILE))
}
