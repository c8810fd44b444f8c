/*
 * Responsibility
 * - profile upsert の update set 適用と find-or-create 解決
 * - read 系 (me / list / by owner id) と delete
 */
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::store::{ProfileFields, ProfileRecord, ProfileStore};

const NO_PROFILE: &str = "There is no profile for this user";
const PROFILE_NOT_FOUND: &str = "Profile not found.";

/// Split a comma-delimited skills string into trimmed, non-empty segments.
pub fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Create the profile on first write, otherwise apply the update set in place.
///
/// The read-then-write pair is not atomic. A concurrent first write for the
/// same owner loses to the uniqueness constraint on the owner column and
/// surfaces as a 409; the store is the single source of truth for uniqueness.
pub async fn upsert_profile(
    store: &dyn ProfileStore,
    owner_id: Uuid,
    fields: ProfileFields,
) -> Result<ProfileRecord, AppError> {
    if store.find_by_owner(owner_id).await?.is_some() {
        // Deleted between the read and the write: report the same way as a
        // missing profile rather than pretending the update happened.
        return store
            .update(owner_id, &fields)
            .await?
            .ok_or(AppError::not_found(NO_PROFILE));
    }

    Ok(store.insert(owner_id, &fields).await?)
}

pub async fn get_profile(
    store: &dyn ProfileStore,
    owner_id: Uuid,
) -> Result<ProfileRecord, AppError> {
    store
        .find_by_owner(owner_id)
        .await?
        .ok_or(AppError::not_found(NO_PROFILE))
}

pub async fn list_profiles(store: &dyn ProfileStore) -> Result<Vec<ProfileRecord>, AppError> {
    Ok(store.list().await?)
}

/// Lookup by a raw owner reference from the URL. A malformed reference means
/// the profile cannot exist, so it is reported exactly like a missing one,
/// never as a server error.
pub async fn get_profile_by_owner_id(
    store: &dyn ProfileStore,
    raw_owner_id: &str,
) -> Result<ProfileRecord, AppError> {
    let owner_id =
        Uuid::parse_str(raw_owner_id).map_err(|_| AppError::not_found(PROFILE_NOT_FOUND))?;

    store
        .find_by_owner(owner_id)
        .await?
        .ok_or(AppError::not_found(PROFILE_NOT_FOUND))
}

/// Remove the profile and the owning account. The store performs both
/// removals in one transaction.
pub async fn delete_profile(store: &dyn ProfileStore, owner_id: Uuid) -> Result<(), AppError> {
    store.delete_with_account(owner_id).await?;
    Ok(())
}
