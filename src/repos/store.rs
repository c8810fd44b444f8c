/*
 * Responsibility
 * - profile レコードの型定義と ProfileStore trait
 * - 実装 (pg / テスト用 mem) はこの trait の背後に隠す
 *
 * Notes
 * - owner の一意性 (one profile per owner) は store 側の制約で保証する。
 *   呼び出し側の find-then-insert は atomic ではない。
 */
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::error::RepoError;

/// Display data for the owning user, joined from the users table.
/// `name`/`avatar` are None when the user row is gone (half-deleted account).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// One entry in the profile's work history. Stored embedded in the profile
/// (JSONB), newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub owner: Owner,
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
}

/// Update set for one upsert call.
///
/// `status` and `skills` are always present (the public entry point requires
/// them on every write) and replace the stored values wholesale, as does
/// `social`. The optional scalars are applied only when Some; None leaves the
/// stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<ProfileRecord>, RepoError>;

    async fn list(&self) -> Result<Vec<ProfileRecord>, RepoError>;

    /// Create the profile for `owner_id`. A concurrent first write for the
    /// same owner loses to the uniqueness constraint and surfaces as
    /// `RepoError::Conflict`.
    async fn insert(
        &self,
        owner_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<ProfileRecord, RepoError>;

    /// Apply the update set in place. Ok(None) when no profile exists.
    async fn update(
        &self,
        owner_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<Option<ProfileRecord>, RepoError>;

    /// Replace the embedded experience list wholesale. Ok(None) when no
    /// profile exists.
    async fn set_experience(
        &self,
        owner_id: Uuid,
        experience: &[Experience],
    ) -> Result<Option<ProfileRecord>, RepoError>;

    /// Remove the profile and the owning user account in one transaction.
    async fn delete_with_account(&self, owner_id: Uuid) -> Result<(), RepoError>;
}
