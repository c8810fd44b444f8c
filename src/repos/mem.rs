/*
 * Responsibility
 * - テスト用 in-memory ProfileStore
 * - pg 実装と同じ契約 (COALESCE 相当の partial update / owner 一意性)
 */
use std::collections::HashMap;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::store::{Experience, Owner, ProfileFields, ProfileRecord, ProfileStore};

#[derive(Debug, Clone)]
struct StoredProfile {
    fields: ProfileFields,
    experience: Vec<Experience>,
}

#[derive(Default)]
pub struct MemStore {
    profiles: Mutex<HashMap<Uuid, StoredProfile>>,
    users: Mutex<HashMap<Uuid, (String, Option<String>)>>,
    /// Total store accesses, for asserting that rejected requests never
    /// reach the persistence layer.
    pub ops: AtomicUsize,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: Uuid, name: &str, avatar: Option<&str>) {
        self.users
            .lock()
            .unwrap()
            .insert(id, (name.to_string(), avatar.map(str::to_string)));
    }

    pub fn op_count(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    pub fn has_user(&self, id: Uuid) -> bool {
        self.users.lock().unwrap().contains_key(&id)
    }

    fn record(&self, owner_id: Uuid, stored: &StoredProfile) -> ProfileRecord {
        let (name, avatar) = self
            .users
            .lock()
            .unwrap()
            .get(&owner_id)
            .cloned()
            .map(|(n, a)| (Some(n), a))
            .unwrap_or((None, None));

        ProfileRecord {
            owner: Owner {
                id: owner_id,
                name,
                avatar,
            },
            status: stored.fields.status.clone(),
            skills: stored.fields.skills.clone(),
            company: stored.fields.company.clone(),
            website: stored.fields.website.clone(),
            location: stored.fields.location.clone(),
            bio: stored.fields.bio.clone(),
            github_username: stored.fields.github_username.clone(),
            social: stored.fields.social.clone(),
            experience: stored.experience.clone(),
        }
    }
}

#[async_trait]
impl ProfileStore for MemStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<ProfileRecord>, RepoError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.get(&owner_id).map(|p| self.record(owner_id, p)))
    }

    async fn list(&self) -> Result<Vec<ProfileRecord>, RepoError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .map(|(id, p)| self.record(*id, p))
            .collect())
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<ProfileRecord, RepoError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&owner_id) {
            return Err(RepoError::Conflict);
        }
        let stored = StoredProfile {
            fields: fields.clone(),
            experience: Vec::new(),
        };
        let record = self.record(owner_id, &stored);
        profiles.insert(owner_id, stored);
        Ok(record)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<Option<ProfileRecord>, RepoError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut profiles = self.profiles.lock().unwrap();
        let Some(stored) = profiles.get_mut(&owner_id) else {
            return Ok(None);
        };

        stored.fields.status = fields.status.clone();
        stored.fields.skills = fields.skills.clone();
        stored.fields.social = fields.social.clone();
        if fields.company.is_some() {
            stored.fields.company = fields.company.clone();
        }
        if fields.website.is_some() {
            stored.fields.website = fields.website.clone();
        }
        if fields.location.is_some() {
            stored.fields.location = fields.location.clone();
        }
        if fields.bio.is_some() {
            stored.fields.bio = fields.bio.clone();
        }
        if fields.github_username.is_some() {
            stored.fields.github_username = fields.github_username.clone();
        }

        let stored = stored.clone();
        drop(profiles);
        Ok(Some(self.record(owner_id, &stored)))
    }

    async fn set_experience(
        &self,
        owner_id: Uuid,
        experience: &[Experience],
    ) -> Result<Option<ProfileRecord>, RepoError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        let mut profiles = self.profiles.lock().unwrap();
        let Some(stored) = profiles.get_mut(&owner_id) else {
            return Ok(None);
        };
        stored.experience = experience.to_vec();

        let stored = stored.clone();
        drop(profiles);
        Ok(Some(self.record(owner_id, &stored)))
    }

    async fn delete_with_account(&self, owner_id: Uuid) -> Result<(), RepoError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.profiles.lock().unwrap().remove(&owner_id);
        self.users.lock().unwrap().remove(&owner_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::store::SocialLinks;

    fn fields() -> ProfileFields {
        ProfileFields {
            status: "Developer".into(),
            skills: vec!["rust".into()],
            company: None,
            website: None,
            location: None,
            bio: None,
            github_username: None,
            social: SocialLinks::default(),
        }
    }

    // Same contract as the pg store: the second insert for an owner loses to
    // the uniqueness constraint.
    #[tokio::test]
    async fn duplicate_owner_insert_is_a_conflict() {
        let store = MemStore::new();
        let owner = Uuid::new_v4();

        store.insert(owner, &fields()).await.unwrap();

        assert!(matches!(
            store.insert(owner, &fields()).await,
            Err(RepoError::Conflict)
        ));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
