/*
 * Responsibility
 * - profiles テーブル向け SQLx 操作 (ProfileStore の Postgres 実装)
 * - owner の表示情報 (name/avatar) は users を LEFT JOIN して返す
 * - DB エラーは RepoError に変換しやすい形で返す
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::store::{
    Experience, Owner, ProfileFields, ProfileRecord, ProfileStore, SocialLinks,
};

#[derive(Debug, FromRow)]
struct ProfileRow {
    owner_id: Uuid,
    owner_name: Option<String>,
    owner_avatar: Option<String>,
    status: String,
    skills: Vec<String>,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    github_username: Option<String>,
    social: Json<SocialLinks>,
    experience: Json<Vec<Experience>>,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(r: ProfileRow) -> Self {
        Self {
            owner: Owner {
                id: r.owner_id,
                name: r.owner_name,
                avatar: r.owner_avatar,
            },
            status: r.status,
            skills: r.skills,
            company: r.company,
            website: r.website,
            location: r.location,
            bio: r.bio,
            github_username: r.github_username,
            social: r.social.0,
            experience: r.experience.0,
        }
    }
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<ProfileRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                p."ownerId" AS owner_id,
                u."userName" AS owner_name,
                u."imageUrl" AS owner_avatar,
                p.status, p.skills, p.company, p.website, p.location, p.bio,
                p."githubUsername" AS github_username,
                p.social, p.experience
            FROM profiles p
            LEFT JOIN users u ON u."userId" = p."ownerId"
            WHERE p."ownerId" = $1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn list(&self) -> Result<Vec<ProfileRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                p."ownerId" AS owner_id,
                u."userName" AS owner_name,
                u."imageUrl" AS owner_avatar,
                p.status, p.skills, p.company, p.website, p.location, p.bio,
                p."githubUsername" AS github_username,
                p.social, p.experience
            FROM profiles p
            LEFT JOIN users u ON u."userId" = p."ownerId"
            ORDER BY p."createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProfileRecord::from).collect())
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<ProfileRecord, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            WITH ins AS (
                INSERT INTO profiles
                    ("ownerId", status, skills, company, website, location, bio,
                     "githubUsername", social, experience)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, '[]'::jsonb)
                RETURNING *
            )
            SELECT
                ins."ownerId" AS owner_id,
                u."userName" AS owner_name,
                u."imageUrl" AS owner_avatar,
                ins.status, ins.skills, ins.company, ins.website, ins.location, ins.bio,
                ins."githubUsername" AS github_username,
                ins.social, ins.experience
            FROM ins
            LEFT JOIN users u ON u."userId" = ins."ownerId"
            "#,
        )
        .bind(owner_id)
        .bind(&fields.status)
        .bind(&fields.skills)
        .bind(fields.company.as_deref())
        .bind(fields.website.as_deref())
        .bind(fields.location.as_deref())
        .bind(fields.bio.as_deref())
        .bind(fields.github_username.as_deref())
        .bind(Json(&fields.social))
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        fields: &ProfileFields,
    ) -> Result<Option<ProfileRecord>, RepoError> {
        // status/skills/social are replaced wholesale; optional scalars only
        // overwrite when the caller supplied them (COALESCE keeps the old value).
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            WITH upd AS (
                UPDATE profiles SET
                    status = $2,
                    skills = $3,
                    company = COALESCE($4, company),
                    website = COALESCE($5, website),
                    location = COALESCE($6, location),
                    bio = COALESCE($7, bio),
                    "githubUsername" = COALESCE($8, "githubUsername"),
                    social = $9,
                    "updatedAt" = now()
                WHERE "ownerId" = $1
                RETURNING *
            )
            SELECT
                upd."ownerId" AS owner_id,
                u."userName" AS owner_name,
                u."imageUrl" AS owner_avatar,
                upd.status, upd.skills, upd.company, upd.website, upd.location, upd.bio,
                upd."githubUsername" AS github_username,
                upd.social, upd.experience
            FROM upd
            LEFT JOIN users u ON u."userId" = upd."ownerId"
            "#,
        )
        .bind(owner_id)
        .bind(&fields.status)
        .bind(&fields.skills)
        .bind(fields.company.as_deref())
        .bind(fields.website.as_deref())
        .bind(fields.location.as_deref())
        .bind(fields.bio.as_deref())
        .bind(fields.github_username.as_deref())
        .bind(Json(&fields.social))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn set_experience(
        &self,
        owner_id: Uuid,
        experience: &[Experience],
    ) -> Result<Option<ProfileRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            WITH upd AS (
                UPDATE profiles SET
                    experience = $2,
                    "updatedAt" = now()
                WHERE "ownerId" = $1
                RETURNING *
            )
            SELECT
                upd."ownerId" AS owner_id,
                u."userName" AS owner_name,
                u."imageUrl" AS owner_avatar,
                upd.status, upd.skills, upd.company, upd.website, upd.location, upd.bio,
                upd."githubUsername" AS github_username,
                upd.social, upd.experience
            FROM upd
            LEFT JOIN users u ON u."userId" = upd."ownerId"
            "#,
        )
        .bind(owner_id)
        .bind(Json(experience))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn delete_with_account(&self, owner_id: Uuid) -> Result<(), RepoError> {
        // Both deletes commit or neither does; a failure after the first
        // delete must not leave an account without the cascade applied.
        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"DELETE FROM profiles WHERE "ownerId" = $1"#)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"DELETE FROM users WHERE "userId" = $1"#)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
