/*
 * Responsibility
 * - Profiles の request/response DTO
 * - validation (全違反をリストで収集) と update set への変換
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;
use crate::repos::store::{Experience, ProfileFields, ProfileRecord, SocialLinks};
use crate::services::profile::parse_skills;

/// Body of POST /profiles. Every field is optional on the wire; validation
/// decides which ones are actually required.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "githubusername")]
    pub github_username: Option<String>,
    /// Comma-delimited, e.g. "rust, axum ,sql".
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

impl UpsertProfileRequest {
    /// Validate and build the update set.
    ///
    /// All violations are collected so the client can render them at once.
    /// Blank strings count as absent: they neither satisfy a required field
    /// nor overwrite a stored value.
    pub fn into_fields(self) -> Result<ProfileFields, Vec<FieldError>> {
        let mut errors = Vec::new();

        let status = none_if_blank(self.status);
        if status.is_none() {
            errors.push(FieldError::new("status", "Status is required"));
        }

        let skills = self
            .skills
            .as_deref()
            .map(parse_skills)
            .filter(|s| !s.is_empty());
        if skills.is_none() {
            errors.push(FieldError::new("skills", "Skills is required"));
        }

        let (Some(status), Some(skills)) = (status, skills) else {
            return Err(errors);
        };

        Ok(ProfileFields {
            status,
            skills,
            company: none_if_blank(self.company),
            website: none_if_blank(self.website),
            location: none_if_blank(self.location),
            bio: none_if_blank(self.bio),
            github_username: none_if_blank(self.github_username),
            social: SocialLinks {
                // TODO: product to confirm this mapping; the old API filled
                // twitter from the company field.
                twitter: none_if_blank(self.twitter),
                facebook: none_if_blank(self.facebook),
                youtube: none_if_blank(self.youtube),
                linkedin: none_if_blank(self.linkedin),
                instagram: none_if_blank(self.instagram),
            },
        })
    }
}

/// Body of PUT /profiles/experience.
#[derive(Debug, Default, Deserialize)]
pub struct AddExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl AddExperienceRequest {
    pub fn into_entry(self) -> Result<Experience, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = none_if_blank(self.title);
        if title.is_none() {
            errors.push(FieldError::new("title", "Title is required"));
        }

        let company = none_if_blank(self.company);
        if company.is_none() {
            errors.push(FieldError::new("company", "Company is required"));
        }

        if self.from.is_none() {
            errors.push(FieldError::new("from", "From date is required"));
        }

        let (Some(title), Some(company), Some(from)) = (title, company, self.from) else {
            return Err(errors);
        };

        Ok(Experience {
            title,
            company,
            location: none_if_blank(self.location),
            from,
            to: self.to,
            current: self.current,
            description: none_if_blank(self.description),
        })
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub owner: OwnerResponse,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(
        rename = "githubusername",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_username: Option<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
}

impl From<ProfileRecord> for ProfileResponse {
    fn from(r: ProfileRecord) -> Self {
        Self {
            owner: OwnerResponse {
                id: r.owner.id,
                name: r.owner.name,
                avatar: r.owner.avatar,
            },
            status: r.status,
            skills: r.skills,
            company: r.company,
            website: r.website,
            location: r.location,
            bio: r.bio,
            github_username: r.github_username,
            social: r.social,
            experience: r.experience,
        }
    }
}
