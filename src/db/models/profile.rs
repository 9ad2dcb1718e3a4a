use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A user's public profile. Experience, education and social links are
/// embedded documents stored as JSONB; skills is an ordered text array.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub handle: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub social: Json<SocialLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExperienceEntry {
    /// Mint a new entry. A current position cannot have an end date, whatever
    /// the caller supplied.
    pub fn new(
        title: String,
        company: String,
        location: Option<String>,
        from: NaiveDate,
        to: Option<NaiveDate>,
        current: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            company,
            location,
            from,
            to: if current { None } else { to },
            current,
            description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl EducationEntry {
    pub fn new(
        school: String,
        degree: String,
        field_of_study: String,
        from: NaiveDate,
        to: Option<NaiveDate>,
        current: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            school,
            degree,
            field_of_study,
            from,
            to: if current { None } else { to },
            current,
            description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
}

/// The writable profile fields, assembled by the upsert handler after
/// validation. Everything a profile write touches except the owner id.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub handle: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}
