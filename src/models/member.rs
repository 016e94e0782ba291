//! Member model matching the frontend roster entry shape.

use serde::{Deserialize, Deserializer, Serialize};

/// Status badges a member can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Verified,
    Developer,
    Designer,
    SeniorStudent,
    OpenToWork,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::Verified,
        Badge::Developer,
        Badge::Designer,
        Badge::SeniorStudent,
        Badge::OpenToWork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Verified => "verified",
            Badge::Developer => "developer",
            Badge::Designer => "designer",
            Badge::SeniorStudent => "seniorStudent",
            Badge::OpenToWork => "openToWork",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Badge::ALL.into_iter().find(|badge| badge.as_str() == s)
    }
}

/// A roster entry shown on the team page.
///
/// Records coming from older exports spell the timestamps `created_at` and
/// `updated_at`; see `MemberRecord`. Members are always written back out in
/// camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MemberRecord")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
    pub badges: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Internal version for optimistic concurrency control
    pub version: i64,
}

/// Wire shape of a member as it arrives from clients and roster exports.
///
/// Both timestamp spellings are read as separate fields, so a record carrying
/// both still parses. The camelCase value wins unless it is blank.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberRecord {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    specialties: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    badges: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, rename = "created_at")]
    legacy_created_at: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    github_url: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default, rename = "updated_at")]
    legacy_updated_at: Option<String>,
    #[serde(default)]
    version: i64,
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Member {
            id: record.id,
            name: record.name,
            specialties: record.specialties,
            badges: record.badges,
            created_at: first_present(record.created_at, record.legacy_created_at),
            role: record.role,
            bio: record.bio,
            avatar_url: record.avatar_url,
            github_url: record.github_url,
            email: record.email,
            updated_at: first_present(record.updated_at, record.legacy_updated_at),
            version: record.version,
        }
    }
}

fn first_present(preferred: Option<String>, legacy: Option<String>) -> Option<String> {
    preferred
        .filter(|s| !s.trim().is_empty())
        .or(legacy.filter(|s| !s.trim().is_empty()))
}

impl Member {
    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.iter().any(|b| b == badge.as_str())
    }
}

/// Request body for creating a new member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub name: String,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    #[serde(default)]
    pub badges: Option<Vec<String>>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for updating an existing member.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    #[serde(default)]
    pub badges: Option<Vec<String>>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Check badges against the fixed vocabulary, dropping repeats.
///
/// Returns the offending value when a badge is not part of the vocabulary.
pub fn normalize_badges(badges: &[String]) -> Result<Vec<String>, String> {
    let mut seen: Vec<String> = Vec::with_capacity(badges.len());
    for badge in badges {
        if Badge::from_str(badge).is_none() {
            return Err(badge.clone());
        }
        if !seen.contains(badge) {
            seen.push(badge.clone());
        }
    }
    Ok(seen)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
