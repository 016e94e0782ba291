//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    CreateMemberRequest, CreateProjectRequest, Datastore, Member, Project, RevisionInfo,
    UpdateMemberRequest, UpdateProjectRequest,
};

const MEMBER_COLUMNS: &str = "id, name, specialties, badges, role, bio, avatar_url, github_url, email, created_at, updated_at, version";

const PROJECT_COLUMNS: &str = "id, title, description, tech_stack, member_ids, media, repo_url, demo_url, created_at, updated_at, version";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full datastore.
    pub async fn get_datastore(&self) -> Result<Datastore, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let members = self.list_members().await?;
        let projects = self.list_projects().await?;

        Ok(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            members,
            projects,
        })
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List all members, oldest first.
    pub async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM members ORDER BY created_at, id",
            MEMBER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Get a member by ID.
    pub async fn get_member(&self, id: &str) -> Result<Option<Member>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(member_from_row))
    }

    /// Return the ids from `ids` that do not belong to any member.
    pub async fn missing_members(&self, ids: &[String]) -> Result<Vec<String>, AppError> {
        let mut missing = Vec::new();
        for id in ids {
            let row = sqlx::query("SELECT 1 FROM members WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            if row.is_none() && !missing.contains(id) {
                missing.push(id.clone());
            }
        }
        Ok(missing)
    }

    /// Create a new member.
    pub async fn create_member(&self, request: &CreateMemberRequest) -> Result<Member, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let specialties = request.specialties.clone().unwrap_or_default();
        let badges = request.badges.clone().unwrap_or_default();

        sqlx::query(
            "INSERT INTO members (id, name, specialties, badges, role, bio, avatar_url, github_url, email, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(to_json(&specialties))
        .bind(to_json(&badges))
        .bind(&request.role)
        .bind(&request.bio)
        .bind(&request.avatar_url)
        .bind(&request.github_url)
        .bind(&request.email)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Member {
            id,
            name: request.name.clone(),
            specialties,
            badges,
            created_at: Some(now.clone()),
            role: request.role.clone(),
            bio: request.bio.clone(),
            avatar_url: request.avatar_url.clone(),
            github_url: request.github_url.clone(),
            email: request.email.clone(),
            updated_at: Some(now),
            version: 1,
        })
    }

    /// Update a member with optimistic concurrency control.
    pub async fn update_member(
        &self,
        id: &str,
        request: &UpdateMemberRequest,
    ) -> Result<Member, AppError> {
        let existing = self
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;

        // Check version for optimistic concurrency
        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::version_mismatch(expected, existing.version));
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let updated = Member {
            id: id.to_string(),
            name: request.name.clone().unwrap_or(existing.name),
            specialties: request.specialties.clone().unwrap_or(existing.specialties),
            badges: request.badges.clone().unwrap_or(existing.badges),
            created_at: existing.created_at,
            role: request.role.clone().or(existing.role),
            bio: request.bio.clone().or(existing.bio),
            avatar_url: request.avatar_url.clone().or(existing.avatar_url),
            github_url: request.github_url.clone().or(existing.github_url),
            email: request.email.clone().or(existing.email),
            updated_at: Some(now),
            version: new_version,
        };

        // Use conditional UPDATE with version check to prevent race conditions
        let result = sqlx::query(
            "UPDATE members SET name = ?, specialties = ?, badges = ?, role = ?, bio = ?, avatar_url = ?, github_url = ?, email = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&updated.name)
        .bind(to_json(&updated.specialties))
        .bind(to_json(&updated.badges))
        .bind(&updated.role)
        .bind(&updated.bio)
        .bind(&updated.avatar_url)
        .bind(&updated.github_url)
        .bind(&updated.email)
        .bind(&updated.updated_at)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Race condition - version changed between read and write
            let current = self.get_member(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|m| m.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(updated)
    }

    /// Delete a member and remove them from every project that lists them.
    pub async fn delete_member(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }

        let rows = sqlx::query("SELECT id, member_ids FROM projects")
            .fetch_all(&mut *tx)
            .await?;

        let now = Utc::now().to_rfc3339();
        for row in rows {
            let member_ids: Vec<String> = from_json(row.get("member_ids"));
            if !member_ids.iter().any(|m| m == id) {
                continue;
            }
            let project_id: String = row.get("id");
            let remaining: Vec<String> = member_ids.into_iter().filter(|m| m != id).collect();

            sqlx::query(
                "UPDATE projects SET member_ids = ?, updated_at = ?, version = version + 1 WHERE id = ?",
            )
            .bind(to_json(&remaining))
            .bind(&now)
            .bind(&project_id)
            .execute(&mut *tx)
            .await?;

            tracing::debug!("Removed member {} from project {}", id, project_id);
        }

        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC, id",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(project_from_row).collect())
    }

    /// List the projects a member worked on, newest first.
    pub async fn list_projects_for_member(&self, member_id: &str) -> Result<Vec<Project>, AppError> {
        Ok(self
            .list_projects()
            .await?
            .into_iter()
            .filter(|p| p.member_ids.iter().any(|m| m == member_id))
            .collect())
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(project_from_row))
    }

    /// Create a new project.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO projects (id, title, description, tech_stack, member_ids, media, repo_url, demo_url, created_at, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(to_json(&request.tech_stack))
        .bind(to_json(&request.member_ids))
        .bind(to_json(&request.media))
        .bind(&request.repo_url)
        .bind(&request.demo_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Project {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            tech_stack: request.tech_stack.clone(),
            member_ids: request.member_ids.clone(),
            media: request.media.clone(),
            repo_url: request.repo_url.clone(),
            demo_url: request.demo_url.clone(),
            created_at: now.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Update a project with optimistic concurrency control.
    pub async fn update_project(
        &self,
        id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        let existing = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::version_mismatch(expected, existing.version));
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let updated = Project {
            id: id.to_string(),
            title: request.title.clone().unwrap_or(existing.title),
            description: request.description.clone().or(existing.description),
            tech_stack: request.tech_stack.clone().unwrap_or(existing.tech_stack),
            member_ids: request.member_ids.clone().unwrap_or(existing.member_ids),
            media: request.media.clone().unwrap_or(existing.media),
            repo_url: request.repo_url.clone().or(existing.repo_url),
            demo_url: request.demo_url.clone().or(existing.demo_url),
            created_at: existing.created_at,
            updated_at: now,
            version: new_version,
        };

        let result = sqlx::query(
            "UPDATE projects SET title = ?, description = ?, tech_stack = ?, member_ids = ?, media = ?, repo_url = ?, demo_url = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(to_json(&updated.tech_stack))
        .bind(to_json(&updated.member_ids))
        .bind(to_json(&updated.media))
        .bind(&updated.repo_url)
        .bind(&updated.demo_url)
        .bind(&updated.updated_at)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_project(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|p| p.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(updated)
    }

    /// Delete a project.
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }
}

// Helper functions for row conversion

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> Member {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Member {
        id: row.get("id"),
        name: row.get("name"),
        specialties: from_json(row.get("specialties")),
        badges: from_json(row.get("badges")),
        created_at: Some(created_at),
        role: row.get("role"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        github_url: row.get("github_url"),
        email: row.get("email"),
        updated_at: Some(updated_at),
        version: row.get("version"),
    }
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        tech_stack: from_json(row.get("tech_stack")),
        member_ids: from_json(row.get("member_ids")),
        media: from_json(row.get("media")),
        repo_url: row.get("repo_url"),
        demo_url: row.get("demo_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Decode a JSON list column; NULL or malformed text reads as empty.
fn from_json<T: DeserializeOwned + Default>(s: Option<String>) -> T {
    s.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}
