//! JSON-file roster used before the database has been populated.
//!
//! The file holds a JSON array of member records as exported by the old
//! site, so records may use `createdAt`, `created_at` or both, and may omit
//! `badges` entirely.

use std::path::Path;

use crate::errors::AppError;
use crate::models::Member;

/// Read a roster export from disk.
pub async fn load_roster(path: &Path) -> Result<Vec<Member>, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let members: Vec<Member> = serde_json::from_str(&raw)?;
    tracing::debug!("Loaded {} members from {:?}", members.len(), path);
    Ok(members)
}
