//! Roster filtering and ranking.
//!
//! Pure functions over an in-memory member collection: a specialty filter,
//! a set of sort strategies, and a small selection-state holder that runs
//! both on demand. Nothing here performs I/O or fails; malformed optional
//! fields are resolved to defaults before comparison.

mod collate;
mod filter;
mod rank;
mod view;

pub use collate::*;
pub use filter::*;
pub use rank::*;
pub use view::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::Member;

    /// A bare member whose id and name are both `name`.
    pub fn member(name: &str) -> Member {
        Member {
            id: name.to_string(),
            name: name.to_string(),
            specialties: Vec::new(),
            badges: Vec::new(),
            created_at: None,
            role: None,
            bio: None,
            avatar_url: None,
            github_url: None,
            email: None,
            updated_at: None,
            version: 0,
        }
    }
}
