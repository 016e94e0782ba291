//! Specialty filter for the roster tabs.

use crate::models::Member;

/// Specialty tab selected on the team page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialtyFilter {
    #[default]
    All,
    Frontend,
    Backend,
    Mobile,
    Ai,
    Devops,
    Design,
}

impl SpecialtyFilter {
    pub const ALL: [SpecialtyFilter; 7] = [
        SpecialtyFilter::All,
        SpecialtyFilter::Frontend,
        SpecialtyFilter::Backend,
        SpecialtyFilter::Mobile,
        SpecialtyFilter::Ai,
        SpecialtyFilter::Devops,
        SpecialtyFilter::Design,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialtyFilter::All => "all",
            SpecialtyFilter::Frontend => "frontend",
            SpecialtyFilter::Backend => "backend",
            SpecialtyFilter::Mobile => "mobile",
            SpecialtyFilter::Ai => "ai",
            SpecialtyFilter::Devops => "devops",
            SpecialtyFilter::Design => "design",
        }
    }

    /// Parse a tab value. Anything unrecognized shows the whole roster.
    pub fn from_param(s: &str) -> Self {
        SpecialtyFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .unwrap_or_default()
    }

    /// The specialty tag a member must carry, or `None` for the `all` tab.
    fn required_tag(&self) -> Option<&'static str> {
        match self {
            SpecialtyFilter::All => None,
            other => Some(other.as_str()),
        }
    }
}

/// Members whose specialties include the selected tag, in input order.
pub fn filter_members(members: &[Member], filter: SpecialtyFilter) -> Vec<Member> {
    match filter.required_tag() {
        None => members.to_vec(),
        Some(tag) => members
            .iter()
            .filter(|member| member.specialties.iter().any(|s| s == tag))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fixtures;

    fn member(id: &str, specialties: &[&str]) -> Member {
        Member {
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            ..fixtures::member(id)
        }
    }

    fn ids(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_all_returns_everything() {
        let roster = vec![
            member("a", &["frontend"]),
            member("b", &[]),
            member("c", &["ai", "backend"]),
        ];
        let result = filter_members(&roster, SpecialtyFilter::All);
        assert_eq!(result, roster);
    }

    #[test]
    fn test_single_mobile_member() {
        let roster = vec![
            member("a", &["frontend"]),
            member("b", &["mobile", "design"]),
            member("c", &["backend"]),
        ];
        let result = filter_members(&roster, SpecialtyFilter::Mobile);
        assert_eq!(ids(&result), vec!["b"]);
    }

    #[test]
    fn test_members_match_several_tabs() {
        let roster = vec![
            member("a", &["frontend", "backend"]),
            member("b", &["backend"]),
            member("c", &["frontend"]),
        ];
        assert_eq!(
            ids(&filter_members(&roster, SpecialtyFilter::Frontend)),
            vec!["a", "c"]
        );
        assert_eq!(
            ids(&filter_members(&roster, SpecialtyFilter::Backend)),
            vec!["a", "b"]
        );
        assert!(filter_members(&roster, SpecialtyFilter::Devops).is_empty());
    }

    #[test]
    fn test_every_result_carries_the_tag() {
        let roster = vec![
            member("a", &["ai"]),
            member("b", &["design", "ai"]),
            member("c", &["devops"]),
            member("d", &[]),
        ];
        for filter in SpecialtyFilter::ALL.into_iter().skip(1) {
            for m in filter_members(&roster, filter) {
                assert!(m.specialties.iter().any(|s| s == filter.as_str()));
            }
        }
    }

    #[test]
    fn test_unknown_tab_falls_back_to_all() {
        assert_eq!(SpecialtyFilter::from_param("blockchain"), SpecialtyFilter::All);
        assert_eq!(SpecialtyFilter::from_param(""), SpecialtyFilter::All);
        assert_eq!(SpecialtyFilter::from_param("Mobile"), SpecialtyFilter::All);
        assert_eq!(SpecialtyFilter::from_param("devops"), SpecialtyFilter::Devops);
    }
}
