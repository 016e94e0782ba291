//! Sort strategies for the roster.
//!
//! Every strategy is a two-level comparison: a strategy-specific primary key,
//! then ascending creation time. Members whose records lack a field are
//! normalized into [`RankedMember`] before any comparison runs, so the
//! comparator only ever sees well-defined values.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use super::NameCollator;
use crate::models::{Badge, Member};

/// Naive timestamp layouts accepted for `createdAt`; interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Sort option selected on the team page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// Most badges first.
    #[default]
    Default,
    /// Senior students first.
    Graduation,
    /// Members open to work first.
    OpenToWork,
    NameAsc,
    NameDesc,
    /// Creation time only. Used for any unrecognized sort option.
    CreationOrder,
}

impl SortStrategy {
    /// Strategies that can be selected by name.
    pub const SELECTABLE: [SortStrategy; 5] = [
        SortStrategy::Default,
        SortStrategy::Graduation,
        SortStrategy::OpenToWork,
        SortStrategy::NameAsc,
        SortStrategy::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Default => "default",
            SortStrategy::Graduation => "graduation",
            SortStrategy::OpenToWork => "openToWork",
            SortStrategy::NameAsc => "nameAsc",
            SortStrategy::NameDesc => "nameDesc",
            SortStrategy::CreationOrder => "creationOrder",
        }
    }

    /// Parse a sort option; unknown values order by creation time.
    pub fn from_param(s: &str) -> Self {
        SortStrategy::SELECTABLE
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .unwrap_or(SortStrategy::CreationOrder)
    }
}

/// A member with every sort key resolved to a concrete value.
#[derive(Debug, Clone)]
pub struct RankedMember<'a> {
    pub member: &'a Member,
    pub badge_count: usize,
    pub senior_student: bool,
    pub open_to_work: bool,
    pub created: DateTime<Utc>,
}

impl<'a> RankedMember<'a> {
    pub fn new(member: &'a Member) -> Self {
        Self {
            member,
            badge_count: member.badges.len(),
            senior_student: member.has_badge(Badge::SeniorStudent),
            open_to_work: member.has_badge(Badge::OpenToWork),
            created: parse_created_at(member.created_at.as_deref()),
        }
    }
}

/// Resolve a creation timestamp. Missing or unreadable values become the
/// Unix epoch so they sort ahead of every dated member.
pub fn parse_created_at(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DateTime::<Utc>::UNIX_EPOCH;
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Compare two normalized members under a strategy.
pub fn compare_ranked(
    a: &RankedMember<'_>,
    b: &RankedMember<'_>,
    strategy: SortStrategy,
    collator: &NameCollator,
) -> Ordering {
    let primary = match strategy {
        SortStrategy::Default => b.badge_count.cmp(&a.badge_count),
        SortStrategy::Graduation => b.senior_student.cmp(&a.senior_student),
        SortStrategy::OpenToWork => b.open_to_work.cmp(&a.open_to_work),
        SortStrategy::NameAsc => collator.compare(&a.member.name, &b.member.name),
        SortStrategy::NameDesc => collator.compare(&b.member.name, &a.member.name),
        SortStrategy::CreationOrder => Ordering::Equal,
    };

    primary.then_with(|| a.created.cmp(&b.created))
}

/// Order members under a strategy without touching the input.
///
/// The sort is stable, so members tied on both keys keep their input order
/// and sorting an already sorted roster returns it unchanged.
pub fn sort_members(
    members: &[Member],
    strategy: SortStrategy,
    collator: &NameCollator,
) -> Vec<Member> {
    let mut ranked: Vec<RankedMember<'_>> = members.iter().map(RankedMember::new).collect();
    ranked.sort_by(|a, b| compare_ranked(a, b, strategy, collator));
    ranked.into_iter().map(|r| r.member.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fixtures;

    fn member(name: &str, badges: &[&str], created_at: Option<&str>) -> Member {
        Member {
            badges: badges.iter().map(|b| b.to_string()).collect(),
            created_at: created_at.map(|s| s.to_string()),
            ..fixtures::member(name)
        }
    }

    fn names(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    fn sorted(members: &[Member], strategy: SortStrategy) -> Vec<Member> {
        sort_members(members, strategy, &NameCollator::default())
    }

    #[test]
    fn test_default_ties_fall_back_to_creation() {
        let roster = vec![
            member("Bob", &[], Some("2023-01-02")),
            member("Ann", &[], Some("2023-01-01")),
        ];
        assert_eq!(names(&sorted(&roster, SortStrategy::Default)), ["Ann", "Bob"]);
    }

    #[test]
    fn test_default_orders_by_badge_count() {
        let roster = vec![
            member("one", &["verified"], Some("2023-01-01")),
            member("none", &[], Some("2022-01-01")),
            member("three", &["verified", "developer", "openToWork"], Some("2024-01-01")),
            member("two", &["designer", "verified"], Some("2023-06-01")),
        ];
        let result = sorted(&roster, SortStrategy::Default);
        assert_eq!(names(&result), ["three", "two", "one", "none"]);
        for pair in result.windows(2) {
            assert!(pair[0].badges.len() >= pair[1].badges.len());
        }
    }

    #[test]
    fn test_graduation_ignores_name() {
        let roster = vec![
            member("Zed", &[], None),
            member("Ann", &["seniorStudent"], None),
        ];
        assert_eq!(names(&sorted(&roster, SortStrategy::Graduation)), ["Ann", "Zed"]);

        let reversed = vec![
            member("Ann", &[], None),
            member("Zed", &["seniorStudent"], None),
        ];
        assert_eq!(names(&sorted(&reversed, SortStrategy::Graduation)), ["Zed", "Ann"]);
    }

    #[test]
    fn test_open_to_work_groups_then_creation() {
        let roster = vec![
            member("c", &["openToWork"], Some("2023-03-01")),
            member("d", &["verified", "developer"], Some("2023-01-01")),
            member("a", &["openToWork"], Some("2023-02-01")),
            member("b", &[], Some("2022-12-01")),
        ];
        // No badge-count tie-break inside a group: "d" has more badges than "b".
        assert_eq!(
            names(&sorted(&roster, SortStrategy::OpenToWork)),
            ["a", "c", "b", "d"]
        );
    }

    #[test]
    fn test_name_order_is_collated() {
        let roster = vec![
            member("김철수", &[], None),
            member("Banana", &[], None),
            member("apple", &[], None),
            member("émile", &[], None),
            member("zoe", &[], None),
        ];
        assert_eq!(
            names(&sorted(&roster, SortStrategy::NameAsc)),
            ["apple", "Banana", "émile", "zoe", "김철수"]
        );
        assert_eq!(
            names(&sorted(&roster, SortStrategy::NameDesc)),
            ["김철수", "zoe", "émile", "Banana", "apple"]
        );
    }

    #[test]
    fn test_same_name_falls_back_to_creation() {
        let mut later = member("Kim", &[], Some("2024-05-01T10:00:00Z"));
        later.id = "later".to_string();
        let mut earlier = member("Kim", &[], Some("2024-05-01T09:00:00Z"));
        earlier.id = "earlier".to_string();

        for strategy in [SortStrategy::NameAsc, SortStrategy::NameDesc] {
            let result = sorted(&[later.clone(), earlier.clone()], strategy);
            assert_eq!(result[0].id, "earlier");
            assert_eq!(result[1].id, "later");
        }
    }

    #[test]
    fn test_unknown_strategy_uses_creation_order() {
        let strategy = SortStrategy::from_param("popularity");
        assert_eq!(strategy, SortStrategy::CreationOrder);

        let roster = vec![
            member("c", &["verified"], Some("2023-03-01")),
            member("a", &[], Some("2023-01-01")),
            member("b", &["openToWork", "seniorStudent"], Some("2023-02-01")),
        ];
        assert_eq!(names(&sorted(&roster, strategy)), ["a", "b", "c"]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let roster = vec![
            member("dated", &[], Some("2020-01-01")),
            member("undated", &[], None),
        ];
        assert_eq!(
            names(&sorted(&roster, SortStrategy::Default)),
            ["undated", "dated"]
        );
    }

    #[test]
    fn test_parse_created_at_formats() {
        let expected = DateTime::parse_from_rfc3339("2023-01-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_created_at(Some("2023-01-02")), expected);
        assert_eq!(parse_created_at(Some("2023-01-02 00:00:00")), expected);
        assert_eq!(parse_created_at(Some("2023-01-02T00:00:00")), expected);
        assert_eq!(parse_created_at(Some("2023-01-02T09:00:00+09:00")), expected);
        assert_eq!(
            parse_created_at(Some("2023-01-02T00:00:00.000000+00:00")),
            expected
        );
        assert_eq!(parse_created_at(None), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_created_at(Some("")), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_created_at(Some("yesterday")), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_sort_is_idempotent_and_non_destructive() {
        let roster = vec![
            member("b", &["verified"], Some("2023-01-01")),
            member("a", &["verified"], Some("2023-01-01")),
            member("c", &[], None),
            member("d", &["openToWork", "verified"], Some("2021-01-01")),
        ];
        let snapshot = roster.clone();

        for strategy in SortStrategy::SELECTABLE {
            let once = sorted(&roster, strategy);
            let twice = sorted(&once, strategy);
            assert_eq!(once, twice, "{} not idempotent", strategy.as_str());
        }
        assert_eq!(roster, snapshot);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let roster = vec![
            member("b", &["verified"], Some("2023-01-01")),
            member("a", &["developer"], Some("2023-01-01")),
        ];
        assert_eq!(names(&sorted(&roster, SortStrategy::Default)), ["b", "a"]);
    }

    #[test]
    fn test_ties_follow_creation_for_every_strategy() {
        let roster = vec![
            member("x", &["seniorStudent"], Some("2023-04-01")),
            member("x", &["seniorStudent"], Some("2023-02-01")),
            member("x", &["seniorStudent"], Some("2023-03-01")),
        ];
        for strategy in SortStrategy::SELECTABLE {
            let result = sorted(&roster, strategy);
            let created: Vec<_> = result
                .iter()
                .map(|m| parse_created_at(m.created_at.as_deref()))
                .collect();
            assert!(created.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for strategy in SortStrategy::SELECTABLE {
            assert_eq!(SortStrategy::from_param(strategy.as_str()), strategy);
        }
    }
}
