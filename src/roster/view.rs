//! Roster selection state.

use super::{filter_members, sort_members, NameCollator, SortStrategy, SpecialtyFilter};
use crate::models::Member;

/// The current tab and sort option for a roster listing.
///
/// Holds no members. Every call to [`RosterView::render`] recomputes the
/// visible roster from the collection it is given, so changing a selection
/// never leaves stale output behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterView {
    filter: SpecialtyFilter,
    sort: SortStrategy,
}

impl RosterView {
    /// Build a view from raw query values. Missing values keep the defaults.
    pub fn from_params(filter: Option<&str>, sort: Option<&str>) -> Self {
        let mut view = Self::default();
        if let Some(filter) = filter {
            view.select_filter(SpecialtyFilter::from_param(filter));
        }
        if let Some(sort) = sort {
            view.select_sort(SortStrategy::from_param(sort));
        }
        view
    }

    pub fn filter(&self) -> SpecialtyFilter {
        self.filter
    }

    pub fn sort(&self) -> SortStrategy {
        self.sort
    }

    pub fn select_filter(&mut self, filter: SpecialtyFilter) {
        self.filter = filter;
    }

    pub fn select_sort(&mut self, sort: SortStrategy) {
        self.sort = sort;
    }

    /// Filter then sort the roster under the current selection.
    pub fn render(&self, members: &[Member], collator: &NameCollator) -> Vec<Member> {
        let visible = filter_members(members, self.filter());
        tracing::debug!(
            filter = self.filter().as_str(),
            sort = self.sort().as_str(),
            total = members.len(),
            visible = visible.len(),
            "Rendering roster"
        );
        sort_members(&visible, self.sort(), collator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fixtures;

    fn member(name: &str, specialties: &[&str], badges: &[&str], created_at: &str) -> Member {
        Member {
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            badges: badges.iter().map(|b| b.to_string()).collect(),
            created_at: Some(created_at.to_string()),
            ..fixtures::member(name)
        }
    }

    fn roster() -> Vec<Member> {
        vec![
            member("Dana", &["frontend", "mobile"], &["verified"], "2023-04-01"),
            member("Cole", &["backend"], &["seniorStudent", "developer"], "2023-03-01"),
            member("Bea", &["frontend"], &["openToWork"], "2023-02-01"),
            member("Abe", &["ai", "backend"], &[], "2023-01-01"),
        ]
    }

    fn names(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_defaults() {
        let view = RosterView::default();
        assert_eq!(view.filter(), SpecialtyFilter::All);
        assert_eq!(view.sort(), SortStrategy::Default);

        let collator = NameCollator::default();
        assert_eq!(
            names(&view.render(&roster(), &collator)),
            ["Cole", "Bea", "Dana", "Abe"]
        );
    }

    #[test]
    fn test_selection_changes_are_reflected() {
        let collator = NameCollator::default();
        let members = roster();
        let mut view = RosterView::default();

        view.select_filter(SpecialtyFilter::Frontend);
        assert_eq!(names(&view.render(&members, &collator)), ["Bea", "Dana"]);

        view.select_sort(SortStrategy::NameDesc);
        assert_eq!(names(&view.render(&members, &collator)), ["Dana", "Bea"]);

        view.select_filter(SpecialtyFilter::Backend);
        assert_eq!(names(&view.render(&members, &collator)), ["Cole", "Abe"]);

        view.select_filter(SpecialtyFilter::All);
        view.select_sort(SortStrategy::Graduation);
        assert_eq!(
            names(&view.render(&members, &collator)),
            ["Cole", "Abe", "Bea", "Dana"]
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let collator = NameCollator::default();
        let members = roster();
        let view = RosterView::from_params(Some("backend"), Some("openToWork"));
        assert_eq!(
            view.render(&members, &collator),
            view.render(&members, &collator)
        );
    }

    #[test]
    fn test_from_params() {
        let view = RosterView::from_params(Some("mobile"), Some("nameAsc"));
        assert_eq!(view.filter(), SpecialtyFilter::Mobile);
        assert_eq!(view.sort(), SortStrategy::NameAsc);

        let view = RosterView::from_params(None, None);
        assert_eq!(view, RosterView::default());

        let view = RosterView::from_params(Some("quantum"), Some("random"));
        assert_eq!(view.filter(), SpecialtyFilter::All);
        assert_eq!(view.sort(), SortStrategy::CreationOrder);
    }
}
