use std::fmt::Display;

use chrono::NaiveDate;
use clap::ValueEnum;

use super::entities::{Activity, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortOrder {
    /// Latest start date first.
    #[default]
    Newest,
    /// Earliest start date first.
    Oldest,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
        }
    }
}

/// Transient selection applied before every listing and derivation. Unset
/// fields pass everything through.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub search: Option<String>,
    pub category: Option<Category>,
    pub order: SortOrder,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        if matches!(self.start, Some(bound) if activity.start < bound) {
            return false;
        }
        if matches!(self.end, Some(bound) if activity.start > bound) {
            return false;
        }
        if let Some(search) = &self.search {
            if !activity
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if matches!(self.category, Some(category) if activity.category != category) {
            return false;
        }
        true
    }

    /// Filters and sorts a snapshot of the collection. The sort is stable,
    /// records starting on the same day keep their stored order.
    pub fn select(&self, activities: &[Activity]) -> Vec<Activity> {
        let mut selected = activities
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect::<Vec<_>>();
        match self.order {
            SortOrder::Oldest => selected.sort_by(|a, b| a.start.cmp(&b.start)),
            SortOrder::Newest => selected.sort_by(|a, b| b.start.cmp(&a.start)),
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityFilter, SortOrder};
    use crate::journal::entities::{Activity, Category};

    fn activity(id: u64, title: &str, category: Category, start: &str) -> Activity {
        Activity {
            id,
            title: title.into(),
            category,
            start: start.parse().unwrap(),
            end: None,
            hours: 1.,
            notes: String::new(),
        }
    }

    fn sample() -> Vec<Activity> {
        vec![
            activity(1, "Dinner with parents", Category::Family, "2024-03-10"),
            activity(2, "Board games", Category::Friends, "2024-03-12"),
            activity(3, "Movie night", Category::Couple, "2024-03-12"),
            activity(4, "Reading", Category::Personal, "2024-04-01"),
        ]
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let filter = ActivityFilter::default();
        assert_eq!(filter.select(&sample()).len(), 4);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = ActivityFilter {
            start: Some("2024-03-12".parse().unwrap()),
            end: Some("2024-04-01".parse().unwrap()),
            ..Default::default()
        };
        let selected = filter.select(&sample());
        assert_eq!(
            selected.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![4, 2, 3]
        );
    }

    #[test]
    fn test_open_ended_bound() {
        let filter = ActivityFilter {
            end: Some("2024-03-11".parse().unwrap()),
            ..Default::default()
        };
        let selected = filter.select(&sample());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = ActivityFilter {
            search: Some("NIGHT".into()),
            ..Default::default()
        };
        let selected = filter.select(&sample());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 3);
    }

    #[test]
    fn test_category_selector() {
        let filter = ActivityFilter {
            category: Some(Category::Friends),
            ..Default::default()
        };
        let selected = filter.select(&sample());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 2);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let oldest = ActivityFilter {
            order: SortOrder::Oldest,
            ..Default::default()
        };
        assert_eq!(
            oldest.select(&sample()).iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );

        // Records 2 and 3 share a start date and must keep stored order in
        // both directions.
        let newest = ActivityFilter {
            order: SortOrder::Newest,
            ..Default::default()
        };
        assert_eq!(
            newest.select(&sample()).iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![4, 2, 3, 1]
        );
    }
}
