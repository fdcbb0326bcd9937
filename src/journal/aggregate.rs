//! The three read-only projections derived from a filtered slice of the
//! journal. All of them are pure, they recompute from scratch on every call
//! and never look at anything besides their input.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;

use crate::utils::time::{month_key, month_start, week_start};

use super::entities::{Activity, Category};

/// One row of the category distribution. Rows always come out in
/// [Category::ALL] order, one per category, zero when nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub hours: f64,
}

/// Sums hours per category over the given records.
pub fn category_summary(activities: &[Activity]) -> Vec<CategoryTotal> {
    let mut totals = [0.; Category::ALL.len()];
    for activity in activities {
        totals[activity.category.ordinal()] += activity.hours;
    }
    Category::ALL
        .iter()
        .map(|&category| CategoryTotal {
            category,
            hours: totals[category.ordinal()],
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Bucketing {
    /// One bucket per calendar month of the start date.
    #[default]
    Monthly,
    /// One bucket per calendar week, keyed by its Monday.
    Weekly,
}

impl Display for Bucketing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bucketing::Monthly => write!(f, "monthly"),
            Bucketing::Weekly => write!(f, "weekly"),
        }
    }
}

/// One time bucket with per-category hour totals. Categories without records
/// in the bucket stay at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBucket {
    /// First day of the bucket, used for chronological ordering.
    pub start: NaiveDate,
    /// Display key, `YYYY-MM` for monthly buckets and the Monday's ISO date
    /// for weekly ones.
    pub key: String,
    totals: [f64; Category::ALL.len()],
}

impl SeriesBucket {
    pub fn hours(&self, category: Category) -> f64 {
        self.totals[category.ordinal()]
    }
}

/// Groups records by the bucket their start date falls into and sums hours
/// per category inside each bucket. Buckets come out ascending by date.
pub fn time_series(activities: &[Activity], bucketing: Bucketing) -> Vec<SeriesBucket> {
    let mut buckets = BTreeMap::<NaiveDate, [f64; Category::ALL.len()]>::new();
    for activity in activities {
        let bucket_start = match bucketing {
            Bucketing::Monthly => month_start(activity.start),
            Bucketing::Weekly => week_start(activity.start),
        };
        let totals = buckets.entry(bucket_start).or_default();
        totals[activity.category.ordinal()] += activity.hours;
    }

    buckets
        .into_iter()
        .map(|(start, totals)| SeriesBucket {
            start,
            key: match bucketing {
                Bucketing::Monthly => month_key(start),
                Bucketing::Weekly => start.to_string(),
            },
            totals,
        })
        .collect()
}

/// One day of the calendar heatmap. The color shown for the day is the
/// dominant category's.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    /// Total hours accumulated on the day across all categories.
    pub count: f64,
    /// Category with the most accumulated hours that day. Exact ties go to
    /// the earlier variant in [Category::ALL].
    pub category: Category,
}

impl HeatmapDay {
    pub fn color(&self) -> &'static str {
        self.category.color_hex()
    }
}

/// Spreads every record's hours evenly across its inclusive day span and
/// accumulates them per day and category. Days come out ascending.
pub fn heatmap(activities: &[Activity]) -> Vec<HeatmapDay> {
    let mut days = BTreeMap::<NaiveDate, [f64; Category::ALL.len()]>::new();
    for activity in activities {
        let span = activity.day_span();
        debug_assert!(span >= 1, "validation keeps end >= start");
        let hours_per_day = activity.hours / span as f64;
        for offset in 0..span {
            let day = activity.start + Duration::days(offset);
            days.entry(day).or_default()[activity.category.ordinal()] += hours_per_day;
        }
    }

    days.into_iter()
        .map(|(date, totals)| {
            let dominant = Category::ALL
                .iter()
                .copied()
                .reduce(|best, next| {
                    // Strict comparison keeps the earlier category on ties.
                    if totals[next.ordinal()] > totals[best.ordinal()] {
                        next
                    } else {
                        best
                    }
                })
                .expect("category enumeration is never empty");
            HeatmapDay {
                date,
                count: totals.iter().sum(),
                category: dominant,
            }
        })
        .collect()
}

/// Narrows heatmap values to a display range, both bounds inclusive.
pub fn clip_to_range(
    values: Vec<HeatmapDay>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<HeatmapDay> {
    values
        .into_iter()
        .filter(|day| day.date >= start && day.date <= end)
        .collect()
}
