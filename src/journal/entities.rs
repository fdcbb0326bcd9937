use std::fmt::Display;

use ansi_term::Colour;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

/// Fixed set of life domains an activity can belong to. The order of
/// [Category::ALL] is load bearing: summaries are emitted in it and heatmap
/// ties resolve to the earlier variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Family,
    Friends,
    Couple,
    Personal,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Family,
        Category::Friends,
        Category::Couple,
        Category::Personal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Family => "family",
            Category::Friends => "friends",
            Category::Couple => "couple",
            Category::Personal => "personal",
        }
    }

    /// Display color associated with the category, as an rgb triple.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Category::Family => (0x63, 0x66, 0xF1),
            Category::Friends => (0x10, 0xB9, 0x81),
            Category::Couple => (0xF5, 0x9E, 0x0B),
            Category::Personal => (0xEF, 0x44, 0x44),
        }
    }

    pub fn color_hex(&self) -> &'static str {
        match self {
            Category::Family => "#6366F1",
            Category::Friends => "#10B981",
            Category::Couple => "#F59E0B",
            Category::Personal => "#EF4444",
        }
    }

    pub fn paint(&self) -> Colour {
        let (r, g, b) = self.color();
        Colour::RGB(r, g, b)
    }

    /// Position inside [Category::ALL]. Used as the deterministic tie-break
    /// when accumulated hours are exactly equal.
    pub fn ordinal(&self) -> usize {
        Category::ALL
            .iter()
            .position(|c| c == self)
            .expect("every category is listed in ALL")
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One logged time entry. The id is assigned by the journal at creation and
/// stays the sole key for edits and removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(with = "hours_ser")]
    pub hours: f64,
    #[serde(default)]
    pub notes: String,
}

impl Activity {
    /// Last day the activity covers. An absent end means the activity spans
    /// only its start day.
    pub fn last_day(&self) -> NaiveDate {
        self.end.unwrap_or(self.start)
    }

    /// Number of calendar days covered, inclusive on both sides. At least 1
    /// for any validated record.
    pub fn day_span(&self) -> i64 {
        (self.last_day() - self.start).num_days() + 1
    }

    /// Checks the invariants mutations rely on. Stored data is assumed to
    /// have passed through here already.
    pub fn validate(&self) -> Result<()> {
        if let Some(end) = self.end {
            if end < self.start {
                bail!("end date {end} is before start date {}", self.start);
            }
        }
        if self.hours < 0. {
            bail!("hours can't be negative, got {}", self.hours);
        }
        Ok(())
    }
}

/// Coerces free-form hour input the way the journal treats every numeric
/// field: empty or unparsable text becomes 0.
pub fn coerce_hours(value: &str) -> f64 {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.)
}

/// Hours are stored as a json number, but older exports carried the raw form
/// input as a string. Both shapes decode, with the usual zero fallback.
mod hours_ser {
    use serde::{self, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HoursField {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(hours: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*hours)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hours = match HoursField::deserialize(deserializer)? {
            HoursField::Number(v) if v.is_finite() => v,
            HoursField::Number(_) => 0.,
            HoursField::Text(s) => super::coerce_hours(&s),
        };
        Ok(hours)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{coerce_hours, Activity, Category};

    fn activity(start: &str, end: Option<&str>) -> Activity {
        Activity {
            id: 1,
            title: "reading".into(),
            category: Category::Personal,
            start: start.parse().unwrap(),
            end: end.map(|v| v.parse().unwrap()),
            hours: 2.,
            notes: String::new(),
        }
    }

    #[test]
    fn test_day_span_single_day() {
        assert_eq!(activity("2024-01-01", None).day_span(), 1);
        assert_eq!(activity("2024-01-01", Some("2024-01-01")).day_span(), 1);
    }

    #[test]
    fn test_day_span_inclusive() {
        assert_eq!(activity("2024-01-01", Some("2024-01-02")).day_span(), 2);
        assert_eq!(activity("2024-01-30", Some("2024-02-02")).day_span(), 4);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let record = activity("2024-01-05", Some("2024-01-01"));
        assert!(record.validate().is_err());
        assert!(activity("2024-01-05", Some("2024-01-05")).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let mut record = activity("2024-01-01", None);
        record.hours = -1.;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_coerce_hours() {
        assert_eq!(coerce_hours("4"), 4.);
        assert_eq!(coerce_hours("2.5"), 2.5);
        assert_eq!(coerce_hours(""), 0.);
        assert_eq!(coerce_hours("   "), 0.);
        assert_eq!(coerce_hours("abc"), 0.);
        assert_eq!(coerce_hours("NaN"), 0.);
    }

    #[test]
    fn test_hours_decode_from_legacy_string() {
        let json = r#"{"id":1,"title":"t","category":"family","start":"2024-01-01","hours":"4","notes":""}"#;
        let record: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(record.hours, 4.);

        let json = r#"{"id":1,"title":"t","category":"family","start":"2024-01-01","hours":"","notes":""}"#;
        let record: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(record.hours, 0.);
    }

    #[test]
    fn test_category_order_is_stable() {
        assert_eq!(
            Category::ALL.map(|c| c.name()),
            ["family", "friends", "couple", "personal"]
        );
        assert_eq!(Category::Family.ordinal(), 0);
        assert_eq!(Category::Personal.ordinal(), 3);
    }

    #[test]
    fn test_serde_round_trip() {
        let record = activity("2024-01-01", Some("2024-01-03"));
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: Activity = serde_json::from_str(&encoded).unwrap();
        assert_eq!(record, decoded);
    }
}
