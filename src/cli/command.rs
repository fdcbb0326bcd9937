use std::{fmt::Display, path::Path};

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    journal::{
        aggregate::{category_summary, clip_to_range, heatmap, time_series, Bucketing},
        entities::{coerce_hours, Activity, Category},
        filter::{ActivityFilter, SortOrder},
        storage::FileJournalStorage,
        ActivityDraft, Journal,
    },
    utils::clock::DefaultClock,
};

use super::{
    output::{print_heatmap, print_log, print_series, print_summary},
    Args,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Days of heatmap shown when no display range was given.
const DEFAULT_HEATMAP_DAYS: i64 = 180;

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(long, help = "Short title of the activity")]
    title: String,
    #[arg(long, help = "Life domain the time went to")]
    category: Category,
    #[arg(
        long,
        help = "First day of the activity. Examples are \"yesterday\", \"15/03/2025\""
    )]
    start: String,
    #[arg(
        long,
        help = "Last day of the activity, inclusive. Defaults to the start day"
    )]
    end: Option<String>,
    #[arg(
        long,
        default_value = "",
        help = "Hours spent. Empty or unparsable input counts as 0"
    )]
    hours: String,
    #[arg(long, default_value = "", help = "Free form notes")]
    notes: String,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Parser)]
pub struct EditCommand {
    #[arg(help = "Id of the activity, as shown by the log command")]
    id: u64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(
        long,
        conflicts_with = "end",
        help = "Drop the end date, making the activity a single day one"
    )]
    no_end: bool,
    #[arg(long, help = "Hours spent. Empty or unparsable input counts as 0")]
    hours: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Filter flags shared by every reading command.
#[derive(Debug, Parser)]
pub struct FilterArgs {
    #[arg(
        long = "start",
        short,
        help = "Start of the range. Examples are \"yesterday\", \"15/03/2025\""
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the range. Examples are \"yesterday\", \"15/03/2025\""
    )]
    end_date: Option<String>,
    #[arg(long, help = "Case insensitive substring match against titles")]
    search: Option<String>,
    #[arg(long, help = "Only show one category")]
    category: Option<Category>,
    #[arg(long, default_value_t = SortOrder::Newest, help = "Order of the log listing")]
    order: SortOrder,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl FilterArgs {
    fn into_filter(self) -> Result<ActivityFilter> {
        let style = self.date_style;
        Ok(ActivityFilter {
            start: self
                .start_date
                .map(|v| parse_input_date(&v, style))
                .transpose()?,
            end: self
                .end_date
                .map(|v| parse_input_date(&v, style))
                .transpose()?,
            search: self.search,
            category: self.category,
            order: self.order,
        })
    }
}

/// Parses a human entered date into the calendar day it names.
fn parse_input_date(value: &str, date_style: DateStyle) -> Result<NaiveDate> {
    match parse_date_string(value, Local::now(), date_style.into()) {
        Ok(v) => Ok(v.with_timezone(&Local).date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value}: {e}"),
            )
            .into()),
    }
}

async fn open_journal(dir: &Path) -> Result<Journal<FileJournalStorage>> {
    let storage = FileJournalStorage::new(dir.join("journal.jsonl"))?;
    Journal::open(storage, Box::new(DefaultClock)).await
}

pub async fn process_add_command(dir: &Path, command: AddCommand) -> Result<()> {
    let mut journal = open_journal(dir).await?;

    let draft = ActivityDraft {
        title: command.title,
        category: command.category,
        start: parse_input_date(&command.start, command.date_style)?,
        end: command
            .end
            .map(|v| parse_input_date(&v, command.date_style))
            .transpose()?,
        hours: coerce_hours(&command.hours),
        notes: command.notes,
    };

    let id = journal.add(draft).await?;
    println!("Added activity {id}");
    Ok(())
}

pub async fn process_edit_command(dir: &Path, command: EditCommand) -> Result<()> {
    let mut journal = open_journal(dir).await?;

    let Some(existing) = journal.get(command.id) else {
        println!("No activity with id {}", command.id);
        return Ok(());
    };

    let id = command.id;
    let changed = apply_edits(existing.clone(), command)?;
    journal.update(changed).await?;
    println!("Updated activity {id}");
    Ok(())
}

/// Applies the set fields of an edit onto the stored record. Unset fields
/// keep their value; `--no-end` collapses the activity back to a single day.
fn apply_edits(mut changed: Activity, command: EditCommand) -> Result<Activity> {
    if let Some(title) = command.title {
        changed.title = title;
    }
    if let Some(category) = command.category {
        changed.category = category;
    }
    if let Some(start) = command.start {
        changed.start = parse_input_date(&start, command.date_style)?;
    }
    if let Some(end) = command.end {
        changed.end = Some(parse_input_date(&end, command.date_style)?);
    }
    if command.no_end {
        changed.end = None;
    }
    if let Some(hours) = command.hours {
        changed.hours = coerce_hours(&hours);
    }
    if let Some(notes) = command.notes {
        changed.notes = notes;
    }
    Ok(changed)
}

pub async fn process_remove_command(dir: &Path, id: u64) -> Result<()> {
    let mut journal = open_journal(dir).await?;
    if journal.remove(id).await? {
        println!("Removed activity {id}");
    } else {
        println!("No activity with id {id}");
    }
    Ok(())
}

pub async fn process_log_command(dir: &Path, filter: FilterArgs) -> Result<()> {
    let journal = open_journal(dir).await?;
    let filter = filter.into_filter()?;
    print_log(&journal.select(&filter));
    Ok(())
}

pub async fn process_summary_command(dir: &Path, filter: FilterArgs) -> Result<()> {
    let journal = open_journal(dir).await?;
    let filter = filter.into_filter()?;
    print_summary(&category_summary(&journal.select(&filter)));
    Ok(())
}

pub async fn process_series_command(
    dir: &Path,
    filter: FilterArgs,
    bucketing: Bucketing,
) -> Result<()> {
    let journal = open_journal(dir).await?;
    let filter = filter.into_filter()?;
    print_series(&time_series(&journal.select(&filter), bucketing));
    Ok(())
}

pub async fn process_heatmap_command(dir: &Path, filter: FilterArgs) -> Result<()> {
    let journal = open_journal(dir).await?;
    let filter = filter.into_filter()?;

    let today = Local::now().date_naive();
    let (display_start, display_end) = display_range(filter.start, filter.end, today);

    let values = clip_to_range(heatmap(&journal.select(&filter)), display_start, display_end);
    print_heatmap(&values, display_start, display_end);
    Ok(())
}

/// The heatmap shows the filter range when one was given, otherwise the
/// trailing 180 days through today.
fn display_range(
    filter_start: Option<NaiveDate>,
    filter_end: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    (
        filter_start.unwrap_or(today - Duration::days(DEFAULT_HEATMAP_DAYS)),
        filter_end.unwrap_or(today),
    )
}
