//! Terminal rendering of the journal projections. Everything here consumes
//! precomputed data and only formats it.

use ansi_term::Style;
use chrono::{Duration, NaiveDate};

use crate::{
    journal::{
        aggregate::{CategoryTotal, HeatmapDay, SeriesBucket},
        entities::{Activity, Category},
    },
    utils::{percentage::hours_percentage, time::week_start},
};

const SUMMARY_BAR_WIDTH: usize = 40;

/// Prints the filtered activity listing, newest or oldest first depending on
/// the order the caller selected.
pub fn print_log(activities: &[Activity]) {
    if activities.is_empty() {
        println!("No activities recorded.");
        return;
    }
    for activity in activities {
        let category = activity.category.paint().paint(activity.category.name());
        let range = match activity.end {
            Some(end) => format!("{} to {}", activity.start, end),
            None => activity.start.to_string(),
        };
        println!(
            "{}\t{}\t{}\t{}h\t{}",
            activity.id,
            range,
            category,
            activity.hours,
            Style::new().bold().paint(&activity.title),
        );
        if !activity.notes.is_empty() {
            println!("\t{}", activity.notes);
        }
    }
}

/// Prints the category distribution as colored bars with percentages.
pub fn print_summary(summary: &[CategoryTotal]) {
    let total: f64 = summary.iter().map(|t| t.hours).sum();
    for entry in summary {
        let share = hours_percentage(entry.hours, total);
        let width = (SUMMARY_BAR_WIDTH as f64 * *share / 100.).round() as usize;
        let bar = "█".repeat(width);
        println!(
            "{:<10}\t{:>6.1}h\t{:>3.0}%\t{}",
            entry.category.name(),
            entry.hours,
            *share,
            entry.category.paint().paint(bar),
        );
    }
    println!("{:<10}\t{:>6.1}h", "total", total);
}

/// Prints the bucketed series as a table, one column per category.
pub fn print_series(series: &[SeriesBucket]) {
    if series.is_empty() {
        println!("No activities in range.");
        return;
    }
    print!("{:<12}", "bucket");
    for category in Category::ALL {
        print!("\t{}", category.paint().paint(category.name()));
    }
    println!();
    for bucket in series {
        print!("{:<12}", bucket.key);
        for category in Category::ALL {
            print!("\t{:>6.1}", bucket.hours(category));
        }
        println!();
    }
}

/// Prints the calendar heatmap, one row per week. Days are colored with the
/// dominant category of the day, empty days stay dim.
pub fn print_heatmap(values: &[HeatmapDay], start: NaiveDate, end: NaiveDate) {
    if start > end {
        println!("Nothing to show.");
        return;
    }

    println!("{:<12} M T W T F S S", "week");

    let mut row_start = week_start(start);
    while row_start <= end {
        print!("{:<12}", row_start);
        for offset in 0..7 {
            let day = row_start + Duration::days(offset);
            if day < start || day > end {
                print!("  ");
                continue;
            }
            match values.iter().find(|v| v.date == day) {
                Some(value) if value.count > 0. => {
                    print!(" {}", value.category.paint().paint("■"))
                }
                _ => print!(" {}", Style::new().dimmed().paint("·")),
            }
        }
        println!();
        row_start += Duration::days(7);
    }

    print!("legend:");
    for category in Category::ALL {
        print!(" {} {}", category.paint().paint("■"), category.name());
    }
    println!();
}
