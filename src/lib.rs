//! Simple personal time journal for the terminal. Activities are logged with
//! a category, a date span and hours, and the journal derives category
//! summaries, time series and a calendar heatmap from them.
//!

pub mod cli;
pub mod journal;
pub mod utils;
