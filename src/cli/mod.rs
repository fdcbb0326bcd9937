pub mod command;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use command::{
    process_add_command, process_edit_command, process_heatmap_command, process_log_command,
    process_remove_command, process_series_command, process_summary_command, AddCommand,
    EditCommand, FilterArgs,
};
use tracing::level_filters::LevelFilter;

use crate::{
    journal::aggregate::Bucketing,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Daylog", version, long_about = None)]
#[command(about = "Command line journal for logging and analyzing personal time", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log a new activity")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Change fields of a logged activity. Unset fields keep their value")]
    Edit {
        #[command(flatten)]
        command: EditCommand,
    },
    #[command(about = "Remove an activity by id")]
    Remove {
        #[arg(help = "Id of the activity, as shown by the log command")]
        id: u64,
    },
    #[command(about = "List activities matching the filters")]
    Log {
        #[command(flatten)]
        filter: FilterArgs,
    },
    #[command(about = "Show how hours distribute over the categories")]
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    #[command(about = "Show hours per category over time buckets")]
    Series {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = Bucketing::Monthly, help = "Size of a bucket")]
        bucket: Bucketing,
    },
    #[command(about = "Show a calendar heatmap colored by the dominant category of each day")]
    Heatmap {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match &args.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;

    match args.commands {
        Commands::Add { command } => process_add_command(&dir, command).await,
        Commands::Edit { command } => process_edit_command(&dir, command).await,
        Commands::Remove { id } => process_remove_command(&dir, id).await,
        Commands::Log { filter } => process_log_command(&dir, filter).await,
        Commands::Summary { filter } => process_summary_command(&dir, filter).await,
        Commands::Series { filter, bucket } => process_series_command(&dir, filter, bucket).await,
        Commands::Heatmap { filter } => process_heatmap_command(&dir, filter).await,
    }
}
