pub mod commands;
pub mod output;

use std::{
    fmt::Display,
    io::{IsTerminal, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{execute, Outcome};
use output::RenderOptions;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{
    storage::{key_value::FileKeyValueStore, state_storage::StateStorage},
    timeline::{entities::DayId, Timeline},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_dir},
        logging::enable_logging,
        time::today,
    },
};

#[derive(Parser, Debug)]
#[command(name = "goalstep", version, long_about = None)]
#[command(about = "Day by day task tracker that carries unfinished work forward", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(long, global = true, help = "Don't color the output")]
    no_color: bool,
}

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

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show the goal and the days. Only the current day is expanded by default")]
    Show {
        #[arg(short, long, help = "Expand every day")]
        all: bool,
    },
    #[command(about = "Print the goal, or replace it when text is given")]
    Goal { text: Vec<String> },
    #[command(about = "Add a todo")]
    Add {
        #[arg(short, long, help = "Day to add to. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    #[command(about = "Mark a todo as completed")]
    Done {
        #[arg(short, long, help = "Day of the todo. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(help = "Position of the todo within the day, starting from 1, or its id")]
        todo: String,
    },
    #[command(about = "Mark a todo as not completed")]
    Undo {
        #[arg(short, long, help = "Day of the todo. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(help = "Position of the todo within the day, starting from 1, or its id")]
        todo: String,
    },
    #[command(about = "Flip completion of a todo")]
    Toggle {
        #[arg(short, long, help = "Day of the todo. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(help = "Position of the todo within the day, starting from 1, or its id")]
        todo: String,
    },
    #[command(about = "Change the text of a todo")]
    Edit {
        #[arg(short, long, help = "Day of the todo. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(help = "Position of the todo within the day, starting from 1, or its id")]
        todo: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    #[command(about = "Delete a todo")]
    Rm {
        #[arg(short, long, help = "Day of the todo. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(help = "Position of the todo within the day, starting from 1, or its id")]
        todo: String,
    },
    #[command(about = "Move a todo to another position within its day")]
    Mv {
        #[arg(short, long, help = "Day of the todos. Defaults to the current day")]
        day: Option<DayId>,
        #[arg(help = "Current position, starting from 1")]
        from: usize,
        #[arg(help = "New position, starting from 1")]
        to: usize,
    },
    #[command(about = "Append an empty day after the last one")]
    AddDay,
    #[command(about = "Move to the next day. Incomplete todos of the current day are carried over")]
    Advance {
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(about = "Overall progress and completed todos per date")]
    Stats,
    #[command(about = "Replace everything with a fresh timeline")]
    Reset {
        #[arg(
            long,
            short,
            help = "First day of the new timeline. Examples are \"today\", \"tomorrow\", \"15/03/2025\""
        )]
        start: Option<String>,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match args.dir {
        Some(dir) => create_dir(dir)?,
        None => create_application_default_path()?,
    };

    enable_logging(&dir, args.log)?;

    if let Commands::Advance { yes: false } = args.commands {
        let question =
            "Are you sure you want to advance to the next day? Incomplete tasks will be transferred.";
        if !confirm(question).await? {
            println!("Staying on the current day");
            return Ok(());
        }
    }

    let storage = StateStorage::new(FileKeyValueStore::new(dir)?);
    let clock = DefaultClock;
    let now = clock.now();
    let state = storage.load(today(now)).await?;
    let mut timeline = Timeline::new(state, clock);

    let options = RenderOptions {
        expand_all: false,
        color: !args.no_color && std::io::stdout().is_terminal(),
    };
    let Outcome { output, changed } = execute(&mut timeline, args.commands, now, options)?;

    if changed {
        debug!("Saving state");
        storage.save(timeline.state()).await?;
    }
    print!("{output}");
    Ok(())
}

async fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
