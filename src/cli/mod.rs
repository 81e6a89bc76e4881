//! Command-line interface for levelup
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::Config;
use crate::engine::{Engine, Startup};
use crate::error::Result;
use crate::model::Panel;
use crate::output::{HumanOutput, OutputOptions};
use crate::store::{self, FileStore};

mod config;
mod reward;
mod stat;
mod status;
mod task;

/// levelup - daily tasks, stats and rewards as a progression game
///
/// Complete each task once a day to raise its stat and earn a point. When
/// every stat reaches 10 you level up. Points buy rewards. Skipping more
/// than one task in a day earns a penalty.
#[derive(Parser, Debug)]
#[command(name = "levelup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the records (defaults to the platform data dir)
    #[arg(long, global = true, env = store::DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, env = "LEVELUP_TODAY")]
    pub today: Option<NaiveDate>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the main view: level, points and today's tasks
    Status,

    /// Answer the first-run offer of recommended defaults
    Setup {
        /// Whether to add the recommended stats, tasks and rewards
        #[arg(value_enum)]
        answer: SetupAnswer,
    },

    /// Show level and stats
    Stats,

    /// Stat management
    #[command(subcommand)]
    Stat(StatCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show points and rewards
    Rewards,

    /// Reward management
    #[command(subcommand)]
    Reward(RewardCommands),

    /// Dismiss an info panel
    Dismiss {
        /// Panel to dismiss
        #[arg(value_enum)]
        panel: PanelArg,
    },

    /// Configuration file helpers
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupAnswer {
    Yes,
    No,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelArg {
    Stats,
    Tasks,
    Rewards,
}

impl From<PanelArg> for Panel {
    fn from(arg: PanelArg) -> Self {
        match arg {
            PanelArg::Stats => Panel::Stats,
            PanelArg::Tasks => Panel::Tasks,
            PanelArg::Rewards => Panel::Rewards,
        }
    }
}

/// Stat subcommands
#[derive(Subcommand, Debug)]
pub enum StatCommands {
    /// Add a stat starting at 0
    Add {
        /// Stat title
        title: String,
    },

    /// Rename a stat
    Edit {
        /// Stat index, as listed by `levelup stats`
        index: usize,

        /// New title
        title: String,
    },

    /// Remove a stat and every task feeding it
    Rm {
        /// Stat index
        index: usize,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a daily task
    Add {
        /// Task title
        title: String,

        /// Index of the stat the task feeds
        #[arg(short, long)]
        stat: usize,
    },

    /// Change a task's title or stat
    Edit {
        /// Task index, as listed by `levelup status`
        index: usize,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New stat index
        #[arg(short, long)]
        stat: Option<usize>,
    },

    /// Remove a task
    Rm {
        /// Task index
        index: usize,
    },

    /// Complete a task for today
    Done {
        /// Task index
        index: usize,
    },
}

/// Reward subcommands
#[derive(Subcommand, Debug)]
pub enum RewardCommands {
    /// Add a reward
    Add {
        /// Reward title
        title: String,

        /// Price in points
        #[arg(short, long)]
        cost: String,
    },

    /// Change a reward's title or cost
    Edit {
        /// Reward index, as listed by `levelup rewards`
        index: usize,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New price in points
        #[arg(short, long)]
        cost: Option<String>,
    },

    /// Remove a reward
    Rm {
        /// Reward index
        index: usize,
    },

    /// Spend points on a reward
    Buy {
        /// Reward index
        index: usize,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write the default configuration file if none exists
    Init,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub data_dir: PathBuf,
    pub today: Option<NaiveDate>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

/// Engine opened for one command, after the startup routine ran.
pub(crate) struct Context {
    pub engine: Engine<FileStore, FixedClock>,
    pub startup: Startup,
    json: bool,
}

impl Context {
    /// Open for a command other than the main view.
    ///
    /// A drawn penalty is printed to stderr right away. The sweep has
    /// already consumed it, so neither `--quiet` nor a failing command may
    /// hide it.
    pub fn open(globals: &GlobalOptions) -> Result<Self> {
        let ctx = Self::open_records(globals)?;
        ctx.announce_penalty();
        Ok(ctx)
    }

    /// Open for `status`, which renders the penalty itself unless quiet.
    pub fn open_main(globals: &GlobalOptions) -> Result<Self> {
        let ctx = Self::open_records(globals)?;
        if globals.quiet || globals.json {
            ctx.announce_penalty();
        }
        Ok(ctx)
    }

    /// Load the records, pin today's date and run the startup routine.
    fn open_records(globals: &GlobalOptions) -> Result<Self> {
        let config = Config::load_from_dir(&globals.data_dir);
        let clock = match globals.today {
            Some(date) => FixedClock::at_date(date),
            None => FixedClock(SystemClock.today()),
        };
        let store = FileStore::new(&globals.data_dir);
        tracing::debug!(data_dir = %globals.data_dir.display(), "opening records");

        let mut engine = Engine::open(store, clock, config)?;
        let startup = engine.startup(&mut rand::thread_rng())?;
        Ok(Self {
            engine,
            startup,
            json: globals.json,
        })
    }

    fn announce_penalty(&self) {
        if let Startup::Penalty { penalty, .. } = &self.startup {
            eprintln!("Penalty: {penalty}");
        }
    }

    /// Surface the startup outcome on a command other than the main view.
    ///
    /// The penalty already went to stderr; JSON output also carries it as a
    /// warning.
    pub fn annotate(&self, human: &mut HumanOutput) {
        match &self.startup {
            Startup::OfferDefaults => {
                human.push_next_step("levelup setup yes|no");
            }
            Startup::Penalty { penalty, .. } if self.json => {
                human.push_warning(format!("Penalty: {penalty}"));
            }
            Startup::Penalty { .. } | Startup::Ready { .. } => {}
        }
    }
}

/// Lines of the info panel shown until `panel` is dismissed.
pub(crate) fn panel_info(panel: Panel) -> &'static [&'static str] {
    match panel {
        Panel::Stats => &[
            "Stats are fields of interest you can improve in",
            "Each daily task is assigned a specific stat, which adds a stat point upon completion",
            "When all stats reach 10 or more, you level up",
            "Use 'levelup stat add <title>' to add a stat to your profile",
        ],
        Panel::Tasks => &[
            "Tasks are daily quests you have to complete in order to gain points",
            "Each task has an associated stat which gains 1 point on completion",
            "Failure to complete more than 1 task per day will result in a penalty",
            "Use 'levelup task add <title> --stat <index>' to add a task to your daily queue",
        ],
        Panel::Rewards => &[
            "Completion of tasks grants reward points, which can be used to buy, well, rewards",
            "Rewards are any pleasurable activity you wish to partake in, like social media, fast food, etc.",
            "Note that you personally need to maintain the discipline to not do those activities unless bought",
            "Use 'levelup reward add <title> --cost <points>' to add a reward with a point price",
        ],
    }
}

/// Push the info panel for `panel` onto `human` when it is still shown.
///
/// Returns true when the panel replaced the collection listing.
pub(crate) fn push_panel(human: &mut HumanOutput, panel: Panel, dismissed: bool) -> bool {
    if dismissed {
        return false;
    }
    human.push_detail("Info");
    for line in panel_info(panel) {
        human.push_detail(*line);
    }
    let name = match panel {
        Panel::Stats => "stats",
        Panel::Tasks => "tasks",
        Panel::Rewards => "rewards",
    };
    human.push_next_step(format!("levelup dismiss {name}"));
    true
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = GlobalOptions {
            data_dir: store::resolve_data_dir(self.data_dir.as_deref()),
            today: self.today,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Status => status::run(&globals),
            Commands::Setup { answer } => status::run_setup(&globals, answer == SetupAnswer::Yes),
            Commands::Dismiss { panel } => status::run_dismiss(&globals, panel.into()),
            Commands::Stats => stat::run_list(&globals),
            Commands::Stat(cmd) => match cmd {
                StatCommands::Add { title } => stat::run_save(
                    &globals,
                    stat::SaveOptions { index: None, title },
                ),
                StatCommands::Edit { index, title } => stat::run_save(
                    &globals,
                    stat::SaveOptions {
                        index: Some(index),
                        title,
                    },
                ),
                StatCommands::Rm { index } => stat::run_rm(&globals, index),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { title, stat } => task::run_save(
                    &globals,
                    task::SaveOptions {
                        index: None,
                        title: Some(title),
                        stat: Some(stat),
                    },
                ),
                TaskCommands::Edit { index, title, stat } => task::run_save(
                    &globals,
                    task::SaveOptions {
                        index: Some(index),
                        title,
                        stat,
                    },
                ),
                TaskCommands::Rm { index } => task::run_rm(&globals, index),
                TaskCommands::Done { index } => task::run_done(&globals, index),
            },
            Commands::Rewards => reward::run_list(&globals),
            Commands::Reward(cmd) => match cmd {
                RewardCommands::Add { title, cost } => reward::run_save(
                    &globals,
                    reward::SaveOptions {
                        index: None,
                        title: Some(title),
                        cost: Some(cost),
                    },
                ),
                RewardCommands::Edit { index, title, cost } => reward::run_save(
                    &globals,
                    reward::SaveOptions {
                        index: Some(index),
                        title,
                        cost,
                    },
                ),
                RewardCommands::Rm { index } => reward::run_rm(&globals, index),
                RewardCommands::Buy { index } => reward::run_buy(&globals, index),
            },
            Commands::Config(cmd) => match cmd {
                ConfigCommands::Show => config::run_show(&globals),
                ConfigCommands::Init => config::run_init(&globals),
            },
        }
    }
}

/// Path of the configuration file for these options
pub(crate) fn config_path(data_dir: &Path) -> PathBuf {
    Config::path_in(data_dir)
}
