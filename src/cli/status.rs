//! levelup status, setup and dismiss commands
//!
//! `status` is the main view: level, points and today's tasks. It is also
//! where the first-run offer and missed-day penalties are shown in full.

use crate::clock::Timestamp;
use crate::engine::{Notice, Startup};
use crate::error::Result;
use crate::model::{Panel, Session};
use crate::output::{emit_success, HumanOutput};

use super::{push_panel, Context, GlobalOptions};

#[derive(serde::Serialize)]
struct StatusReport {
    level: u32,
    points: u64,
    startup: Startup,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
    leveled_up: bool,
    tasks: Vec<TaskLine>,
}

#[derive(serde::Serialize)]
pub(super) struct TaskLine {
    pub index: usize,
    pub title: String,
    pub stat_index: usize,
    pub stat: Option<String>,
    pub done: bool,
}

impl TaskLine {
    pub fn describe(&self) -> String {
        let stat = self.stat.as_deref().unwrap_or("?");
        let state = if self.done { "done" } else { "pending" };
        format!("[{}] {} ({stat}) - {state}", self.index, self.title)
    }
}

pub(super) fn task_lines(session: &Session, today: Timestamp) -> Vec<TaskLine> {
    session
        .tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskLine {
            index,
            title: task.title.clone(),
            stat_index: task.stat_index,
            stat: session.stat_title(task).map(str::to_string),
            done: task.is_done_on(today),
        })
        .collect()
}

pub fn run(globals: &GlobalOptions) -> Result<()> {
    let mut ctx = Context::open_main(globals)?;

    let level_up = match ctx.startup {
        Startup::OfferDefaults => None,
        _ => ctx.engine.check_level_up()?,
    };

    let session = ctx.engine.session();
    let tasks = task_lines(session, ctx.engine.today());

    let mut human = match &ctx.startup {
        Startup::OfferDefaults => {
            let mut human = HumanOutput::new("Setup recommended defaults?");
            human.push_detail("Adds 5 stats, 5 daily tasks and 2 rewards to start from");
            human.push_next_step("levelup setup yes");
            human.push_next_step("levelup setup no");
            human
        }
        Startup::Penalty { missed, penalty } => {
            let mut human = HumanOutput::new(format!("Penalty: {penalty}"));
            human.push_summary("missed tasks", missed.to_string());
            if let Some(level_up) = &level_up {
                human.push_detail(level_up.message.clone());
            }
            human.push_next_step("levelup status");
            human
        }
        Startup::Ready { .. } => {
            let header = match &level_up {
                Some(notice) => notice.message.clone(),
                None => "levelup status".to_string(),
            };
            let mut human = HumanOutput::new(header);
            human.push_summary("level", session.profile.level.to_string());
            human.push_summary("points", session.profile.points.to_string());

            let dismissed = session.tutorial.is_dismissed(Panel::Tasks);
            if !push_panel(&mut human, Panel::Tasks, dismissed) {
                for line in &tasks {
                    human.push_detail(line.describe());
                }
                if let Some(next) = tasks.iter().find(|line| !line.done) {
                    human.push_next_step(format!("levelup task done {}", next.index));
                }
            }
            human
        }
    };
    if ctx.startup.missed() > 0 && !matches!(ctx.startup, Startup::Penalty { .. }) {
        human.push_warning(format!("missed {} task, no penalty", ctx.startup.missed()));
    }

    let report = StatusReport {
        level: session.profile.level,
        points: session.profile.points,
        startup: ctx.startup.clone(),
        notice: ctx.startup.notice(),
        leveled_up: level_up.is_some(),
        tasks,
    };

    emit_success(globals.output(), "status", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct SetupReport {
    accepted: bool,
    stats: usize,
    tasks: usize,
    rewards: usize,
}

pub fn run_setup(globals: &GlobalOptions, accept: bool) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    let notice = ctx.engine.seed_defaults(accept)?;

    let session = ctx.engine.session();
    let report = SetupReport {
        accepted: accept,
        stats: session.stats.len(),
        tasks: session.tasks.len(),
        rewards: session.rewards.len(),
    };

    let mut human = HumanOutput::from_notice(&notice);
    human.push_summary("stats", report.stats.to_string());
    human.push_summary("tasks", report.tasks.to_string());
    human.push_summary("rewards", report.rewards.to_string());

    emit_success(globals.output(), "setup", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct DismissReport {
    panel: Panel,
}

pub fn run_dismiss(globals: &GlobalOptions, panel: Panel) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    ctx.engine.dismiss_panel(panel)?;

    let mut human = HumanOutput::new("Info panel dismissed");
    ctx.annotate(&mut human);

    emit_success(globals.output(), "dismiss", &DismissReport { panel }, Some(&human))
}
