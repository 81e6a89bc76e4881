//! levelup task subcommands

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::{Context, GlobalOptions};

/// Options for `task add` and `task edit`
///
/// Fields left as `None` on edit keep their current value.
pub struct SaveOptions {
    pub index: Option<usize>,
    pub title: Option<String>,
    pub stat: Option<usize>,
}

#[derive(serde::Serialize)]
struct SaveReport {
    index: usize,
    title: String,
    stat_index: usize,
    created: bool,
}

pub fn run_save(globals: &GlobalOptions, options: SaveOptions) -> Result<()> {
    let mut ctx = Context::open(globals)?;

    let (title, stat_index) = match options.index {
        None => (
            options.title.unwrap_or_default(),
            options.stat.unwrap_or_default(),
        ),
        Some(index) => {
            let current = ctx
                .engine
                .session()
                .tasks
                .get(index)
                .ok_or(Error::TaskNotFound(index))?;
            (
                options.title.unwrap_or_else(|| current.title.clone()),
                options.stat.unwrap_or(current.stat_index),
            )
        }
    };
    ctx.engine.save_task(options.index, &title, stat_index)?;

    let index = options
        .index
        .unwrap_or_else(|| ctx.engine.session().tasks.len().saturating_sub(1));
    let stat = ctx
        .engine
        .session()
        .stats
        .get(stat_index)
        .map(|stat| stat.title.clone())
        .unwrap_or_default();

    let (command, header) = match options.index {
        None => ("task add", format!("Added task [{index}] {title} ({stat})")),
        Some(_) => ("task edit", format!("Updated task [{index}] {title} ({stat})")),
    };
    let mut human = HumanOutput::new(header);
    human.push_next_step("levelup status");
    ctx.annotate(&mut human);

    let report = SaveReport {
        index,
        title,
        stat_index,
        created: options.index.is_none(),
    };
    emit_success(globals.output(), command, &report, Some(&human))
}

#[derive(serde::Serialize)]
struct RemoveReport {
    index: usize,
    title: String,
}

pub fn run_rm(globals: &GlobalOptions, index: usize) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    let task = ctx.engine.remove_task(index)?;

    let mut human = HumanOutput::new(format!("Removed task [{index}] {}", task.title));
    human.push_next_step("levelup status");
    ctx.annotate(&mut human);

    let report = RemoveReport {
        index,
        title: task.title,
    };
    emit_success(globals.output(), "task rm", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct DoneReport {
    index: usize,
    message: String,
    level: u32,
    points: u64,
    pending: usize,
}

pub fn run_done(globals: &GlobalOptions, index: usize) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    let notice = ctx.engine.complete_task(index)?;

    let session = ctx.engine.session();
    let pending = (0..session.tasks.len())
        .filter(|&i| ctx.engine.is_pending(i))
        .count();

    let mut human = HumanOutput::from_notice(&notice);
    human.push_summary("level", session.profile.level.to_string());
    human.push_summary("points", session.profile.points.to_string());
    human.push_summary("pending today", pending.to_string());
    ctx.annotate(&mut human);

    let report = DoneReport {
        index,
        message: notice.message,
        level: session.profile.level,
        points: session.profile.points,
        pending,
    };
    emit_success(globals.output(), "task done", &report, Some(&human))
}
