//! levelup stats and stat subcommands

use crate::error::Result;
use crate::model::Panel;
use crate::output::{emit_success, HumanOutput};

use super::{push_panel, Context, GlobalOptions};

/// Options for `stat add` and `stat edit`
pub struct SaveOptions {
    pub index: Option<usize>,
    pub title: String,
}

#[derive(serde::Serialize)]
struct StatsReport {
    level: u32,
    stats: Vec<StatLine>,
}

#[derive(serde::Serialize)]
struct StatLine {
    index: usize,
    title: String,
    value: u32,
}

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = Context::open(globals)?;
    let session = ctx.engine.session();

    let stats: Vec<StatLine> = session
        .stats
        .iter()
        .enumerate()
        .map(|(index, stat)| StatLine {
            index,
            title: stat.title.clone(),
            value: stat.value,
        })
        .collect();

    let mut human = HumanOutput::new("levelup stats");
    human.push_summary("level", session.profile.level.to_string());
    let dismissed = session.tutorial.is_dismissed(Panel::Stats);
    if !push_panel(&mut human, Panel::Stats, dismissed) {
        for line in &stats {
            human.push_detail(format!("[{}] {}: {}", line.index, line.title, line.value));
        }
    }
    ctx.annotate(&mut human);

    let report = StatsReport {
        level: session.profile.level,
        stats,
    };
    emit_success(globals.output(), "stats", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct SaveReport {
    index: usize,
    title: String,
    value: u32,
    created: bool,
}

pub fn run_save(globals: &GlobalOptions, options: SaveOptions) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    ctx.engine.save_stat(options.index, &options.title)?;

    let session = ctx.engine.session();
    let index = options
        .index
        .unwrap_or_else(|| session.stats.len().saturating_sub(1));
    let value = session.stats.get(index).map(|stat| stat.value).unwrap_or(0);

    let (command, header) = match options.index {
        None => ("stat add", format!("Added stat [{index}] {}", options.title)),
        Some(_) => ("stat edit", format!("Renamed stat [{index}] to {}", options.title)),
    };
    let mut human = HumanOutput::new(header);
    human.push_next_step("levelup stats");
    ctx.annotate(&mut human);

    let report = SaveReport {
        index,
        title: options.title,
        value,
        created: options.index.is_none(),
    };
    emit_success(globals.output(), command, &report, Some(&human))
}

#[derive(serde::Serialize)]
struct RemoveReport {
    index: usize,
    tasks_removed: usize,
}

pub fn run_rm(globals: &GlobalOptions, index: usize) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    let tasks_removed = ctx.engine.remove_stat(index)?;

    let mut human = HumanOutput::new(format!("Removed stat [{index}]"));
    if tasks_removed > 0 {
        human.push_summary("tasks removed", tasks_removed.to_string());
    }
    human.push_next_step("levelup stats");
    ctx.annotate(&mut human);

    let report = RemoveReport {
        index,
        tasks_removed,
    };
    emit_success(globals.output(), "stat rm", &report, Some(&human))
}
