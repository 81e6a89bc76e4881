//! levelup rewards and reward subcommands

use crate::error::{Error, Result};
use crate::model::Panel;
use crate::output::{emit_success, HumanOutput};

use super::{push_panel, Context, GlobalOptions};

/// Options for `reward add` and `reward edit`
///
/// Fields left as `None` on edit keep their current value.
pub struct SaveOptions {
    pub index: Option<usize>,
    pub title: Option<String>,
    pub cost: Option<String>,
}

#[derive(serde::Serialize)]
struct RewardsReport {
    points: u64,
    rewards: Vec<RewardLine>,
}

#[derive(serde::Serialize)]
struct RewardLine {
    index: usize,
    title: String,
    cost: u64,
    affordable: bool,
}

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = Context::open(globals)?;
    let session = ctx.engine.session();
    let points = session.profile.points;

    let rewards: Vec<RewardLine> = session
        .rewards
        .iter()
        .enumerate()
        .map(|(index, reward)| RewardLine {
            index,
            title: reward.title.clone(),
            cost: reward.cost,
            affordable: points >= reward.cost,
        })
        .collect();

    let mut human = HumanOutput::new("levelup rewards");
    human.push_summary("points", points.to_string());
    let dismissed = session.tutorial.is_dismissed(Panel::Rewards);
    if !push_panel(&mut human, Panel::Rewards, dismissed) {
        for line in &rewards {
            human.push_detail(format!("[{}] {} - {} points", line.index, line.title, line.cost));
        }
        if let Some(line) = rewards.iter().find(|line| line.affordable) {
            human.push_next_step(format!("levelup reward buy {}", line.index));
        }
    }
    ctx.annotate(&mut human);

    let report = RewardsReport { points, rewards };
    emit_success(globals.output(), "rewards", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct SaveReport {
    index: usize,
    title: String,
    cost: u64,
    created: bool,
}

pub fn run_save(globals: &GlobalOptions, options: SaveOptions) -> Result<()> {
    let mut ctx = Context::open(globals)?;

    let (title, cost) = match options.index {
        None => (
            options.title.unwrap_or_default(),
            options.cost.unwrap_or_default(),
        ),
        Some(index) => {
            let current = ctx
                .engine
                .session()
                .rewards
                .get(index)
                .ok_or(Error::RewardNotFound(index))?;
            (
                options.title.unwrap_or_else(|| current.title.clone()),
                options.cost.unwrap_or_else(|| current.cost.to_string()),
            )
        }
    };
    ctx.engine.save_reward(options.index, &title, &cost)?;

    let index = options
        .index
        .unwrap_or_else(|| ctx.engine.session().rewards.len().saturating_sub(1));
    let cost = ctx
        .engine
        .session()
        .rewards
        .get(index)
        .map(|reward| reward.cost)
        .unwrap_or_default();

    let (command, header) = match options.index {
        None => ("reward add", format!("Added reward [{index}] {title}")),
        Some(_) => ("reward edit", format!("Updated reward [{index}] {title}")),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("cost", cost.to_string());
    human.push_next_step("levelup rewards");
    ctx.annotate(&mut human);

    let report = SaveReport {
        index,
        title,
        cost,
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
    let reward = ctx.engine.remove_reward(index)?;

    let mut human = HumanOutput::new(format!("Removed reward [{index}] {}", reward.title));
    human.push_next_step("levelup rewards");
    ctx.annotate(&mut human);

    let report = RemoveReport {
        index,
        title: reward.title,
    };
    emit_success(globals.output(), "reward rm", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct BuyReport {
    index: usize,
    message: String,
    points: u64,
}

pub fn run_buy(globals: &GlobalOptions, index: usize) -> Result<()> {
    let mut ctx = Context::open(globals)?;
    let notice = ctx.engine.buy_reward(index)?;
    let points = ctx.engine.session().profile.points;

    let mut human = HumanOutput::from_notice(&notice);
    human.push_summary("points left", points.to_string());
    ctx.annotate(&mut human);

    let report = BuyReport {
        index,
        message: notice.message,
        points,
    };
    emit_success(globals.output(), "reward buy", &report, Some(&human))
}
