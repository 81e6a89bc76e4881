//! Line-oriented text encoding of the session.
//!
//! Four independent records, one per store key:
//!
//! ```text
//! stats      <level>\n<value> <title>\n...
//! tasks      <last completed> <stat index> <title>\n...
//! rewards    <points>\n<cost> <title>\n...
//! tutorial   <stats>\n<tasks>\n<rewards>\n<defaults offered>
//! ```
//!
//! Numeric fields end at the first space (the second one for tasks) and the
//! title absorbs the rest of the line, spaces included. A missing or empty
//! record decodes to defaults. Anything else that fails to parse is reported
//! as [`Error::CorruptRecord`]; nothing is repaired.

use std::str::FromStr;

use crate::clock::Timestamp;
use crate::error::{Error, Result};
use crate::model::{Profile, Reward, Session, Stat, Task, TutorialFlags};
use crate::store::Store;

pub const STATS_KEY: &str = "stats";
pub const TASKS_KEY: &str = "tasks";
pub const REWARDS_KEY: &str = "rewards";
pub const TUTORIAL_KEY: &str = "tutorial";

/// Load every record from the store into a fresh session.
pub fn load<S: Store + ?Sized>(store: &S) -> Result<Session> {
    let stats_raw = store.get(STATS_KEY)?;
    let tasks_raw = store.get(TASKS_KEY)?;
    let rewards_raw = store.get(REWARDS_KEY)?;
    let tutorial_raw = store.get(TUTORIAL_KEY)?;

    let (level, stats) = decode_stats(stats_raw.as_deref())?;
    let tasks = decode_tasks(tasks_raw.as_deref())?;
    let (points, rewards) = decode_rewards(rewards_raw.as_deref())?;
    let tutorial = decode_tutorial(tutorial_raw.as_deref());

    tracing::debug!(
        stats = stats.len(),
        tasks = tasks.len(),
        rewards = rewards.len(),
        "loaded session"
    );

    Ok(Session {
        profile: Profile { level, points },
        stats,
        tasks,
        rewards,
        tutorial,
    })
}

/// Write every record of the session to the store.
pub fn save<S: Store + ?Sized>(store: &mut S, session: &Session) -> Result<()> {
    store.set(STATS_KEY, &encode_stats(session.profile.level, &session.stats))?;
    store.set(TASKS_KEY, &encode_tasks(&session.tasks))?;
    store.set(
        REWARDS_KEY,
        &encode_rewards(session.profile.points, &session.rewards),
    )?;
    store.set(TUTORIAL_KEY, &encode_tutorial(&session.tutorial))?;
    Ok(())
}

pub fn encode_stats(level: u32, stats: &[Stat]) -> String {
    let mut out = level.to_string();
    for stat in stats {
        out.push('\n');
        out.push_str(&format!("{} {}", stat.value, stat.title));
    }
    out
}

pub fn decode_stats(raw: Option<&str>) -> Result<(u32, Vec<Stat>)> {
    let Some(raw) = non_empty(raw) else {
        return Ok((Profile::default().level, Vec::new()));
    };

    let mut lines = raw.split('\n');
    let level: u32 = parse_field(STATS_KEY, 1, lines.next().unwrap_or_default(), "level")?;
    if level == 0 {
        return Err(corrupt(STATS_KEY, 1, "level must be at least 1"));
    }

    let mut stats = Vec::new();
    for (offset, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_no = offset + 2;
        let (value, title) = split_field(STATS_KEY, line_no, line)?;
        stats.push(Stat {
            title: title.to_string(),
            value: parse_field(STATS_KEY, line_no, value, "value")?,
        });
    }

    Ok((level, stats))
}

pub fn encode_tasks(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|task| format!("{} {} {}", task.last_completed, task.stat_index, task.title))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn decode_tasks(raw: Option<&str>) -> Result<Vec<Task>> {
    let Some(raw) = non_empty(raw) else {
        return Ok(Vec::new());
    };

    raw.split('\n')
        .enumerate()
        .map(|(offset, line)| {
            let line_no = offset + 1;
            let (last, rest) = split_field(TASKS_KEY, line_no, line)?;
            let (stat_index, title) = split_field(TASKS_KEY, line_no, rest)?;
            Ok(Task {
                title: title.to_string(),
                stat_index: parse_field(TASKS_KEY, line_no, stat_index, "stat index")?,
                last_completed: parse_field::<Timestamp>(
                    TASKS_KEY,
                    line_no,
                    last,
                    "last completed",
                )?,
            })
        })
        .collect()
}

pub fn encode_rewards(points: u64, rewards: &[Reward]) -> String {
    let mut out = points.to_string();
    for reward in rewards {
        out.push('\n');
        out.push_str(&format!("{} {}", reward.cost, reward.title));
    }
    out
}

pub fn decode_rewards(raw: Option<&str>) -> Result<(u64, Vec<Reward>)> {
    let Some(raw) = non_empty(raw) else {
        return Ok((Profile::default().points, Vec::new()));
    };

    let mut lines = raw.split('\n');
    let points: u64 = parse_field(REWARDS_KEY, 1, lines.next().unwrap_or_default(), "points")?;

    let mut rewards = Vec::new();
    for (offset, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_no = offset + 2;
        let (cost, title) = split_field(REWARDS_KEY, line_no, line)?;
        rewards.push(Reward {
            title: title.to_string(),
            cost: parse_field(REWARDS_KEY, line_no, cost, "cost")?,
        });
    }

    Ok((points, rewards))
}

pub fn encode_tutorial(flags: &TutorialFlags) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        flags.stats, flags.tasks, flags.rewards, flags.defaults_offered
    )
}

/// Decode the tutorial record. Any line other than `true` (including a
/// missing one) is false, so this never fails.
pub fn decode_tutorial(raw: Option<&str>) -> TutorialFlags {
    let Some(raw) = non_empty(raw) else {
        return TutorialFlags::default();
    };

    let mut lines = raw.split('\n').map(|line| line == "true");
    TutorialFlags {
        stats: lines.next().unwrap_or(false),
        tasks: lines.next().unwrap_or(false),
        rewards: lines.next().unwrap_or(false),
        defaults_offered: lines.next().unwrap_or(false),
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

/// Split `line` at its first space into `(field, rest)`.
fn split_field<'a>(key: &str, line_no: usize, line: &'a str) -> Result<(&'a str, &'a str)> {
    line.split_once(' ')
        .ok_or_else(|| corrupt(key, line_no, format!("missing field delimiter in '{line}'")))
}

fn parse_field<T: FromStr>(key: &str, line_no: usize, raw: &str, name: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| corrupt(key, line_no, format!("{name} '{raw}' is not a valid integer")))
}

fn corrupt(key: &str, line: usize, reason: impl Into<String>) -> Error {
    Error::CorruptRecord {
        key: key.to_string(),
        line,
        reason: reason.into(),
    }
}
