//! Recommended starter collections offered on first run.

use crate::clock::{Timestamp, DAY_MS};
use crate::model::{Reward, Session, Stat, Task};

const STATS: [&str; 5] = ["Strength", "Stamina", "Agility", "Intelligence", "Practicality"];

/// Each task feeds the stat at the same position in [`STATS`].
const TASKS: [&str; 5] = [
    "Workout",
    "Cardio",
    "Stretch",
    "Complete a unit",
    "Practise a skill",
];

const REWARDS: [(&str, u64); 2] = [("30 mins of content", 1), ("A cheat meal", 1)];

/// Append the starter stats, tasks and rewards to `session`.
///
/// Task references are offset by the stats already present, and new tasks
/// start as not done today.
pub fn seed(session: &mut Session, today: Timestamp) {
    let base = session.stats.len();

    session
        .stats
        .extend(STATS.iter().map(|title| Stat::new(*title, 0)));
    session.tasks.extend(
        TASKS
            .iter()
            .enumerate()
            .map(|(i, title)| Task::new(*title, base + i, today - DAY_MS)),
    );
    session
        .rewards
        .extend(REWARDS.iter().map(|(title, cost)| Reward::new(*title, *cost)));
}
