//! In-memory model: profile, stats, tasks, rewards and tutorial flags.
//!
//! Stats, tasks and rewards are identified by their position in the owning
//! `Vec`. Tasks reference stats by that position, so stat removal has to
//! re-index tasks (see [`Session::remove_stat`]).

use serde::Serialize;

use crate::clock::Timestamp;

/// Stat value at which every stat must sit for a level-up.
pub const LEVEL_UP_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub level: u32,
    pub points: u64,
}

impl Default for Profile {
    fn default() -> Self {
        Self { level: 1, points: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub title: String,
    pub value: u32,
}

impl Stat {
    pub fn new(title: impl Into<String>, value: u32) -> Self {
        Self {
            title: title.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub title: String,
    pub stat_index: usize,
    pub last_completed: Timestamp,
}

impl Task {
    pub fn new(title: impl Into<String>, stat_index: usize, last_completed: Timestamp) -> Self {
        Self {
            title: title.into(),
            stat_index,
            last_completed,
        }
    }

    /// Whether the task was completed on the day starting at `today`.
    pub fn is_done_on(&self, today: Timestamp) -> bool {
        self.last_completed == today
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub title: String,
    pub cost: u64,
}

impl Reward {
    pub fn new(title: impl Into<String>, cost: u64) -> Self {
        Self {
            title: title.into(),
            cost,
        }
    }
}

/// First-run flags: which info panels were dismissed, and whether the
/// default collections were offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TutorialFlags {
    pub stats: bool,
    pub tasks: bool,
    pub rewards: bool,
    pub defaults_offered: bool,
}

/// Info panel shown until its collection is first used or it is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Stats,
    Tasks,
    Rewards,
}

impl TutorialFlags {
    pub fn is_dismissed(&self, panel: Panel) -> bool {
        match panel {
            Panel::Stats => self.stats,
            Panel::Tasks => self.tasks,
            Panel::Rewards => self.rewards,
        }
    }

    pub fn dismiss(&mut self, panel: Panel) {
        match panel {
            Panel::Stats => self.stats = true,
            Panel::Tasks => self.tasks = true,
            Panel::Rewards => self.rewards = true,
        }
    }
}

/// Everything the tracker knows, owned by whoever drives the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub profile: Profile,
    pub stats: Vec<Stat>,
    pub tasks: Vec<Task>,
    pub rewards: Vec<Reward>,
    pub tutorial: TutorialFlags,
}

impl Session {
    /// True when there is at least one stat and every stat reached the threshold.
    pub fn can_level_up(&self) -> bool {
        !self.stats.is_empty()
            && self
                .stats
                .iter()
                .all(|stat| stat.value >= LEVEL_UP_THRESHOLD)
    }

    /// Remove the stat at `index`, dropping tasks that point at it and
    /// shifting the references of tasks that point past it.
    ///
    /// Returns the removed stat and the number of tasks dropped with it.
    pub fn remove_stat(&mut self, index: usize) -> Option<(Stat, usize)> {
        if index >= self.stats.len() {
            return None;
        }
        let removed = self.stats.remove(index);

        let before = self.tasks.len();
        self.tasks.retain(|task| task.stat_index != index);
        let dropped = before - self.tasks.len();

        for task in &mut self.tasks {
            if task.stat_index > index {
                task.stat_index -= 1;
            }
        }

        Some((removed, dropped))
    }

    /// Title of the stat a task feeds, if the reference is valid.
    pub fn stat_title(&self, task: &Task) -> Option<&str> {
        self.stats.get(task.stat_index).map(|stat| stat.title.as_str())
    }
}
