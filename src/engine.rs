//! Progression engine.
//!
//! Owns the session and applies every transition to it: completing tasks,
//! levelling up, buying rewards, editing the three collections, and the
//! missed-day sweep run at startup. Each mutating call persists the whole
//! session before returning.

use rand::Rng;
use serde::Serialize;

use crate::clock::{Clock, Timestamp, DAY_MS};
use crate::codec;
use crate::config::Config;
use crate::defaults;
use crate::error::{Error, Result};
use crate::model::{Panel, Reward, Session, Stat, Task, LEVEL_UP_THRESHOLD};
use crate::penalty;
use crate::store::Store;

/// Screen to return to once a notice is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Main,
    Stats,
    Rewards,
}

/// Message for the user, followed by a view to resume at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub resume: View,
}

impl Notice {
    pub fn new(message: impl Into<String>, resume: View) -> Self {
        Self {
            message: message.into(),
            resume,
        }
    }
}

/// Result of the startup routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Startup {
    /// First run: the starter collections have not been offered yet.
    OfferDefaults,
    /// Sweep done; `missed` tasks were clamped without penalty.
    Ready { missed: usize },
    /// More than one task was missed.
    Penalty { missed: usize, penalty: String },
}

impl Startup {
    /// Blocking notice to show before the main view, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Startup::OfferDefaults => {
                Some(Notice::new("Setup recommended defaults?", View::Main))
            }
            Startup::Ready { .. } => None,
            Startup::Penalty { penalty, .. } => {
                Some(Notice::new(format!("Penalty: {penalty}"), View::Main))
            }
        }
    }

    pub fn missed(&self) -> usize {
        match self {
            Startup::OfferDefaults => 0,
            Startup::Ready { missed } | Startup::Penalty { missed, .. } => *missed,
        }
    }
}

/// The progression state machine over a store and a clock.
pub struct Engine<S: Store, C: Clock> {
    store: S,
    clock: C,
    config: Config,
    session: Session,
}

impl<S: Store, C: Clock> Engine<S, C> {
    /// Load the session from `store`.
    pub fn open(store: S, clock: C, config: Config) -> Result<Self> {
        let session = codec::load(&store)?;
        Ok(Self {
            store,
            clock,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn today(&self) -> Timestamp {
        self.clock.today()
    }

    /// Give the store back, e.g. to inspect what was persisted.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether the task at `index` can still be completed today.
    pub fn is_pending(&self, index: usize) -> bool {
        let today = self.clock.today();
        self.session
            .tasks
            .get(index)
            .map(|task| !task.is_done_on(today))
            .unwrap_or(false)
    }

    /// Missed-day sweep, run once per process before anything else.
    ///
    /// Every task more than a full day behind counts as one miss, however
    /// many days it actually slipped, and is pulled back to exactly one day
    /// behind. Two or more misses draw a penalty from the catalog.
    pub fn startup<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Startup> {
        if !self.session.tutorial.defaults_offered {
            tracing::debug!("defaults not offered yet, skipping missed-day sweep");
            return Ok(Startup::OfferDefaults);
        }

        let today = self.clock.today();
        let mut missed = 0;
        for task in &mut self.session.tasks {
            if today.saturating_sub(task.last_completed) > DAY_MS {
                missed += 1;
                task.last_completed = today - DAY_MS;
            }
        }

        if missed != 0 {
            self.persist()?;
        }

        if missed > 1 {
            if let Some(penalty) = penalty::pick(&self.config.penalties.catalog, rng) {
                tracing::info!(missed, penalty, "missed tasks, penalty drawn");
                return Ok(Startup::Penalty {
                    missed,
                    penalty: penalty.to_string(),
                });
            }
        }

        tracing::debug!(missed, "missed-day sweep done");
        Ok(Startup::Ready { missed })
    }

    /// Answer the first-run offer of starter collections.
    ///
    /// The offer is made once; answering it again is refused.
    pub fn seed_defaults(&mut self, accept: bool) -> Result<Notice> {
        if self.session.tutorial.defaults_offered {
            return Err(Error::InvalidArgument(
                "recommended defaults were already offered".to_string(),
            ));
        }
        self.session.tutorial.defaults_offered = true;
        if accept {
            let today = self.clock.today();
            defaults::seed(&mut self.session, today);
        }
        self.persist()?;

        tracing::info!(accept, "answered defaults offer");
        let message = if accept {
            "Recommended defaults added"
        } else {
            "Starting from a blank profile"
        };
        Ok(Notice::new(message, View::Main))
    }

    /// Mark a task done for today, feeding its stat (and points).
    ///
    /// Counters saturate at their maximum. A level-up triggered by the
    /// completion replaces the regular notice.
    pub fn complete_task(&mut self, index: usize) -> Result<Notice> {
        let today = self.clock.today();
        let task = self
            .session
            .tasks
            .get(index)
            .ok_or(Error::TaskNotFound(index))?;
        if task.is_done_on(today) {
            return Err(Error::AlreadyCompleted(task.title.clone()));
        }
        let stat_index = task.stat_index;
        if stat_index >= self.session.stats.len() {
            return Err(Error::StatNotFound(stat_index));
        }

        self.session.tasks[index].last_completed = today;
        let stat = &mut self.session.stats[stat_index];
        stat.value = stat.value.saturating_add(1);
        let stat_title = stat.title.clone();
        if self.config.progression.award_points {
            self.session.profile.points = self.session.profile.points.saturating_add(1);
        }
        self.persist()?;
        tracing::info!(task = index, stat = stat_index, "task completed");

        if let Some(notice) = self.check_level_up()? {
            return Ok(notice);
        }

        let message = if self.config.progression.award_points {
            format!("+1 reward, +1 {stat_title}")
        } else {
            format!("+1 {stat_title}")
        };
        Ok(Notice::new(message, View::Main))
    }

    /// Level up once if every stat reached the threshold.
    ///
    /// Surplus above the threshold carries over to the next level.
    pub fn check_level_up(&mut self) -> Result<Option<Notice>> {
        if !self.session.can_level_up() {
            return Ok(None);
        }

        self.session.profile.level = self.session.profile.level.saturating_add(1);
        for stat in &mut self.session.stats {
            stat.value -= LEVEL_UP_THRESHOLD;
        }
        self.persist()?;

        tracing::info!(level = self.session.profile.level, "leveled up");
        Ok(Some(Notice::new("Leveled up!", View::Main)))
    }

    /// Spend points on a reward.
    pub fn buy_reward(&mut self, index: usize) -> Result<Notice> {
        let reward = self
            .session
            .rewards
            .get(index)
            .ok_or(Error::RewardNotFound(index))?;
        let points = self.session.profile.points;
        if points < reward.cost {
            return Err(Error::InsufficientPoints {
                points,
                cost: reward.cost,
            });
        }

        let message = format!("Reward: {}!", reward.title);
        self.session.profile.points -= reward.cost;
        self.persist()?;

        tracing::info!(reward = index, "reward bought");
        Ok(Notice::new(message, View::Rewards))
    }

    /// Append a stat (`index == None`) or rename an existing one.
    pub fn save_stat(&mut self, index: Option<usize>, title: &str) -> Result<()> {
        let title = validate_title(title)?;
        match index {
            None => {
                self.session.stats.push(Stat::new(title, 0));
                self.session.tutorial.dismiss(Panel::Stats);
            }
            Some(index) => {
                let stat = self
                    .session
                    .stats
                    .get_mut(index)
                    .ok_or(Error::StatNotFound(index))?;
                stat.title = title.to_string();
            }
        }
        self.persist()
    }

    /// Remove a stat together with the tasks that feed it.
    ///
    /// Returns the number of tasks removed with it.
    pub fn remove_stat(&mut self, index: usize) -> Result<usize> {
        let (stat, dropped) = self
            .session
            .remove_stat(index)
            .ok_or(Error::StatNotFound(index))?;
        self.persist()?;

        tracing::info!(stat = %stat.title, dropped, "stat removed");
        Ok(dropped)
    }

    /// Append a task (`index == None`) or update an existing one.
    ///
    /// New tasks start one day behind, i.e. pending today.
    pub fn save_task(&mut self, index: Option<usize>, title: &str, stat_index: usize) -> Result<()> {
        if self.session.stats.is_empty() {
            return Err(Error::NoStats);
        }
        let title = validate_title(title)?;
        if stat_index >= self.session.stats.len() {
            return Err(Error::StatNotFound(stat_index));
        }

        match index {
            None => {
                let last = self.clock.today() - DAY_MS;
                self.session.tasks.push(Task::new(title, stat_index, last));
                self.session.tutorial.dismiss(Panel::Tasks);
            }
            Some(index) => {
                let task = self
                    .session
                    .tasks
                    .get_mut(index)
                    .ok_or(Error::TaskNotFound(index))?;
                task.title = title.to_string();
                task.stat_index = stat_index;
            }
        }
        self.persist()
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Task> {
        if index >= self.session.tasks.len() {
            return Err(Error::TaskNotFound(index));
        }
        let task = self.session.tasks.remove(index);
        self.persist()?;
        Ok(task)
    }

    /// Append a reward (`index == None`) or update an existing one.
    pub fn save_reward(&mut self, index: Option<usize>, title: &str, cost: &str) -> Result<()> {
        let title = validate_title(title)?;
        let cost = parse_cost(cost)?;

        match index {
            None => {
                self.session.rewards.push(Reward::new(title, cost));
                self.session.tutorial.dismiss(Panel::Rewards);
            }
            Some(index) => {
                let reward = self
                    .session
                    .rewards
                    .get_mut(index)
                    .ok_or(Error::RewardNotFound(index))?;
                reward.title = title.to_string();
                reward.cost = cost;
            }
        }
        self.persist()
    }

    pub fn remove_reward(&mut self, index: usize) -> Result<Reward> {
        if index >= self.session.rewards.len() {
            return Err(Error::RewardNotFound(index));
        }
        let reward = self.session.rewards.remove(index);
        self.persist()?;
        Ok(reward)
    }

    /// Hide an info panel for good.
    pub fn dismiss_panel(&mut self, panel: Panel) -> Result<()> {
        self.session.tutorial.dismiss(panel);
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        codec::save(&mut self.store, &self.session)
    }
}

/// Titles must be non-empty single lines; the line break is the record
/// separator.
pub fn validate_title(title: &str) -> Result<&str> {
    if title.is_empty() {
        return Err(Error::InvalidTitle("title cannot be empty".to_string()));
    }
    if title.contains(['\n', '\r']) {
        return Err(Error::InvalidTitle(format!(
            "'{}' spans multiple lines",
            title.escape_debug()
        )));
    }
    Ok(title)
}

/// Parse a reward cost: a non-negative integer.
pub fn parse_cost(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidCost(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::Profile;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TODAY: Timestamp = 20_000 * DAY_MS;

    fn clock() -> FixedClock {
        FixedClock(TODAY)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(9)
    }

    fn engine_with(session: Session) -> Engine<MemoryStore, FixedClock> {
        let mut store = MemoryStore::new();
        codec::save(&mut store, &session).expect("seed store");
        Engine::open(store, clock(), Config::default()).expect("open")
    }

    fn onboarded() -> Session {
        let mut session = Session::default();
        session.tutorial.defaults_offered = true;
        session
    }

    fn stored(engine: Engine<MemoryStore, FixedClock>) -> Session {
        codec::load(&engine.into_store()).expect("reload")
    }

    #[test]
    fn first_run_offers_defaults_and_skips_sweep() {
        let mut session = Session::default();
        session.stats.push(Stat::new("A", 0));
        session.tasks.push(Task::new("old", 0, TODAY - 5 * DAY_MS));
        let mut engine = engine_with(session);

        assert_eq!(engine.startup(&mut rng()).unwrap(), Startup::OfferDefaults);
        assert_eq!(engine.session().tasks[0].last_completed, TODAY - 5 * DAY_MS);
    }

    #[test]
    fn accepting_defaults_seeds_and_marks_offered() {
        let mut engine = engine_with(Session::default());
        engine.seed_defaults(true).unwrap();

        let session = stored(engine);
        assert!(session.tutorial.defaults_offered);
        assert_eq!(session.stats.len(), 5);
        assert_eq!(session.tasks.len(), 5);
        assert_eq!(session.rewards.len(), 2);
        assert!(session
            .tasks
            .iter()
            .all(|task| task.last_completed == TODAY - DAY_MS));
    }

    #[test]
    fn defaults_are_offered_once() {
        let mut engine = engine_with(Session::default());
        engine.seed_defaults(false).unwrap();
        assert!(matches!(
            engine.seed_defaults(true),
            Err(Error::InvalidArgument(_))
        ));
        assert!(engine.session().stats.is_empty());
    }

    #[test]
    fn declining_defaults_only_marks_offered() {
        let mut engine = engine_with(Session::default());
        engine.seed_defaults(false).unwrap();

        let session = stored(engine);
        assert!(session.tutorial.defaults_offered);
        assert!(session.stats.is_empty());
    }

    #[test]
    fn complete_task_feeds_stat_and_points() {
        let mut session = onboarded();
        session.stats.push(Stat::new("Strength", 3));
        session.tasks.push(Task::new("Workout", 0, TODAY - DAY_MS));
        let mut engine = engine_with(session);

        let notice = engine.complete_task(0).unwrap();
        assert_eq!(notice, Notice::new("+1 reward, +1 Strength", View::Main));
        assert!(!engine.is_pending(0));

        let session = stored(engine);
        assert_eq!(session.tasks[0].last_completed, TODAY);
        assert_eq!(session.stats[0].value, 4);
        assert_eq!(session.profile.points, 1);
    }

    #[test]
    fn complete_task_twice_a_day_is_rejected_without_mutation() {
        let mut session = onboarded();
        session.stats.push(Stat::new("Strength", 3));
        session.tasks.push(Task::new("Workout", 0, TODAY));
        let mut engine = engine_with(session.clone());

        let err = engine.complete_task(0).unwrap_err();
        assert!(matches!(err, Error::AlreadyCompleted(_)));
        assert_eq!(engine.session(), &session);
    }

    #[test]
    fn complete_task_without_points_when_disabled() {
        let mut session = onboarded();
        session.stats.push(Stat::new("Stamina", 0));
        session.tasks.push(Task::new("Cardio", 0, TODAY - DAY_MS));
        let mut store = MemoryStore::new();
        codec::save(&mut store, &session).unwrap();
        let mut config = Config::default();
        config.progression.award_points = false;
        let mut engine = Engine::open(store, clock(), config).unwrap();

        let notice = engine.complete_task(0).unwrap();
        assert_eq!(notice.message, "+1 Stamina");
        assert_eq!(engine.session().profile.points, 0);
    }

    #[test]
    fn completing_the_last_needed_task_levels_up() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 9));
        session.stats.push(Stat::new("B", 11));
        session.tasks.push(Task::new("t", 0, TODAY - DAY_MS));
        let mut engine = engine_with(session);

        let notice = engine.complete_task(0).unwrap();
        assert_eq!(notice, Notice::new("Leveled up!", View::Main));

        let session = stored(engine);
        assert_eq!(session.profile.level, 2);
        assert_eq!(session.stats[0].value, 0);
        assert_eq!(session.stats[1].value, 1);
        assert_eq!(session.profile.points, 1);
    }

    #[test]
    fn counters_at_their_maximum_saturate() {
        let mut session = onboarded();
        session.profile.points = u64::MAX;
        session.stats.push(Stat::new("Strength", u32::MAX));
        session.stats.push(Stat::new("Stamina", 0));
        session.tasks.push(Task::new("Workout", 0, TODAY - DAY_MS));
        let mut engine = engine_with(session);

        let notice = engine.complete_task(0).unwrap();
        assert_eq!(notice.message, "+1 reward, +1 Strength");

        let session = stored(engine);
        assert_eq!(session.stats[0].value, u32::MAX);
        assert_eq!(session.profile.points, u64::MAX);
        assert_eq!(session.tasks[0].last_completed, TODAY);
    }

    #[test]
    fn level_saturates_at_maximum() {
        let mut session = onboarded();
        session.profile.level = u32::MAX;
        session.stats = vec![Stat::new("A", 12)];
        let mut engine = engine_with(session);

        assert!(engine.check_level_up().unwrap().is_some());
        let session = stored(engine);
        assert_eq!(session.profile.level, u32::MAX);
        assert_eq!(session.stats[0].value, 2);
    }

    #[test]
    fn sweep_counts_far_past_completion_as_missed() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        session.tasks.push(Task::new("ancient", 0, Timestamp::MIN));
        let mut engine = engine_with(session);

        assert_eq!(engine.startup(&mut rng()).unwrap(), Startup::Ready { missed: 1 });
        assert_eq!(stored(engine).tasks[0].last_completed, TODAY - DAY_MS);
    }

    #[test]
    fn level_up_consumes_ten_from_each_stat() {
        let mut session = onboarded();
        session.profile.level = 4;
        session.stats = vec![Stat::new("A", 10), Stat::new("B", 10), Stat::new("C", 10)];
        let mut engine = engine_with(session);

        assert!(engine.check_level_up().unwrap().is_some());
        let session = stored(engine);
        assert_eq!(session.profile.level, 5);
        assert!(session.stats.iter().all(|stat| stat.value == 0));
    }

    #[test]
    fn level_up_carries_surplus() {
        let mut session = onboarded();
        session.stats = vec![Stat::new("A", 15), Stat::new("B", 15)];
        let mut engine = engine_with(session);

        engine.check_level_up().unwrap();
        assert_eq!(engine.session().profile.level, 2);
        assert!(engine.session().stats.iter().all(|stat| stat.value == 5));
    }

    #[test]
    fn level_up_happens_once_per_check() {
        let mut session = onboarded();
        session.stats = vec![Stat::new("A", 25)];
        let mut engine = engine_with(session);

        engine.check_level_up().unwrap();
        assert_eq!(engine.session().profile.level, 2);
        assert_eq!(engine.session().stats[0].value, 15);
    }

    #[test]
    fn no_level_up_without_stats_or_below_threshold() {
        let mut engine = engine_with(onboarded());
        assert_eq!(engine.check_level_up().unwrap(), None);

        let mut session = onboarded();
        session.stats = vec![Stat::new("A", 10), Stat::new("B", 9)];
        let mut engine = engine_with(session);
        assert_eq!(engine.check_level_up().unwrap(), None);
        assert_eq!(engine.session().profile.level, 1);
    }

    #[test]
    fn buy_reward_boundary() {
        let mut session = onboarded();
        session.profile.points = 5;
        session.rewards = vec![Reward::new("Pricey", 6), Reward::new("Exact", 5)];
        let mut engine = engine_with(session);

        let err = engine.buy_reward(0).unwrap_err();
        assert!(matches!(err, Error::InsufficientPoints { points: 5, cost: 6 }));
        assert_eq!(engine.session().profile.points, 5);

        let notice = engine.buy_reward(1).unwrap();
        assert_eq!(notice, Notice::new("Reward: Exact!", View::Rewards));
        assert_eq!(stored(engine).profile.points, 0);
    }

    #[test]
    fn free_reward_is_always_affordable() {
        let mut session = onboarded();
        session.rewards = vec![Reward::new("Walk", 0)];
        let mut engine = engine_with(session);

        engine.buy_reward(0).unwrap();
        assert_eq!(engine.session().profile, Profile { level: 1, points: 0 });
    }

    #[test]
    fn add_and_rename_stat() {
        let mut engine = engine_with(onboarded());
        engine.save_stat(None, "Focus").unwrap();
        engine.save_stat(Some(0), "Deep focus").unwrap();

        let session = stored(engine);
        assert_eq!(session.stats, vec![Stat::new("Deep focus", 0)]);
        assert!(session.tutorial.stats);
    }

    #[test]
    fn empty_or_multiline_titles_do_not_commit() {
        let mut engine = engine_with(onboarded());
        assert!(matches!(
            engine.save_stat(None, ""),
            Err(Error::InvalidTitle(_))
        ));
        assert!(matches!(
            engine.save_stat(None, "two\nlines"),
            Err(Error::InvalidTitle(_))
        ));
        assert!(matches!(
            engine.save_stat(None, "a\rb"),
            Err(Error::InvalidTitle(_))
        ));
        assert!(engine.session().stats.is_empty());
    }

    #[test]
    fn remove_stat_cascades_to_tasks() {
        let mut session = onboarded();
        session.stats = vec![Stat::new("A", 0), Stat::new("B", 0), Stat::new("C", 0)];
        session.tasks = vec![
            Task::new("on A", 0, TODAY),
            Task::new("on B", 1, TODAY),
            Task::new("on C", 2, TODAY),
        ];
        let mut engine = engine_with(session);

        assert_eq!(engine.remove_stat(1).unwrap(), 1);

        let session = stored(engine);
        assert_eq!(
            session.tasks,
            vec![Task::new("on A", 0, TODAY), Task::new("on C", 1, TODAY)]
        );
        assert_eq!(session.stats, vec![Stat::new("A", 0), Stat::new("C", 0)]);
    }

    #[test]
    fn task_creation_needs_a_stat() {
        let mut engine = engine_with(onboarded());
        assert!(matches!(
            engine.save_task(None, "Workout", 0),
            Err(Error::NoStats)
        ));
    }

    #[test]
    fn task_creation_starts_pending() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        let mut engine = engine_with(session);

        engine.save_task(None, "Read", 0).unwrap();
        assert!(engine.is_pending(0));

        let session = stored(engine);
        assert_eq!(session.tasks, vec![Task::new("Read", 0, TODAY - DAY_MS)]);
        assert!(session.tutorial.tasks);
    }

    #[test]
    fn task_must_reference_existing_stat() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        let mut engine = engine_with(session);

        assert!(matches!(
            engine.save_task(None, "Read", 1),
            Err(Error::StatNotFound(1))
        ));
    }

    #[test]
    fn edit_task_keeps_completion_date() {
        let mut session = onboarded();
        session.stats = vec![Stat::new("A", 0), Stat::new("B", 0)];
        session.tasks.push(Task::new("Read", 0, TODAY));
        let mut engine = engine_with(session);

        engine.save_task(Some(0), "Read more", 1).unwrap();
        assert_eq!(engine.session().tasks[0], Task::new("Read more", 1, TODAY));
    }

    #[test]
    fn remove_task_and_unknown_index() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        session.tasks = vec![Task::new("x", 0, TODAY), Task::new("y", 0, TODAY)];
        let mut engine = engine_with(session);

        assert_eq!(engine.remove_task(0).unwrap().title, "x");
        assert!(matches!(engine.remove_task(5), Err(Error::TaskNotFound(5))));
        assert_eq!(stored(engine).tasks, vec![Task::new("y", 0, TODAY)]);
    }

    #[test]
    fn reward_edit_requires_parseable_cost() {
        let mut engine = engine_with(onboarded());
        engine.save_reward(None, "Movie night", "3").unwrap();

        assert!(matches!(
            engine.save_reward(Some(0), "Movie night", "three"),
            Err(Error::InvalidCost(_))
        ));
        assert!(matches!(
            engine.save_reward(Some(0), "Movie night", "-2"),
            Err(Error::InvalidCost(_))
        ));
        engine.save_reward(Some(0), "Cinema", " 4 ").unwrap();

        let session = stored(engine);
        assert_eq!(session.rewards, vec![Reward::new("Cinema", 4)]);
        assert!(session.tutorial.rewards);
    }

    #[test]
    fn remove_reward() {
        let mut session = onboarded();
        session.rewards = vec![Reward::new("a", 1), Reward::new("b", 2)];
        let mut engine = engine_with(session);

        engine.remove_reward(1).unwrap();
        assert!(matches!(
            engine.remove_reward(1),
            Err(Error::RewardNotFound(1))
        ));
        assert_eq!(stored(engine).rewards, vec![Reward::new("a", 1)]);
    }

    #[test]
    fn single_miss_is_clamped_without_penalty() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        session.tasks.push(Task::new("t", 0, TODAY - 3 * DAY_MS));
        let mut engine = engine_with(session);

        let startup = engine.startup(&mut rng()).unwrap();
        assert_eq!(startup, Startup::Ready { missed: 1 });
        assert_eq!(startup.notice(), None);
        assert_eq!(stored(engine).tasks[0].last_completed, TODAY - DAY_MS);
    }

    #[test]
    fn two_misses_draw_a_penalty() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        session.tasks = vec![
            Task::new("t1", 0, TODAY - 3 * DAY_MS),
            Task::new("t2", 0, TODAY - 2 * DAY_MS),
            Task::new("t3", 0, TODAY - DAY_MS),
            Task::new("t4", 0, TODAY),
        ];
        let mut engine = engine_with(session);

        let startup = engine.startup(&mut rng()).unwrap();
        match &startup {
            Startup::Penalty { missed, penalty } => {
                assert_eq!(*missed, 2);
                assert!(penalty::DEFAULT_PENALTIES.contains(&penalty.as_str()));
            }
            other => panic!("unexpected startup: {other:?}"),
        }
        let notice = startup.notice().expect("notice");
        assert!(notice.message.starts_with("Penalty: "));

        let lasts: Vec<Timestamp> = engine
            .session()
            .tasks
            .iter()
            .map(|task| task.last_completed)
            .collect();
        assert_eq!(lasts, vec![TODAY - DAY_MS, TODAY - DAY_MS, TODAY - DAY_MS, TODAY]);
    }

    #[test]
    fn sweep_is_idempotent_within_a_day() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        session.tasks = vec![
            Task::new("t1", 0, TODAY - 4 * DAY_MS),
            Task::new("t2", 0, TODAY - 9 * DAY_MS),
        ];
        let mut engine = engine_with(session);
        assert_eq!(engine.startup(&mut rng()).unwrap().missed(), 2);
        let after_first = engine.session().clone();

        let mut engine = Engine::open(engine.into_store(), clock(), Config::default()).unwrap();
        assert_eq!(engine.startup(&mut rng()).unwrap(), Startup::Ready { missed: 0 });
        assert_eq!(engine.session(), &after_first);
    }

    #[test]
    fn next_day_after_clamp_counts_again() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        session.tasks.push(Task::new("t", 0, TODAY - 2 * DAY_MS));
        let mut engine = engine_with(session);
        engine.startup(&mut rng()).unwrap();

        let tomorrow = clock().plus_days(1);
        let mut engine = Engine::open(engine.into_store(), tomorrow, Config::default()).unwrap();
        assert_eq!(engine.startup(&mut rng()).unwrap(), Startup::Ready { missed: 1 });
        assert_eq!(engine.session().tasks[0].last_completed, TODAY);
    }

    #[test]
    fn failed_persist_propagates() {
        let mut session = onboarded();
        session.stats.push(Stat::new("A", 0));
        let mut store = MemoryStore::new();
        codec::save(&mut store, &session).unwrap();
        store.set_unavailable(true);
        let mut engine = Engine::open(store, clock(), Config::default()).unwrap();

        let err = engine.save_stat(None, "B").unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));

        let mut store = engine.into_store();
        store.set_unavailable(false);
        assert_eq!(codec::load(&store).unwrap().stats, vec![Stat::new("A", 0)]);
    }

    #[test]
    fn dismiss_panel_persists_flag() {
        let mut engine = engine_with(onboarded());
        engine.dismiss_panel(Panel::Tasks).unwrap();
        assert!(stored(engine).tutorial.tasks);
    }
}
