//! levelup - Personal Progression Library
//!
//! This library provides the core functionality for the levelup CLI tool,
//! turning daily habits into a small role-playing progression.
//!
//! # Core Concepts
//!
//! - **Stats**: Named counters raised by completing tasks
//! - **Tasks**: Daily quests, each feeding one stat
//! - **Levels**: Gained when every stat reaches 10, surplus carries over
//! - **Rewards**: Priced in points earned from completed tasks
//! - **Penalties**: Drawn when more than one task was skipped
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `clock`: Local-midnight day boundaries
//! - `codec`: Line-oriented text records
//! - `config`: Configuration loading from `levelup.toml`
//! - `defaults`: Starter stats, tasks and rewards
//! - `engine`: Progression state machine and missed-day sweep
//! - `error`: Error types and result aliases
//! - `model`: Profile, collections and tutorial flags
//! - `output`: Human and JSON output
//! - `penalty`: Penalty catalog and random draw
//! - `store`: Key-value store over the data directory

pub mod cli;
pub mod clock;
pub mod codec;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod penalty;
pub mod store;

pub use error::{Error, Result};
