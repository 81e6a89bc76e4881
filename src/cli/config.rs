//! levelup config commands
//!
//! These never open the records, so they run no startup routine.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

use super::{config_path, GlobalOptions};

#[derive(serde::Serialize)]
struct ShowReport {
    path: PathBuf,
    exists: bool,
    config: Config,
}

pub fn run_show(globals: &GlobalOptions) -> Result<()> {
    let path = config_path(&globals.data_dir);
    let exists = path.exists();
    let config = if exists {
        Config::load(&path)?
    } else {
        Config::default()
    };

    let mut human = HumanOutput::new(format!("levelup config: {}", path.display()));
    human.push_summary("source", if exists { "file" } else { "defaults" });
    human.push_summary("award points", config.progression.award_points.to_string());
    human.push_summary("penalties", config.penalties.catalog.len().to_string());
    for entry in &config.penalties.catalog {
        human.push_detail(entry.clone());
    }
    if !exists {
        human.push_next_step("levelup config init");
    }

    let report = ShowReport {
        path,
        exists,
        config,
    };
    emit_success(globals.output(), "config show", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct InitReport {
    path: PathBuf,
    created: bool,
}

pub fn run_init(globals: &GlobalOptions) -> Result<()> {
    let path = config_path(&globals.data_dir);
    let created = ensure_config(&path)?;

    let header = if created {
        format!("Created {}", path.display())
    } else {
        format!("{} already exists", path.display())
    };
    let mut human = HumanOutput::new(header);
    human.push_next_step("levelup config show");

    let report = InitReport { path, created };
    emit_success(globals.output(), "config init", &report, Some(&human))
}

fn ensure_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Config::default().save(path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(true)
}
