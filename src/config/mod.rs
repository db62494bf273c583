mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{BudgetConfig, Config, DEFAULT_TOP};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::scoring::MAX_CLUSTERING_BENEFIT;

/// Get the config directory path (~/.config/site-ranker/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("site-ranker"))
}

/// Get the default config file path (~/.config/site-ranker/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// With an explicit `path` the file must exist. Without one, the default path
/// is tried and built-in defaults are used when nothing is there.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(serde_saphyr::from_str(content)?)
}

/// Write configuration atomically, creating parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
        }
    }

    let yaml = serde_saphyr::to_string(config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Weights outside [0, 1], by dotted path. Scoring clamps them and flags the
/// affected group, so these are warnings rather than config errors.
pub fn out_of_range_weights(config: &Config) -> Vec<String> {
    let mut problems = Vec::new();

    if let Some(ref weights) = config.weights {
        for (path, w) in weights.entries() {
            if !(0.0..=1.0).contains(&w) {
                problems.push(format!("weights.{}: {} is outside [0, 1]", path, w));
            }
        }
    }

    for (name, profile) in &config.profiles {
        let groups = [
            profile.demand.map(|d| {
                [
                    ("demand.income", d.income),
                    ("demand.foot_traffic", d.foot_traffic),
                    ("demand.population", d.population),
                ]
            }),
            profile.friction.map(|f| {
                [
                    ("friction.competition", f.competition),
                    ("friction.rent", f.rent),
                    ("friction.accessibility", f.accessibility),
                ]
            }),
            profile.growth.map(|g| {
                [
                    ("growth.trend", g.trend),
                    ("growth.vacancy", g.vacancy),
                    ("growth.infrastructure", g.infrastructure),
                ]
            }),
        ];
        for (path, w) in groups.into_iter().flatten().flatten() {
            if !(0.0..=1.0).contains(&w) {
                problems.push(format!("profiles.{}.{}: {} is outside [0, 1]", name, path, w));
            }
        }
    }

    problems
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// Weight groups that don't sum to 1.00 and weights outside [0, 1] are not
/// errors here; they are logged and scoring reports them per result.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for problem in out_of_range_weights(config) {
        warn!("{}; clamped for scoring", problem);
    }

    for (name, profile) in &config.profiles {
        if name.trim().is_empty() {
            errors.push("profiles: business type name must not be empty".to_string());
        }
        if !(0.0..=MAX_CLUSTERING_BENEFIT).contains(&profile.clustering_benefit) {
            errors.push(format!(
                "profiles.{}.clustering_benefit: {} is outside [0, {}]",
                name, profile.clustering_benefit, MAX_CLUSTERING_BENEFIT
            ));
        }
    }

    if let Some(ref budget) = config.budget {
        if !(budget.rent_ceiling > 0.0) {
            errors.push("budget.rent_ceiling: must be positive".to_string());
        }
        if !(budget.tolerance > 0.0) {
            errors.push("budget.tolerance: must be positive".to_string());
        }
    }

    if config.top == Some(0) {
        errors.push("top: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
