use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config, DEFAULT_TOP};
use crate::profiles::BusinessProfile;
use crate::scoring::validation::sums_to_one;
use crate::scoring::{
    DemandWeights, FrictionWeights, GrowthWeights, TopWeights, WeightConfig, MAX_CLUSTERING_BENEFIT,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(12));
    }
    println!();
}

/// Parse a weight entered at 2-decimal granularity.
fn parse_weight(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", input.trim()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err("must be between 0 and 1".to_string());
    }
    Ok(value)
}

/// One-line status shown after each group is entered.
fn group_status(group: &str, sum: f64) -> String {
    if sums_to_one(sum) {
        format!("  {} weights sum to {:.2} - balanced.", group, sum)
    } else {
        format!(
            "  {} weights sum to {:.2}, not 1.00. Scores still compute but will be flagged.",
            group, sum
        )
    }
}

fn prompt_weight(label: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(&format!("  {}", label), &format!("{:.2}", default))?;
        match parse_weight(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Prompt for the three weights of a group until they balance or the user
/// accepts the imbalance.
fn prompt_group(group: &str, labels: [&str; 3], defaults: [f64; 3]) -> Result<[f64; 3]> {
    loop {
        let mut values = [0.0; 3];
        for (slot, (label, default)) in values.iter_mut().zip(labels.iter().zip(defaults)) {
            *slot = prompt_weight(label, default)?;
        }
        let sum: f64 = values.iter().sum();
        println!("{}", group_status(group, sum));
        if sums_to_one(sum) || !prompt_yes_no("  Re-enter this group?", true)? {
            return Ok(values);
        }
    }
}

fn prompt_weights(defaults: &WeightConfig) -> Result<WeightConfig> {
    typewriter("Location Score = Demand x w_demand - Friction x w_friction + Growth x w_growth.");
    let [demand, friction, growth] = prompt_group(
        "Top-level",
        ["Demand", "Friction", "Growth"],
        [defaults.top.demand, defaults.top.friction, defaults.top.growth],
    )?;

    println!();
    typewriter("Demand measures revenue potential.");
    let [income, foot_traffic, population] = prompt_group(
        "Demand",
        ["Income", "Foot traffic", "Population density"],
        [
            defaults.demand.income,
            defaults.demand.foot_traffic,
            defaults.demand.population,
        ],
    )?;

    println!();
    typewriter("Friction measures operating resistance. Competition is discounted by the business type's clustering benefit.");
    let [competition, rent, accessibility] = prompt_group(
        "Friction",
        ["Competition", "Commercial rent", "Accessibility penalty"],
        [
            defaults.friction.competition,
            defaults.friction.rent,
            defaults.friction.accessibility,
        ],
    )?;

    println!();
    typewriter("Growth measures where the area is heading.");
    let [trend, vacancy, infrastructure] = prompt_group(
        "Growth",
        ["Area growth trend", "Vacancy improvement", "Infrastructure investment"],
        [
            defaults.growth.trend,
            defaults.growth.vacancy,
            defaults.growth.infrastructure,
        ],
    )?;

    Ok(WeightConfig {
        top: TopWeights {
            demand,
            friction,
            growth,
        },
        demand: DemandWeights {
            income,
            foot_traffic,
            population,
        },
        friction: FrictionWeights {
            competition,
            rent,
            accessibility,
        },
        growth: GrowthWeights {
            trend,
            vacancy,
            infrastructure,
        },
    })
}

/// Score the bundled dataset with `weights` and print the top three.
fn preview(weights: &WeightConfig) -> Result<()> {
    let locations = crate::dataset::bundled_dataset()?;
    let scored = crate::scoring::score_all(&locations, weights)?;
    let ranked = crate::ranking::rank(scored);
    println!();
    println!("Preview on the bundled Kolkata dataset:");
    for r in ranked.iter().take(3) {
        println!("  {}. {} ({:.1})", r.rank, r.result.name, r.result.location_score);
    }
    Ok(())
}

/// Run the interactive wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Site Ranker Configuration Wizard");
    println!("================================");
    println!();

    // 1. Weights
    let configure_weights = prompt_yes_no("Tune scoring weights? (n accepts defaults)", true)?;
    let weights = if configure_weights {
        println!();
        let weights = prompt_weights(&WeightConfig::DEFAULT)?;
        preview(&weights)?;
        Some(weights)
    } else {
        None
    };

    // 2. Custom business profiles
    println!();
    typewriter("Business types decide how much nearby competitors hurt. Restaurants benefit from clustering (0.5); offices don't (0.0).");
    let mut config = Config {
        weights,
        ..Config::default()
    };
    let mut add_profile = prompt_yes_no("Add a custom business type?", false)?;
    while add_profile {
        let name = loop {
            let n = prompt("  Business type: ")?;
            if !n.trim().is_empty() {
                break n;
            }
            println!("  Business type is required.");
        };
        let clustering_benefit = loop {
            let input = prompt_with_default("  Clustering benefit (0 to 0.5)", "0.15")?;
            match input.parse::<f64>() {
                Ok(v) if (0.0..=MAX_CLUSTERING_BENEFIT).contains(&v) => break v,
                _ => println!("  Invalid: must be a number between 0 and 0.5. Try again."),
            }
        };
        config.profiles.insert(
            name,
            BusinessProfile {
                clustering_benefit,
                demand: None,
                friction: None,
                growth: None,
            },
        );
        add_profile = prompt_yes_no("  Add another business type?", false)?;
    }

    // 3. Result count
    println!();
    let top = loop {
        let input = prompt_with_default("How many locations to show", &DEFAULT_TOP.to_string())?;
        match input.parse::<usize>() {
            Ok(v) if v >= 1 => break v,
            _ => println!("  Invalid: must be a whole number of at least 1. Try again."),
        }
    };
    if top != DEFAULT_TOP {
        config.top = Some(top);
    }

    // 4. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `site-ranker --business <type>` to rank locations.");

    Ok(())
}
