use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use site_ranker::analyze::{analyze, resolve_profile, Analysis, AnalysisOptions};
use site_ranker::config::Config;
use site_ranker::dataset::{bundled_dataset, load_dataset, DatasetError};
use site_ranker::output;
use site_ranker::profiles::ResolvedProfile;
use site_ranker::scoring::{score, IndicatorScale, IndicatorSet};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_IO: i32 = 2;
const EXIT_VALIDATION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

/// Options shared by `rank` and `export`
#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// Dataset file (.yaml, .yml, .json or .csv). Defaults to the config
    /// `dataset`, then the bundled Kolkata neighbourhoods
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Business type, e.g. "cafe" or "tech office"
    #[arg(long)]
    business: Option<String>,

    /// Monthly rent budget in INR; pricier areas are skipped
    #[arg(long)]
    budget: Option<f64>,

    /// Number of locations to keep (default 5)
    #[arg(long)]
    top: Option<usize>,

    /// Dataset values are already on a 0-1 scale
    #[arg(long)]
    normalized: bool,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Location name
    #[arg(long)]
    name: String,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    lon: f64,

    #[arg(long)]
    income: f64,

    #[arg(long)]
    foot_traffic: f64,

    #[arg(long)]
    population: f64,

    #[arg(long)]
    competition: f64,

    #[arg(long)]
    rent: f64,

    #[arg(long)]
    accessibility: f64,

    #[arg(long)]
    trend: f64,

    #[arg(long)]
    vacancy: f64,

    #[arg(long)]
    infrastructure: f64,

    /// Clustering benefit factor (0 to 0.5); overrides the business type's
    #[arg(long, conflicts_with = "business")]
    cbf: Option<f64>,

    /// Business type used for the clustering benefit and sub-weights
    #[arg(long)]
    business: Option<String>,

    /// Indicator values are already on a 0-1 scale
    #[arg(long)]
    normalized: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank locations by score (default if no subcommand)
    Rank {
        #[command(flatten)]
        pipeline: PipelineArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Score a single location given on the command line
    Score(ScoreArgs),
    /// Show the effective weights and whether each group sums to 1.00
    Weights {
        /// Apply this business type's sub-weights
        #[arg(long)]
        business: Option<String>,
    },
    /// Rank locations and write the result as CSV
    Export {
        /// Output file
        path: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "site-ranker")]
#[command(about = "Neighbourhood scoring and ranking for new business locations", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/site-ranker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = site_ranker::telemetry::init(site_ranker::telemetry::default_level(cli.verbose)) {
        eprintln!("Logging disabled: {}", e);
    }

    let command = cli.command.unwrap_or(Commands::Rank {
        pipeline: PipelineArgs::default(),
        format: OutputFormat::Table,
    });
    let config_path = cli.config.map(PathBuf::from);

    // The wizard writes the config, so it runs before one is loaded
    if let Commands::Init = command {
        if let Err(e) = site_ranker::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_IO);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let start_time = Instant::now();

    // Load config
    let config = match site_ranker::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = site_ranker::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = output::should_use_colors();

    match command {
        Commands::Rank { pipeline, format } => {
            let analysis = run_pipeline(&pipeline, &config);
            let business = pipeline.business.as_deref().unwrap_or("business");

            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "business_type": pipeline.business,
                    "clustering_benefit_factor": analysis.profile.clustering_benefit,
                    "total_locations": analysis.total_locations,
                    "excluded_by_budget": analysis.excluded_by_budget,
                    "locations": analysis.ranked,
                    "summary": analysis.summary,
                })),
                OutputFormat::Tsv => {
                    let tsv = output::format_tsv(&analysis.ranked);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                OutputFormat::Table => {
                    if cli.verbose && !analysis.ranked.is_empty() {
                        // Verbose mode: breakdown and insights per location
                        for r in &analysis.ranked {
                            let insights = output::generate_insights(&r.result, business);
                            println!("{}", output::format_detail(r, &insights, use_colors));
                            println!();
                        }
                    } else {
                        println!("{}", output::format_ranked_table(&analysis.ranked, use_colors));
                        println!();
                    }
                    println!("{}", output::format_summary(&analysis.summary));
                    if analysis.excluded_by_budget > 0 {
                        println!(
                            "{} of {} locations excluded by budget.",
                            analysis.excluded_by_budget, analysis.total_locations
                        );
                    }
                }
            }
        }
        Commands::Score(args) => {
            let profile = match args.cbf {
                Some(cbf) => ResolvedProfile {
                    clustering_benefit: cbf,
                    ..resolve_profile(None, &config)
                },
                None => resolve_profile(args.business.as_deref(), &config),
            };
            if args.business.is_some() && !profile.known {
                warn!(
                    business_type = args.business.as_deref().unwrap_or_default(),
                    "unknown business type, using default weights"
                );
            }

            let indicators = score_input(&args).with_clustering_benefit(profile.clustering_benefit);
            let clamped = indicators.clamped_fields();
            if !clamped.is_empty() {
                warn!(location = %indicators.name, fields = ?clamped, "values outside declared range were clamped");
            }

            let result = match score(&indicators, &profile.weights) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Invalid location: {}", e);
                    std::process::exit(EXIT_VALIDATION);
                }
            };

            match args.format {
                OutputFormat::Json => print_json(&result),
                OutputFormat::Tsv => println!(
                    "{:.1}\t{:.1}\t{:.1}\t{:.1}\t{}",
                    result.location_score,
                    result.demand_score,
                    result.friction_score,
                    result.growth_score,
                    result.name
                ),
                OutputFormat::Table => {
                    println!("{}", output::format_single(&result, use_colors));
                    let business = args.business.as_deref().unwrap_or("business");
                    for bullet in output::generate_insights(&result, business) {
                        println!("  - {}", bullet);
                    }
                }
            }
        }
        Commands::Weights { business } => {
            let profile = resolve_profile(business.as_deref(), &config);
            println!("{}", output::format_weights(&profile.weights, use_colors));
            if let Some(bt) = business.as_deref() {
                println!();
                if profile.known {
                    println!("Clustering benefit for {}: {:.2}", bt, profile.clustering_benefit);
                } else {
                    println!(
                        "Unknown business type '{}': default weights, clustering benefit {:.2}",
                        bt, profile.clustering_benefit
                    );
                }
            }
        }
        Commands::Export { path, pipeline } => {
            let analysis = run_pipeline(&pipeline, &config);
            if let Err(e) = output::export_csv(&path, &analysis.ranked) {
                eprintln!("Export failed: {:#}", e);
                std::process::exit(EXIT_IO);
            }
            println!("Exported {} locations to {}", analysis.ranked.len(), path.display());
        }
        Commands::Init => unreachable!("handled before config loading"),
    }

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

/// Load the dataset and run filter, score and rank. Exits on failure.
fn run_pipeline(args: &PipelineArgs, config: &Config) -> Analysis {
    if args.top == Some(0) {
        eprintln!("--top must be at least 1");
        std::process::exit(EXIT_CONFIG);
    }
    if args.budget.is_some_and(|b| !b.is_finite() || b <= 0.0) {
        eprintln!("--budget must be a positive amount");
        std::process::exit(EXIT_CONFIG);
    }

    let locations = match load_locations(args, config) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Dataset error: {}", e);
            let code = match e {
                DatasetError::Io { .. } => EXIT_IO,
                _ => EXIT_VALIDATION,
            };
            std::process::exit(code);
        }
    };
    debug!(count = locations.len(), "loaded locations");

    let options = AnalysisOptions {
        business_type: args.business.clone(),
        budget: args.budget,
        top: args.top,
    };
    match analyze(locations, &options, config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Invalid location: {}", e);
            std::process::exit(EXIT_VALIDATION);
        }
    }
}

fn load_locations(args: &PipelineArgs, config: &Config) -> Result<Vec<IndicatorSet>, DatasetError> {
    let scale = if args.normalized {
        IndicatorScale::Unit
    } else {
        IndicatorScale::Percent
    };
    match args.dataset.as_ref().or(config.dataset.as_ref()) {
        Some(path) => {
            debug!(path = %path.display(), ?scale, "loading dataset");
            load_dataset(path, scale)
        }
        None => {
            if args.normalized {
                warn!("--normalized ignored for the bundled dataset");
            }
            bundled_dataset()
        }
    }
}

fn score_input(args: &ScoreArgs) -> IndicatorSet {
    IndicatorSet {
        name: args.name.clone(),
        latitude: args.lat,
        longitude: args.lon,
        income_index: args.income,
        foot_traffic_index: args.foot_traffic,
        population_density_index: args.population,
        competition_index: args.competition,
        commercial_rent_index: args.rent,
        accessibility_penalty: args.accessibility,
        clustering_benefit_factor: 0.0,
        area_growth_trend: args.trend,
        vacancy_rate_improvement: args.vacancy,
        infrastructure_investment_index: args.infrastructure,
        scale: if args.normalized {
            IndicatorScale::Unit
        } else {
            IndicatorScale::Percent
        },
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_IO);
        }
    }
}
