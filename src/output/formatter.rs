use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::ranking::{RankedResult, RankingSummary};
use crate::scoring::{ScoreResult, WeightConfig, WeightValidation};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a display score with one decimal.
/// If unbalanced is true, appends asterisk to flag scores from weights that
/// don't sum to 1.00
pub fn format_score(score: f64, unbalanced: bool) -> String {
    // Avoid "-0.0"
    let score = if score == 0.0 { 0.0 } else { score };
    if unbalanced {
        format!("{:.1}*", score)
    } else {
        format!("{:.1}", score)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked locations as a table with columns: Rank, Score, Name,
/// Demand/Friction/Growth
/// No headers (minimal format)
/// Rank column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 7 chars wide (fits "-35.0*")
pub fn format_ranked_table(ranked: &[RankedResult], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No locations matched.".to_string();
    }

    let term_width = get_terminal_width();

    let rank_width = 3;
    let score_width = 7;
    let separator = "  ";
    // "D 100.0  F 100.0  G 100.0"
    let parts_width = 25;

    ranked
        .iter()
        .map(|r| {
            let rank_str = format!("{:>2}.", r.rank);
            let unbalanced = !r.result.weight_validation.all_valid();
            let score_str = format_score(r.result.location_score, unbalanced);
            let score_padded = format!("{:>width$}", score_str, width = score_width);
            let parts = format!(
                "D {:>5.1}  F {:>5.1}  G {:>5.1}",
                r.result.demand_score, r.result.friction_score, r.result.growth_score
            );

            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + parts_width;

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&r.result.name, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_name(&r.result.name, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                r.result.name.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    parts.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_padded, separator, name, separator, parts
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked locations as tab-separated values for scripting
/// Columns: rank, score, name, latitude, longitude (no headers, no colors)
pub fn format_tsv(ranked: &[RankedResult]) -> String {
    if ranked.is_empty() {
        return String::new();
    }

    ranked
        .iter()
        .map(|r| {
            format!(
                "{}\t{:.1}\t{}\t{}\t{}",
                r.rank,
                r.result.location_score,
                r.result.name,
                r.result.latitude,
                r.result.longitude
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary under the table.
pub fn format_summary(summary: &RankingSummary) -> String {
    match (&summary.top, summary.average_score, &summary.cheapest) {
        (Some(top), Some(avg), Some(cheapest)) => format!(
            "Best: {} ({})  |  Average: {}  |  Lowest rent: {} ({})",
            top.name,
            format_score(top.score, false),
            format_score(avg, false),
            cheapest.name,
            cheapest.commercial_rent_index
        ),
        _ => "No locations to summarize.".to_string(),
    }
}

/// Multi-line breakdown of one score (for verbose mode)
pub fn format_detail(r: &RankedResult, insights: &[String], use_colors: bool) -> String {
    let result = &r.result;
    let header = format!("{}. {}", r.rank, result.name);
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    lines.push(format!(
        "  Location: {:.4}, {:.4}",
        result.latitude, result.longitude
    ));
    lines.push(format!(
        "  Score: {}",
        format_score(result.location_score, !result.weight_validation.all_valid())
    ));
    lines.push(format!(
        "  Clustering benefit: {:.2} (adjusted competition {:.3})",
        result.clustering_benefit_factor, result.adjusted_competition
    ));

    for (label, display, terms) in [
        ("Demand", result.demand_score, &result.breakdown.demand_terms),
        ("Friction", result.friction_score, &result.breakdown.friction_terms),
        ("Growth", result.growth_score, &result.breakdown.growth_terms),
    ] {
        lines.push(format!("  {}: {:.1}", label, display));
        for t in terms {
            lines.push(format!(
                "    {:<26} {:.2} x {:.3} = {:.4}",
                t.label, t.weight, t.value, t.contribution
            ));
        }
    }

    let invalid = result.weight_validation.invalid_groups();
    if !invalid.is_empty() {
        let warning = format!("  Unbalanced weight groups: {}", invalid.join(", "));
        lines.push(if use_colors {
            warning.yellow().to_string()
        } else {
            warning
        });
    }

    for bullet in insights {
        lines.push(format!("  - {}", bullet));
    }

    lines.join("\n")
}

/// Scores for a single location (the `score` command).
pub fn format_single(result: &ScoreResult, use_colors: bool) -> String {
    let ranked = RankedResult {
        rank: 1,
        result: result.clone(),
    };
    let detail = format_detail(&ranked, &[], use_colors);
    // Drop the "1. " rank prefix for a lone location
    let mut lines: Vec<String> = detail.lines().map(str::to_string).collect();
    if let Some(first) = lines.first_mut() {
        *first = if use_colors {
            result.name.bold().to_string()
        } else {
            result.name.clone()
        };
    }
    lines.push(format_validation(&result.weight_validation));
    lines.join("\n")
}

pub fn format_validation(v: &WeightValidation) -> String {
    let mark = |ok: bool| if ok { "ok" } else { "unbalanced" };
    format!(
        "  Weights: top {}, demand {}, friction {}, growth {}",
        mark(v.top),
        mark(v.demand),
        mark(v.friction),
        mark(v.growth)
    )
}

/// Effective weight configuration with the sum of each group.
pub fn format_weights(weights: &WeightConfig, use_colors: bool) -> String {
    let v = weights.validate();
    let sums = weights.group_sums();
    let groups = [
        (
            "top",
            v.top,
            format!(
                "demand {:.2}  friction {:.2}  growth {:.2}",
                weights.top.demand, weights.top.friction, weights.top.growth
            ),
        ),
        (
            "demand",
            v.demand,
            format!(
                "income {:.2}  foot_traffic {:.2}  population {:.2}",
                weights.demand.income, weights.demand.foot_traffic, weights.demand.population
            ),
        ),
        (
            "friction",
            v.friction,
            format!(
                "competition {:.2}  rent {:.2}  accessibility {:.2}",
                weights.friction.competition, weights.friction.rent, weights.friction.accessibility
            ),
        ),
        (
            "growth",
            v.growth,
            format!(
                "trend {:.2}  vacancy {:.2}  infrastructure {:.2}",
                weights.growth.trend, weights.growth.vacancy, weights.growth.infrastructure
            ),
        ),
    ];

    groups
        .iter()
        .zip(sums.iter())
        .map(|((name, ok, values), (_, sum))| {
            let status = if *ok {
                format!("sum {:.2}", sum)
            } else {
                format!("sum {:.2} (unbalanced)", sum)
            };
            let status = if use_colors && !ok {
                status.red().to_string()
            } else {
                status
            };
            format!("{:<9} {}  [{}]", name, values, status)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{rank, summarize};
    use crate::scoring::indicators::tests::sample_indicators;
    use crate::scoring::{score, score_default, TopWeights};

    fn ranked_pair() -> Vec<RankedResult> {
        let mut pricey = sample_indicators("Park Street");
        pricey.commercial_rent_index = 82.0;
        rank(vec![
            score_default(&pricey).unwrap(),
            score_default(&sample_indicators("Kasba")).unwrap(),
        ])
    }

    // format_score tests
    #[test]
    fn test_format_score_one_decimal() {
        assert_eq!(format_score(20.4, false), "20.4");
        assert_eq!(format_score(-3.0, false), "-3.0");
    }

    #[test]
    fn test_format_score_negative_zero() {
        assert_eq!(format_score(-0.0, false), "0.0");
    }

    #[test]
    fn test_format_score_unbalanced() {
        assert_eq!(format_score(20.4, true), "20.4*");
    }

    // truncate_name tests
    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Kasba", 20), "Kasba");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("Salt Lake Sector V", 10), "Salt La...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Esplanade", 3), "Esp");
    }

    // format_ranked_table tests
    #[test]
    fn test_ranked_table_empty() {
        assert_eq!(format_ranked_table(&[], false), "No locations matched.");
    }

    #[test]
    fn test_ranked_table_rows() {
        let result = format_ranked_table(&ranked_pair(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("Kasba"));
        assert!(lines[0].contains("22.4"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("Park Street"));
        assert!(lines[0].contains("G  48.5"));
    }

    #[test]
    fn test_ranked_table_flags_unbalanced_weights() {
        let mut weights = WeightConfig::DEFAULT;
        weights.top = TopWeights {
            demand: 0.5,
            friction: 0.3,
            growth: 0.3,
        };
        let ranked = rank(vec![score(&sample_indicators("Kasba"), &weights).unwrap()]);
        let result = format_ranked_table(&ranked, false);
        assert!(result.contains('*'));
    }

    // format_tsv tests
    #[test]
    fn test_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_tsv_columns() {
        let result = format_tsv(&ranked_pair());
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split('\t').count(), 5);
        assert!(lines[0].starts_with("1\t22.4\tKasba\t"));
    }

    #[test]
    fn test_summary_line() {
        let ranked = ranked_pair();
        let line = format_summary(&summarize(&ranked));
        assert!(line.starts_with("Best: Kasba (22.4)"));
        assert!(line.contains("Lowest rent: Kasba (45)"));
    }

    #[test]
    fn test_summary_line_empty() {
        assert_eq!(format_summary(&summarize(&[])), "No locations to summarize.");
    }

    #[test]
    fn test_detail_lists_terms_and_insights() {
        let ranked = ranked_pair();
        let insights = vec!["First insight".to_string()];
        let detail = format_detail(&ranked[0], &insights, false);
        assert!(detail.starts_with("1. Kasba"));
        assert!(detail.contains("Adjusted competition"));
        assert!(detail.contains("Clustering benefit: 0.15"));
        assert!(detail.contains("  - First insight"));
        assert!(!detail.contains("Unbalanced"));
    }

    #[test]
    fn test_single_location_output() {
        let result = score_default(&sample_indicators("Kasba")).unwrap();
        let text = format_single(&result, false);
        assert!(text.starts_with("Kasba\n"));
        assert!(text.contains("Score: 22.4"));
        assert!(text.contains("top ok, demand ok, friction ok, growth ok"));
    }

    #[test]
    fn test_format_weights_marks_unbalanced_group() {
        let mut weights = WeightConfig::DEFAULT;
        weights.growth.trend = 0.6;
        let text = format_weights(&weights, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("[sum 1.00]"));
        assert!(lines[3].starts_with("growth"));
        assert!(lines[3].contains("sum 1.10 (unbalanced)"));
    }
}
