use site_ranker::analyze::{analyze, AnalysisOptions};
use site_ranker::config::{parse_config, Config};
use site_ranker::dataset::{bundled_dataset, parse_document, DatasetFormat};
use site_ranker::output::write_csv;
use site_ranker::ranking::rank;
use site_ranker::scoring::{score_all, IndicatorScale, WeightConfig};

fn all_locations() -> AnalysisOptions {
    AnalysisOptions {
        top: Some(100),
        ..AnalysisOptions::default()
    }
}

#[test]
fn test_bundled_dataset_ranks_every_location() {
    let analysis = analyze(bundled_dataset().unwrap(), &all_locations(), &Config::default()).unwrap();
    assert_eq!(analysis.ranked.len(), 15);

    for (i, r) in analysis.ranked.iter().enumerate() {
        assert_eq!(r.rank, i + 1);
        assert!(r.result.location_score >= -35.0 && r.result.location_score <= 65.0);
        assert!(r.result.weight_validation.all_valid());
    }
    assert!(analysis
        .ranked
        .windows(2)
        .all(|w| w[0].result.location_score >= w[1].result.location_score));

    let mean: f64 = analysis.ranked.iter().map(|r| r.result.location_score).sum::<f64>() / 15.0;
    let avg = analysis.summary.average_score.unwrap();
    assert!((avg - mean).abs() <= 0.05);
}

#[test]
fn test_ranking_is_reproducible() {
    let a = analyze(bundled_dataset().unwrap(), &all_locations(), &Config::default()).unwrap();
    let b = analyze(bundled_dataset().unwrap(), &all_locations(), &Config::default()).unwrap();
    assert_eq!(a.ranked, b.ranked);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn test_cheapest_is_lowest_rent_in_returned_list() {
    let options = AnalysisOptions {
        top: Some(3),
        ..AnalysisOptions::default()
    };
    let analysis = analyze(bundled_dataset().unwrap(), &options, &Config::default()).unwrap();
    let min_rent = analysis
        .ranked
        .iter()
        .map(|r| r.result.indicators.commercial_rent_index)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(analysis.summary.cheapest.unwrap().commercial_rent_index, min_rent);
}

#[test]
fn test_clustering_business_never_scores_lower() {
    // Same sub-weights, only the clustering benefit differs
    let config = parse_config(
        r#"
profiles:
  solo:
    clustering_benefit: 0.0
  cluster:
    clustering_benefit: 0.5
"#,
    )
    .unwrap();

    let run = |bt: &str| {
        let options = AnalysisOptions {
            business_type: Some(bt.to_string()),
            top: Some(100),
            ..AnalysisOptions::default()
        };
        analyze(bundled_dataset().unwrap(), &options, &config).unwrap()
    };
    let solo = run("solo");
    let cluster = run("cluster");

    for s in &solo.ranked {
        let c = cluster
            .ranked
            .iter()
            .find(|c| c.result.name == s.result.name)
            .unwrap();
        assert!(c.result.location_score >= s.result.location_score);
    }
}

#[test]
fn test_ties_keep_input_order() {
    let doc = r#"
locations:
  - { name: First, latitude: 0, longitude: 0, income_index: 50, foot_traffic_index: 50, population_density_index: 50, competition_index: 50, commercial_rent_index: 50, accessibility_penalty: 50, area_growth_trend: 50, vacancy_rate_improvement: 50, infrastructure_investment_index: 50 }
  - { name: Better, latitude: 0, longitude: 0, income_index: 90, foot_traffic_index: 90, population_density_index: 90, competition_index: 10, commercial_rent_index: 10, accessibility_penalty: 10, area_growth_trend: 90, vacancy_rate_improvement: 90, infrastructure_investment_index: 90 }
  - { name: Second, latitude: 0, longitude: 0, income_index: 50, foot_traffic_index: 50, population_density_index: 50, competition_index: 50, commercial_rent_index: 50, accessibility_penalty: 50, area_growth_trend: 50, vacancy_rate_improvement: 50, infrastructure_investment_index: 50 }
"#;
    let locations = parse_document(doc, DatasetFormat::Yaml, IndicatorScale::Percent).unwrap();
    let ranked = rank(score_all(&locations, &WeightConfig::DEFAULT).unwrap());
    let names: Vec<&str> = ranked.iter().map(|r| r.result.name.as_str()).collect();
    assert_eq!(names, vec!["Better", "First", "Second"]);
    let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_export_matches_ranking() {
    let analysis = analyze(bundled_dataset().unwrap(), &AnalysisOptions::default(), &Config::default()).unwrap();
    let mut buf = Vec::new();
    write_csv(&mut buf, &analysis.ranked).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    let first = format!("1,{},", analysis.ranked[0].result.name);
    assert!(lines[1].starts_with(&first));
}
