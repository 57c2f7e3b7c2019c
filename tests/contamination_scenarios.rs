mod common;

use common::{call, mixed_sample, two_clade_tree};
use haplocheck_tools::contamination::ContaminationSummary;
use haplocheck_tools::haplogroup::{Mutation, NodeSpec, ReferenceTree, TreeBuilder};
use haplocheck_tools::{analyze_sample, run, Config, Sample, Status};

fn m(s: &str) -> Mutation {
    s.parse().unwrap()
}

/// One top-level clade H2a with two subclades.
fn single_clade_tree() -> ReferenceTree {
    TreeBuilder::new("test")
        .node(NodeSpec::new("mt-MRCA", None, vec![]))
        .node(NodeSpec::new("H2a", Some("mt-MRCA"), vec![m("100A")]))
        .node(NodeSpec::new("H2a1", Some("H2a"), vec![m("200C")]))
        .node(NodeSpec::new("H2a2", Some("H2a"), vec![m("300T")]))
        .build()
        .unwrap()
}

fn sibling_mixture() -> Sample {
    Sample::new(
        "siblings",
        vec![
            call(100, 'G', 'A', 0.99),
            call(200, 'T', 'C', 0.90),
            call(300, 'C', 'T', 0.10),
        ],
    )
    .unwrap()
}

#[test]
fn distinct_minor_clade_is_contaminated() {
    let tree = two_clade_tree();
    let result = analyze_sample(&mixed_sample("mix", 0.10), &tree, &Config::default()).unwrap();

    assert_eq!(result.status, Status::Yes);
    assert_eq!(result.major_haplogroup(), "H2a1");
    assert_eq!(result.minor_haplogroup(), "L3e2b");
    assert!((result.contamination_level - 0.10).abs() < 1e-9);
    assert_eq!(result.distance_score, 2.0);
    assert!((result.major.quality - 1.0).abs() < 1e-9);
    assert!(result.minor.quality >= 0.5);
    assert_eq!(result.heteroplasmies, 1);
    assert_eq!(result.homoplasmies, 2);
    assert_eq!(result.sample_mean_coverage, 100);
}

#[test]
fn fixed_calls_only_are_clean() {
    let tree = two_clade_tree();
    let sample = Sample::new(
        "clean",
        vec![call(100, 'G', 'A', 1.0), call(200, 'T', 'C', 0.99)],
    )
    .unwrap();
    let result = analyze_sample(&sample, &tree, &Config::default()).unwrap();

    assert_eq!(result.status, Status::No);
    assert_eq!(result.contamination_level, 0.0);
    assert_eq!(result.major_haplogroup(), "H2a1");
    assert_eq!(result.minor_haplogroup(), "mt-MRCA");
    assert_eq!(result.minor.quality, 0.0);
    assert_eq!(result.distance_score, 0.0);
}

#[test]
fn empty_sample_is_clean_and_unassigned() {
    let tree = two_clade_tree();
    let sample = Sample::new("empty", vec![]).unwrap();
    let result = analyze_sample(&sample, &tree, &Config::default()).unwrap();

    assert_eq!(result.status, Status::No);
    assert_eq!(result.sample_mean_coverage, 0);
    assert_eq!(result.contamination_level, 0.0);
    assert_eq!(result.major_haplogroup(), "mt-MRCA");
    assert_eq!(result.major.quality, 0.0);
    assert_eq!(result.minor.quality, 0.0);
}

#[test]
fn noise_level_minor_is_not_reported() {
    let tree = two_clade_tree();
    let result = analyze_sample(&mixed_sample("noise", 0.005), &tree, &Config::default()).unwrap();
    assert_eq!(result.status, Status::No);
    assert_eq!(result.heteroplasmies, 0);
}

#[test]
fn same_input_gives_same_result() {
    let tree = two_clade_tree();
    let config = Config::default();
    let sample = mixed_sample("again", 0.2);
    let first = analyze_sample(&sample, &tree, &config).unwrap();
    let second = analyze_sample(&sample, &tree, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sibling_subclades_of_one_clade_are_clean() {
    let tree = single_clade_tree();
    let result = analyze_sample(&sibling_mixture(), &tree, &Config::default()).unwrap();

    assert_eq!(result.major_haplogroup(), "H2a1");
    assert_eq!(result.minor_haplogroup(), "H2a2");
    assert_eq!(result.distance_score, 2.0);
    assert!((result.minor.quality - 0.75).abs() < 1e-9);
    assert!((result.contamination_level - 0.10).abs() < 1e-9);
    assert_eq!(result.status, Status::No);
}

#[test]
fn distance_alone_decides_without_clade_rule() {
    let tree = single_clade_tree();
    let config = Config {
        require_distinct_top_level_clade: false,
        ..Config::default()
    };
    let result = analyze_sample(&sibling_mixture(), &tree, &config).unwrap();
    assert_eq!(result.status, Status::Yes);

    let config = Config {
        min_distance_for_contamination: 2.0,
        ..config
    };
    let result = analyze_sample(&sibling_mixture(), &tree, &config).unwrap();
    assert_eq!(result.status, Status::No);
}

#[test]
fn stricter_distance_turns_verdict() {
    let tree = two_clade_tree();
    let config = Config {
        min_distance_for_contamination: 2.0,
        ..Config::default()
    };
    let result = analyze_sample(&mixed_sample("mix", 0.10), &tree, &config).unwrap();
    assert_eq!(result.status, Status::No);
}

#[test]
fn levels_stay_bounded_and_major_dominates() {
    let tree = two_clade_tree();
    for step in 1..100 {
        let fraction = step as f64 / 100.0;
        let result = analyze_sample(&mixed_sample("s", fraction), &tree, &Config::default()).unwrap();
        assert!((0.0..=0.5).contains(&result.contamination_level));
        assert!(result.major_level >= result.contamination_level || result.heteroplasmies == 0);
        assert!((0.0..=1.0).contains(&result.major.quality));
        assert!((0.0..=1.0).contains(&result.minor.quality));
        assert!(tree.find(result.major_haplogroup()).is_some());
        assert!(tree.find(result.minor_haplogroup()).is_some());
    }
}

#[test]
fn batch_summary_counts_and_quartiles() {
    let tree = two_clade_tree();
    let depths = [10u32, 20, 30];
    let samples: Vec<Sample> = depths
        .iter()
        .enumerate()
        .map(|(i, depth)| {
            let fraction = if i == 0 { 0.15 } else { 1.0 };
            Sample::new(
                format!("s{}", i),
                vec![
                    haplocheck_tools::VariantCall::new(100, 'G', 'A', 1.0, Some(*depth)),
                    haplocheck_tools::VariantCall::new(200, 'T', 'C', 1.0, Some(*depth)),
                    haplocheck_tools::VariantCall::new(300, 'C', 'T', fraction, Some(*depth)),
                ],
            )
            .unwrap()
        })
        .collect();

    let results = run(&samples, &tree, &Config::default()).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.sample_id.as_str()).collect();
    assert_eq!(ids, ["s0", "s1", "s2"]);

    let summary = ContaminationSummary::from_results(&results);
    assert_eq!(summary.yes, 1);
    assert_eq!(summary.no, 2);
    assert_eq!(summary.coverage_median, 20.0);
    assert_eq!(summary.coverage_q1, 15.0);
    assert_eq!(summary.coverage_q3, 25.0);
}
