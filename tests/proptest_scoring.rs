//! Property-based tests for scoring, aggregation and extraction.
//!
//! Ensures scores stay bounded and monotone, aggregation does not depend on
//! project order, and the extractors never panic on arbitrary input.

use mule_assess::model::{
    CustomCodeFinding, CustomCodeKind, Flow, FlowKind, PlatformGeneration, Project,
    ProjectDescriptor, SourceLocation,
};
use mule_assess::portfolio::PortfolioAggregator;
use mule_assess::scanner::scan_config;
use mule_assess::scoring::{saturate, ComplexityScorer};
use mule_assess::transform::{measure, measure_inline, TransformAnalyzer};
use proptest::prelude::*;
use std::path::PathBuf;

const CONNECTORS: &[&str] = &["http", "db", "sap", "jms", "acme-custom"];
const VERSIONS: &[&str] = &["4.4.0", "4.6.1", "3.9.1", "unknown"];

#[derive(Debug, Clone)]
struct ProjectShape {
    flows: usize,
    components: usize,
    connectors: Vec<(usize, usize)>,
    scripts: Vec<usize>,
    version: usize,
}

fn shape() -> impl Strategy<Value = ProjectShape> {
    (
        0usize..12,
        0usize..400,
        prop::collection::vec((0usize..CONNECTORS.len(), 1usize..20), 0..5),
        prop::collection::vec(1usize..300, 0..4),
        0usize..VERSIONS.len(),
    )
        .prop_map(|(flows, components, connectors, scripts, version)| ProjectShape {
            flows,
            components,
            connectors,
            scripts,
            version,
        })
}

fn script(lines: usize) -> CustomCodeFinding {
    CustomCodeFinding {
        kind: CustomCodeKind::EmbeddedScript,
        language: "groovy".to_string(),
        location: SourceLocation::element("src/main/mule/app.xml", "flow[f]/scripting:execute"),
        lines,
    }
}

fn build(index: usize, shape: &ProjectShape, scorer: &ComplexityScorer) -> Project {
    let name = format!("project-{index:02}");
    let mut project = Project::new(&ProjectDescriptor {
        root: PathBuf::from(format!("/repos/{name}")),
        name: name.clone(),
        display_path: name,
        source: "local".to_string(),
    });
    let version = VERSIONS[shape.version];
    project.platform_version = version.to_string();
    project.platform = PlatformGeneration::from_version(version);
    for i in 0..shape.flows {
        project.flows.push(Flow {
            name: format!("flow-{i}"),
            kind: FlowKind::Flow,
            file: "src/main/mule/app.xml".to_string(),
            component_count: 1,
            flow_refs: Vec::new(),
            has_error_handler: i % 2 == 0,
        });
    }
    project.total_components = shape.components;
    for (connector, count) in &shape.connectors {
        *project
            .connectors
            .entry(CONNECTORS[*connector].to_string())
            .or_insert(0) += count;
    }
    project.custom_code = shape.scripts.iter().map(|lines| script(*lines)).collect();
    scorer.finalize(&mut project);
    project
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn saturate_is_bounded_and_monotone(a in -1e6f64..1e6, b in 0f64..1e6, scale in 0.1f64..1e4) {
        let low = saturate(a, scale);
        let high = saturate(a.max(0.0) + b, scale);
        prop_assert!((0.0..=100.0).contains(&low));
        prop_assert!((0.0..=100.0).contains(&high));
        prop_assert!(high >= low);
    }

    #[test]
    fn scores_stay_in_range(s in shape()) {
        let scorer = ComplexityScorer::default();
        let project = build(0, &s, &scorer);
        let score = &project.score;
        for value in [
            score.overall,
            score.categories.connectors,
            score.categories.custom_code,
            score.categories.transformation,
            score.categories.structure,
        ] {
            prop_assert!((0.0..=100.0).contains(&value), "{value} out of range");
        }
        prop_assert!((0.0..=1.0).contains(&score.test_coverage));
    }

    #[test]
    fn custom_code_never_lowers_scores(s in shape(), extra in 1usize..500) {
        let scorer = ComplexityScorer::default();
        let before = build(0, &s, &scorer);
        let mut after = before.clone();
        after.custom_code.push(script(extra));
        scorer.finalize(&mut after);

        prop_assert!(after.score.categories.custom_code >= before.score.categories.custom_code);
        prop_assert!(after.score.overall >= before.score.overall);
    }

    #[test]
    fn aggregation_is_order_independent(
        shapes in prop::collection::vec(shape(), 0..12),
        seed in any::<u64>(),
    ) {
        let scorer = ComplexityScorer::default();
        let projects: Vec<Project> = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| build(i, s, &scorer))
            .collect();

        let mut shuffled = projects.clone();
        // Deterministic permutation from the seed
        let n = shuffled.len();
        if n > 1 {
            let mut state = seed;
            for i in (1..n).rev() {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }
        }

        let aggregator = PortfolioAggregator::default();
        let a = aggregator.aggregate(&projects);
        let b = aggregator.aggregate(&shuffled);
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn dataweave_metrics_dont_panic(source in "\\PC{0,400}") {
        let full = measure(&source);
        let inline = measure_inline(&source);
        prop_assert!(inline.lines <= full.lines);
    }

    #[test]
    fn config_scanner_doesnt_panic(doc in "\\PC{0,300}") {
        let _ = scan_config(doc.as_bytes(), "fuzz.xml", &TransformAnalyzer::default());
    }

    #[test]
    fn config_scanner_counts_generated_flows(flows in 0usize..20, requests in 0usize..5) {
        let mut doc = String::from(
            r#"<mule xmlns="http://www.mulesoft.org/schema/mule/core" xmlns:http="http://www.mulesoft.org/schema/mule/http">"#,
        );
        for i in 0..flows {
            doc.push_str(&format!("<flow name=\"f{i}\">"));
            for _ in 0..requests {
                doc.push_str("<http:request path=\"/x\"/>");
            }
            doc.push_str("</flow>");
        }
        doc.push_str("</mule>");

        let facts = scan_config(doc.as_bytes(), "gen.xml", &TransformAnalyzer::default()).unwrap();
        prop_assert_eq!(facts.flow_count(), flows);
        prop_assert_eq!(facts.connectors.get("http").copied().unwrap_or(0), flows * requests);
    }
}
