//! Property tests for metric invariants

use groupfair_metrics::domain::interpretation::{DirInterpretation, RiskInterpretation};
use groupfair_metrics::domain::stats::jensen_shannon_distance;
use groupfair_metrics::{
    Dataset, coverage_gap_intersectional, data_representation_fairness, js_divergence_by_group,
    js_divergence_by_label_and_group, risk_ratio_multilabel,
};
use proptest::prelude::*;

/// Records of (attribute index, second attribute index, label 1, label 2)
fn records() -> impl Strategy<Value = Vec<(u8, u8, bool, bool)>> {
    prop::collection::vec((0u8..6, 0u8..3, any::<bool>(), any::<bool>()), 1..200)
}

fn dataset(records: &[(u8, u8, bool, bool)]) -> Dataset {
    Dataset::new()
        .with_column(
            "g",
            records.iter().map(|r| format!("g{}", r.0)).collect(),
        )
        .unwrap()
        .with_column("h", records.iter().map(|r| i64::from(r.1)).collect())
        .unwrap()
        .with_column("y1", records.iter().map(|r| r.2).collect())
        .unwrap()
        .with_column("y2", records.iter().map(|r| r.3).collect())
        .unwrap()
}

proptest! {
    #[test]
    fn prop_dir_bounded_and_max_is_reference(recs in records()) {
        let report = data_representation_fairness(&dataset(&recs), "g").unwrap();

        let max_samples = report.rows.iter().map(|r| r.samples).max().unwrap();
        for row in &report.rows {
            prop_assert!(row.disparate_impact_ratio <= 1.0);
            if row.samples == max_samples {
                prop_assert_eq!(row.disparate_impact_ratio, 1.0);
                prop_assert_eq!(row.dir_interpretation, DirInterpretation::Reference);
            }
        }
    }

    #[test]
    fn prop_representation_rates_sum_to_100(recs in records()) {
        let report = data_representation_fairness(&dataset(&recs), "g").unwrap();

        let sum: f64 = report.rows.iter().map(|r| r.representation_rate).sum();
        let tolerance = 0.0001 * report.rows.len() as f64 + 1e-9;
        prop_assert!((sum - 100.0).abs() <= tolerance.max(0.01));
        prop_assert_eq!(
            report.rows.iter().map(|r| r.samples).sum::<usize>(),
            recs.len()
        );
    }

    #[test]
    fn prop_reference_group_has_unit_ratio(recs in records()) {
        let ds = dataset(&recs);
        prop_assume!(recs.iter().any(|r| r.2));

        let report = risk_ratio_multilabel(&ds, "g", &["y1"]).unwrap();
        for row in &report.rows {
            if row.group == row.reference_group {
                prop_assert_eq!(row.risk_ratio, 1.0);
                prop_assert_eq!(row.interpretation, RiskInterpretation::EqualPrevalence);
            }
            prop_assert!(row.risk_ratio <= 1.0);
        }
    }

    #[test]
    fn prop_coverage_gaps_sum_near_zero(recs in records()) {
        let report = coverage_gap_intersectional(&dataset(&recs), "g", "h").unwrap();

        prop_assert!(report.gap_residual().abs() <= report.rows.len() as i64);
        prop_assert_eq!(report.rows.iter().map(|r| r.samples).sum::<usize>(), recs.len());
    }

    #[test]
    fn prop_per_label_divergence_in_unit_interval(recs in records()) {
        let report =
            js_divergence_by_label_and_group(&dataset(&recs), "g", &["y1", "y2"]).unwrap();

        for row in &report.rows {
            prop_assert!((0.0..=1.0).contains(&row.js_value));
        }
    }

    #[test]
    fn prop_aggregate_divergence_defined_or_undefined(recs in records()) {
        // Either every group has label mass and all values are bounded,
        // or the call fails; it never yields NaN.
        if let Ok(report) = js_divergence_by_group(&dataset(&recs), "g", &["y1", "y2"]) {
            for row in &report.rows {
                prop_assert!(row.js_value.is_finite());
                prop_assert!((0.0..=1.0).contains(&row.js_value));
            }
        }
    }

    #[test]
    fn prop_js_symmetric_and_bounded(
        p in prop::collection::vec(0.0f64..10.0, 2..8),
        q_seed in prop::collection::vec(0.0f64..10.0, 8),
    ) {
        let q: Vec<f64> = q_seed[..p.len()].to_vec();
        prop_assume!(p.iter().sum::<f64>() > 0.0 && q.iter().sum::<f64>() > 0.0);

        let a = jensen_shannon_distance(&p, &q).unwrap();
        let b = jensen_shannon_distance(&q, &p).unwrap();
        prop_assert!((a - b).abs() < 1e-12);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&a));
    }
}
