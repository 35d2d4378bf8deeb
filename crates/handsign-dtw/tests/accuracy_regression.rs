//! Accuracy regression tests for handsign-dtw.
//!
//! Reference costs were computed from the implementation and are hardcoded to
//! catch changes to the transition rules, the last-column scan, or the
//! classification rule.

use handsign_dtw::{
    MatchError, MatchResult, Matcher, MatcherConfig, RecognizeOptions, SequenceOrder, Sequence,
    SlopeDtw,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seq1(values: &[f64]) -> Sequence {
    Sequence::from_rows(values.iter().map(|&v| vec![v]).collect()).expect("valid test sequence")
}

fn scenario_config() -> MatcherConfig {
    MatcherConfig::new(1, 1.0, 5.0, 2, 0.0).expect("valid test config")
}

// ---------------------------------------------------------------------------
// a) reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn exact_copy_is_recognized() {
    let mut matcher = Matcher::new(scenario_config());
    matcher.add(seq1(&[0.0, 1.0, 2.0]), "A").unwrap();

    let result = matcher.recognize(&seq1(&[0.0, 1.0, 2.0])).unwrap();

    assert_eq!(result.label(), "A");
    assert_eq!(result.distance().map(|d| d.value()), Some(0.0));
}

#[test]
fn distant_end_pose_is_rejected_before_alignment() {
    let mut matcher = Matcher::new(scenario_config());
    matcher.add(seq1(&[0.0, 1.0, 100.0]), "A").unwrap();

    let report = matcher
        .recognize_with(&seq1(&[0.0, 1.0, 2.0]), &RecognizeOptions::new())
        .unwrap();

    assert_eq!(report.result, MatchResult::NoMatch);
    assert_eq!(report.early_rejected, 1);
    assert_eq!(report.aligned, 0);
}

#[test]
fn registering_wrong_dimension_fails() {
    let mut matcher = Matcher::new(scenario_config());
    let result = matcher.add_rows(vec![vec![0.0], vec![1.0, 2.0], vec![2.0]], "A");
    assert!(matches!(
        result,
        Err(MatchError::DimensionMismatch {
            expected: 1,
            got: 2,
            index: 1
        })
    ));
    assert!(matcher.is_empty());
}

// ---------------------------------------------------------------------------
// b) raw alignment costs
// ---------------------------------------------------------------------------

/// Raw costs for 1-D pairs under `max_slope = 2`, reversed order.
#[test]
fn alignment_costs_match_known_values() {
    let pairs: Vec<(Vec<f64>, Vec<f64>, f64)> = vec![
        (vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], 0.0),   // identical
        (vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 3.0], 1.0),   // last pose offset
        (vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0], 1.0),   // constant shift
        (vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 100.0], 98.0), // far end pose
        (vec![0.0, 1.0, 2.0], vec![2.0, 1.0, 0.0], 3.0),   // reversed motion
        (vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![1.0, 3.0, 5.0], 2.0), // subsampled reference
        (vec![1.0, 3.0, 5.0], vec![1.0, 2.0, 3.0, 4.0, 5.0], 2.0), // subsampled query
        (vec![5.0, 5.0, 5.0], vec![0.0, 0.0, 0.0], 15.0),  // constant offset
        (vec![0.0, 3.0, 0.0, 3.0], vec![3.0, 0.0, 3.0, 0.0], 3.0), // opposite phase
        (vec![0.0, 1.0, 2.0, 3.0], vec![2.0, 3.0], 0.0),   // reference is query suffix
    ];

    let dtw = SlopeDtw::new(2);
    for (i, (a, b, expected)) in pairs.iter().enumerate() {
        let cost = dtw.align(&seq1(a), &seq1(b)).unwrap().value();
        assert!(
            (cost - expected).abs() < 1e-10,
            "pair {i}: got {cost:.15}, expected {expected:.15}"
        );
    }
}

#[test]
fn forward_order_anchors_at_start() {
    let forward = SlopeDtw::new(2).with_order(SequenceOrder::Forward);
    let reversed = SlopeDtw::new(2);
    let query = seq1(&[0.0, 1.0, 2.0, 3.0]);
    let head = seq1(&[0.0, 1.0]);

    assert_eq!(forward.align(&query, &head).unwrap().value(), 0.0);
    assert!((reversed.align(&query, &head).unwrap().value() - 3.0).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// c) classification over a small gesture vocabulary
// ---------------------------------------------------------------------------

/// Two-joint (4-D) toy gestures: each point is (left x, left y, right x, right y).
fn wave(phase: f64) -> Sequence {
    let rows = (0..8)
        .map(|t| {
            let x = (t as f64 * 0.8 + phase).sin();
            vec![0.0, 0.0, x, 1.0]
        })
        .collect();
    Sequence::from_rows(rows).unwrap()
}

fn raise(height: f64) -> Sequence {
    let rows = (0..8)
        .map(|t| vec![0.0, t as f64 * height / 7.0, 0.0, 0.0])
        .collect();
    Sequence::from_rows(rows).unwrap()
}

#[test]
fn vocabulary_classification() {
    let config = MatcherConfig::new(4, 0.5, 1.0, 2, 10.0).unwrap();
    let mut matcher = Matcher::new(config);
    matcher.add(wave(0.0), "wave").unwrap();
    matcher.add(raise(1.0), "raise").unwrap();
    matcher.add(wave(0.05), "wave").unwrap();

    assert_eq!(matcher.recognize(&wave(0.02)).unwrap().label(), "wave");
    assert_eq!(matcher.recognize(&raise(1.05)).unwrap().label(), "raise");
    assert_eq!(matcher.store().labels(), vec!["wave", "raise"]);

    // A still pose far from every end pose.
    let still = Sequence::from_rows(vec![vec![3.0, 3.0, 3.0, 3.0]; 5]).unwrap();
    let report = matcher
        .recognize_with(&still, &RecognizeOptions::new())
        .unwrap();
    assert_eq!(report.result, MatchResult::NoMatch);
    assert_eq!(report.early_rejected, 3);
}
