// Unit tests for Commons Dialogue

use commons_dialogue::core::{
    content::{clamp_limit, normalize_content, ContentError, MAX_DIRECT_MESSAGE_CHARS, MAX_MATCH_MESSAGE_CHARS},
    orientation::{decode_options, normalize_answers, orientation_gap, orientation_score},
    selection::{PartnerSelector, Selection},
};
use commons_dialogue::models::{Candidate, OpinionAnswer};
use serde_json::json;
use uuid::Uuid;

fn candidate(n: u128, score: f64) -> Candidate {
    Candidate {
        member_id: Uuid::from_u128(n),
        score,
    }
}

#[test]
fn test_scenario_distant_views_are_paired() {
    // A scores 3.0, B scores 7.0
    let selector = PartnerSelector::new(0.5);
    let a = Uuid::from_u128(1);
    match selector.select(a, 3.0, &[candidate(2, 7.0)]) {
        Selection::Pair { candidate, gap } => {
            assert_eq!(candidate.member_id, Uuid::from_u128(2));
            assert!((gap - 4.0).abs() < f64::EPSILON);
        }
        other => panic!("expected a pairing, got {:?}", other),
    }
}

#[test]
fn test_scenario_close_views_are_not_paired() {
    // A scores 5.0, sole candidate C scores 5.2
    let selector = PartnerSelector::new(0.5);
    let result = selector.select(Uuid::from_u128(1), 5.0, &[candidate(3, 5.2)]);
    assert!(matches!(result, Selection::BelowThreshold { .. }));
}

#[test]
fn test_selected_gap_never_below_threshold() {
    let thresholds = [0.0, 0.5, 1.0, 3.0];
    let pool: Vec<Candidate> = (0..11)
        .map(|i| candidate(i as u128 + 10, -10.0 + i as f64 * 2.0))
        .collect();

    for &threshold in &thresholds {
        let selector = PartnerSelector::new(threshold);
        for step in 0..=40 {
            let score = -10.0 + step as f64 * 0.5 + 0.1;
            if let Selection::Pair { gap, candidate } = selector.select(Uuid::from_u128(1), score, &pool) {
                assert!(gap >= threshold, "gap {} below threshold {}", gap, threshold);
                assert!(((candidate.score - score).abs() - gap).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_selection_picks_nearest() {
    let selector = PartnerSelector::new(0.5);
    let pool = vec![candidate(2, -8.0), candidate(3, 1.0), candidate(4, 9.0)];
    match selector.select(Uuid::from_u128(1), 2.5, &pool) {
        Selection::Pair { candidate, .. } => assert_eq!(candidate.member_id, Uuid::from_u128(3)),
        other => panic!("expected a pairing, got {:?}", other),
    }
}

#[test]
fn test_selection_is_deterministic_under_reordering() {
    let selector = PartnerSelector::new(0.5);
    let mut pool = vec![candidate(8, 4.0), candidate(2, -4.0), candidate(5, 4.0)];
    let first = selector.select(Uuid::from_u128(1), 0.0, &pool);
    pool.reverse();
    let second = selector.select(Uuid::from_u128(1), 0.0, &pool);
    assert_eq!(first, second);
}

#[test]
fn test_score_is_mean_of_current_answers() {
    let answers = [
        OpinionAnswer { question_id: "economy", value: 4.0 },
        OpinionAnswer { question_id: "climate", value: -2.0 },
        OpinionAnswer { question_id: "economy", value: 8.0 },
    ];
    let normalized = normalize_answers(&answers).unwrap();
    let values: Vec<f64> = normalized.iter().map(|a| a.value).collect();
    assert_eq!(orientation_score(&values), Some(3.0));
}

#[test]
fn test_gap_is_symmetric() {
    assert_eq!(orientation_gap(Some(-2.5), Some(4.0)), orientation_gap(Some(4.0), Some(-2.5)));
    assert_eq!(orientation_gap(Some(1.0), None), None);
}

#[test]
fn test_channel_limits_differ() {
    let text = "x".repeat(1500);
    assert_eq!(
        normalize_content(&text, MAX_MATCH_MESSAGE_CHARS),
        Err(ContentError::TooLong { max_chars: 1000 })
    );
    assert_eq!(normalize_content(&text, MAX_DIRECT_MESSAGE_CHARS), Ok(text.as_str()));
}

#[test]
fn test_limit_is_capped() {
    assert_eq!(clamp_limit(Some(201)), 200);
    assert_eq!(clamp_limit(Some(200)), 200);
    assert_eq!(clamp_limit(None), 50);
}

#[test]
fn test_options_decoded_from_every_encoding() {
    let native = decode_options(&json!([{"label": "Agree", "value": 5}, {"label": "Disagree", "value": -5}]));
    let serialized = decode_options(&json!(r#"[{"label":"Agree","value":5},{"label":"Disagree","value":-5}]"#));
    let delimited = decode_options(&json!("Agree:5,Disagree:-5"));

    assert_eq!(native, serialized);
    assert_eq!(native, delimited);
    assert_eq!(native[0].label, "Agree");
}
