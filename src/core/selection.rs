use std::cmp::Ordering;

use uuid::Uuid;

use crate::models::Candidate;

/// Outcome of evaluating a candidate pool for one member
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Pair with this candidate
    Pair { candidate: Candidate, gap: f64 },
    /// The nearest candidate is too close in outlook
    BelowThreshold { candidate: Candidate, gap: f64 },
    /// Nobody is available
    NoCandidates,
}

/// Nearest-neighbour partner selection with a minimum-difference policy
///
/// # Policy
/// 1. Skip the member themselves
/// 2. Take the candidate with the smallest |score - candidate score|,
///    ties broken by the lower member id
/// 3. Refuse the pairing if that gap is below `min_gap`
///
/// Only the nearest candidate is considered for step 3: a farther candidate
/// is never chosen to get around the threshold.
#[derive(Debug, Clone, Copy)]
pub struct PartnerSelector {
    min_gap: f64,
}

impl PartnerSelector {
    pub fn new(min_gap: f64) -> Self {
        Self { min_gap }
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    pub fn select(&self, member_id: Uuid, score: f64, candidates: &[Candidate]) -> Selection {
        let nearest = candidates
            .iter()
            .filter(|c| c.member_id != member_id && c.score.is_finite())
            .min_by(|a, b| compare_candidates(score, a, b));

        let Some(candidate) = nearest.copied() else {
            return Selection::NoCandidates;
        };

        let gap = (candidate.score - score).abs();
        if gap < self.min_gap {
            Selection::BelowThreshold { candidate, gap }
        } else {
            Selection::Pair { candidate, gap }
        }
    }
}

impl Default for PartnerSelector {
    fn default() -> Self {
        Self::new(0.5)
    }
}

fn compare_candidates(score: f64, a: &Candidate, b: &Candidate) -> Ordering {
    let gap_a = (a.score - score).abs();
    let gap_b = (b.score - score).abs();
    gap_a
        .partial_cmp(&gap_b)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.member_id.cmp(&b.member_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(n: u128, score: f64) -> Candidate {
        Candidate {
            member_id: Uuid::from_u128(n),
            score,
        }
    }

    #[test]
    fn test_pairs_distant_candidate() {
        let selector = PartnerSelector::new(0.5);
        let me = Uuid::from_u128(100);
        match selector.select(me, 3.0, &[candidate(1, 7.0)]) {
            Selection::Pair { candidate, gap } => {
                assert_eq!(candidate.member_id, Uuid::from_u128(1));
                assert_eq!(gap, 4.0);
            }
            other => panic!("expected a pairing, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_near_identical_views() {
        let selector = PartnerSelector::new(0.5);
        let result = selector.select(Uuid::from_u128(100), 5.0, &[candidate(1, 5.2)]);
        assert!(matches!(result, Selection::BelowThreshold { .. }));
    }

    #[test]
    fn test_nearest_below_threshold_blocks_farther() {
        let selector = PartnerSelector::new(0.5);
        let result = selector.select(
            Uuid::from_u128(100),
            5.0,
            &[candidate(1, 9.0), candidate(2, 5.1)],
        );
        match result {
            Selection::BelowThreshold { candidate, .. } => {
                assert_eq!(candidate.member_id, Uuid::from_u128(2))
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_gap_equal_to_threshold_is_accepted() {
        let selector = PartnerSelector::new(0.5);
        let result = selector.select(Uuid::from_u128(100), 1.0, &[candidate(1, 1.5)]);
        assert!(matches!(result, Selection::Pair { .. }));
    }

    #[test]
    fn test_ties_broken_by_member_id() {
        let selector = PartnerSelector::new(0.5);
        let result = selector.select(
            Uuid::from_u128(100),
            0.0,
            &[candidate(9, 2.0), candidate(3, -2.0), candidate(5, 2.0)],
        );
        match result {
            Selection::Pair { candidate, .. } => assert_eq!(candidate.member_id, Uuid::from_u128(3)),
            other => panic!("expected a pairing, got {:?}", other),
        }
    }

    #[test]
    fn test_excludes_self_and_empty_pool() {
        let selector = PartnerSelector::default();
        let me = Uuid::from_u128(7);
        assert_eq!(selector.select(me, 0.0, &[]), Selection::NoCandidates);
        assert_eq!(selector.select(me, 0.0, &[candidate(7, 9.0)]), Selection::NoCandidates);
    }
}
