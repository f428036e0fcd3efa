use super::domain::{full_name, ApplicationSnapshot, PositionCandidateView};

/// Mean of the recorded scores. Unscored interviews are skipped entirely, and an
/// application without any recorded score has no average rather than a zero.
pub fn average_score(scores: &[Option<i32>]) -> Option<f64> {
    let (sum, count) = scores
        .iter()
        .flatten()
        .fold((0_i64, 0_u32), |(sum, count), score| {
            (sum + i64::from(*score), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(sum as f64 / f64::from(count))
    }
}

impl ApplicationSnapshot {
    pub fn candidate_view(&self) -> PositionCandidateView {
        PositionCandidateView {
            candidate_id: self.candidate_id,
            full_name: full_name(&self.first_name, &self.last_name),
            current_stage: self.current_stage.clone(),
            average_score: average_score(&self.interview_scores),
        }
    }
}
