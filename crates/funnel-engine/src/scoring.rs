//! Score computation
//!
//! The total is the plain sum of recorded answer points. Classification
//! lives in [`funnel_core::ScoreThresholds`]; this module only aggregates.

use funnel_core::Answer;

/// Sum the points of the recorded answers
pub fn total_score(answers: &[Answer]) -> u32 {
    answers.iter().map(|a| a.points).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(question_id: u32, points: u32) -> Answer {
        Answer {
            question_id,
            points,
            text: format!("option worth {}", points),
        }
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(total_score(&[]), 0);
    }

    #[test]
    fn test_sum_matches_selection() {
        let answers = vec![
            answer(1, 5),
            answer(2, 0),
            answer(3, 15),
            answer(4, 10),
            answer(5, 20),
        ];
        assert_eq!(total_score(&answers), 50);
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![answer(1, 5), answer(2, 10), answer(3, 20)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(total_score(&forward), total_score(&reversed));
    }
}
