use utoipa::ToSchema;

use crate::error::PortalError;
use crate::storage::{Repository, QUIZ_RESULTS};

pub const NO_DATA: &str = "N/A";

/// Outcome of one finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub score: usize,
    pub total_questions: usize,
}

impl QuizResult {
    pub fn percent(&self) -> Option<f64> {
        match self.total_questions {
            0 => None,
            total => Some(self.score as f64 / total as f64 * 100.0),
        }
    }
}

/// Mean percentage over all results, rounded to two decimals.
///
/// Results without questions carry no percentage and are left out. `None`
/// when nothing is left to average.
pub fn average_score(results: &[QuizResult]) -> Option<f64> {
    let percents: Vec<f64> = results.iter().filter_map(QuizResult::percent).collect();
    if percents.is_empty() {
        return None;
    }

    let mean = percents.iter().sum::<f64>() / percents.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{}%", value),
        None => NO_DATA.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub available: usize,
    /// Share of available quizzes completed; absent when none are available.
    pub completion_percent: Option<f64>,
    pub average_score: Option<f64>,
    /// Average formatted for display, `N/A` without data.
    pub average_display: String,
}

impl Progress {
    pub fn new(results: &[QuizResult], available: usize) -> Progress {
        let completion_percent = match available {
            0 => None,
            n => Some(results.len() as f64 / n as f64 * 100.0),
        };
        let average_score = average_score(results);

        Progress {
            completed: results.len(),
            available,
            completion_percent,
            average_score,
            average_display: format_average(average_score),
        }
    }
}

pub trait ResultsExt {
    fn record_result(&self, result: QuizResult) -> Result<(), PortalError>;
    fn results(&self) -> Result<Vec<QuizResult>, PortalError>;
}

impl ResultsExt for Repository {
    fn record_result(&self, result: QuizResult) -> Result<(), PortalError> {
        tracing::info!(
            "Recording result {}/{} for quiz {}",
            result.score,
            result.total_questions,
            result.quiz_id
        );
        Ok(self.push(QUIZ_RESULTS, result)?)
    }

    fn results(&self) -> Result<Vec<QuizResult>, PortalError> {
        Ok(self.list(QUIZ_RESULTS)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: usize, total: usize) -> QuizResult {
        QuizResult {
            quiz_id: "1".to_string(),
            score,
            total_questions: total,
        }
    }

    #[test]
    fn average_of_nothing_is_placeholder() {
        assert_eq!(average_score(&[]), None);
        assert_eq!(format_average(average_score(&[])), "N/A");

        let progress = Progress::new(&[], 0);
        assert_eq!(progress.average_display, "N/A");
        assert_eq!(progress.completion_percent, None);
    }

    #[test]
    fn zero_question_results_do_not_produce_nan() {
        assert_eq!(average_score(&[result(0, 0)]), None);
        assert_eq!(average_score(&[result(0, 0), result(1, 2)]), Some(50.0));
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let results = [result(1, 3), result(1, 1)];
        assert_eq!(average_score(&results), Some(66.67));
        assert_eq!(format_average(average_score(&results)), "66.67%");
        assert_eq!(format_average(Some(100.0)), "100%");
    }

    #[test]
    fn progress_counts_results_against_available() {
        let progress = Progress::new(&[result(2, 2)], 4);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.available, 4);
        assert_eq!(progress.completion_percent, Some(25.0));
        assert_eq!(progress.average_display, "100%");
    }

    #[test]
    fn repeated_attempts_are_all_kept() {
        let repo = Repository::in_memory();
        repo.record_result(result(1, 2)).unwrap();
        repo.record_result(result(2, 2)).unwrap();
        assert_eq!(repo.results().unwrap().len(), 2);
    }
}
