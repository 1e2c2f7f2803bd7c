//! Steps a student through one quiz at a time.
//!
//! ```text
//! NotStarted --start--> Asking(0) --submit--> Asking(1) ... --submit--> Completed
//! ```
//!
//! Progress lives only in memory. Starting another quiz throws the current
//! attempt away; only completed attempts are written to storage.

use utoipa::ToSchema;

use super::content::{ContentItem, QuizQuestion};
use super::results::{QuizResult, ResultsExt};
use crate::error::{PortalError, QuizError};
use crate::storage::Repository;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attempt {
    quiz_id: String,
    title: String,
    questions: Vec<QuizQuestion>,
    index: usize,
    selected: Option<usize>,
    score: usize,
}

impl Attempt {
    fn question(&self) -> &QuizQuestion {
        &self.questions[self.index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum RunState {
    #[default]
    NotStarted,
    Asking(Attempt),
    Completed {
        title: String,
        result: QuizResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunView {
    NotStarted,
    #[serde(rename_all = "camelCase")]
    Asking {
        quiz_id: String,
        title: String,
        index: usize,
        total: usize,
        question: String,
        options: Vec<String>,
        selected: Option<usize>,
        /// Submitting now finishes the quiz.
        is_last: bool,
    },
    #[serde(rename_all = "camelCase")]
    Completed {
        quiz_id: String,
        title: String,
        score: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Next { index: usize },
    Finished(QuizResult),
}

#[derive(Debug, Default)]
pub struct QuizRunner {
    state: RunState,
}

impl QuizRunner {
    pub fn new() -> QuizRunner {
        QuizRunner::default()
    }

    /// Begins `quiz` from its first question, discarding any attempt in progress.
    pub fn start(&mut self, quiz: &ContentItem) -> Result<(), QuizError> {
        let questions = quiz
            .questions()
            .ok_or_else(|| QuizError::NotAQuiz(quiz.id.clone()))?;

        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz(quiz.id.clone()));
        }

        if let RunState::Asking(previous) = &self.state {
            tracing::debug!(
                "Abandoning quiz {} at question {}",
                previous.quiz_id,
                previous.index
            );
        }

        self.state = RunState::Asking(Attempt {
            quiz_id: quiz.id.clone(),
            title: quiz.title.clone(),
            questions: questions.to_vec(),
            index: 0,
            selected: None,
            score: 0,
        });
        Ok(())
    }

    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        let attempt = match &mut self.state {
            RunState::Asking(attempt) => attempt,
            _ => return Err(QuizError::NotAsking),
        };

        let options = attempt.question().options.len();
        if option >= options {
            return Err(QuizError::OptionOutOfRange { option, options });
        }

        attempt.selected = Some(option);
        Ok(())
    }

    /// Scores the selected answer and moves on. The final submission stores
    /// the result in `repo` before returning.
    pub fn submit_answer(&mut self, repo: &Repository) -> Result<Submission, PortalError> {
        let attempt = match &mut self.state {
            RunState::Asking(attempt) => attempt,
            _ => return Err(QuizError::NotAsking.into()),
        };
        let selected = attempt.selected.ok_or(QuizError::NoSelection)?;

        let score = attempt.score + usize::from(selected == attempt.question().correct_answer);

        if attempt.index + 1 < attempt.questions.len() {
            attempt.score = score;
            attempt.index += 1;
            attempt.selected = None;
            return Ok(Submission::Next {
                index: attempt.index,
            });
        }

        let title = attempt.title.clone();
        let result = QuizResult {
            quiz_id: attempt.quiz_id.clone(),
            score,
            total_questions: attempt.questions.len(),
        };
        repo.record_result(result.clone())?;

        self.state = RunState::Completed {
            title,
            result: result.clone(),
        };
        Ok(Submission::Finished(result))
    }

    /// Drops whatever is in progress.
    pub fn reset(&mut self) {
        self.state = RunState::NotStarted;
    }

    pub fn view(&self) -> RunView {
        match &self.state {
            RunState::NotStarted => RunView::NotStarted,
            RunState::Asking(attempt) => {
                let question = attempt.question();
                RunView::Asking {
                    quiz_id: attempt.quiz_id.clone(),
                    title: attempt.title.clone(),
                    index: attempt.index,
                    total: attempt.questions.len(),
                    question: question.question.clone(),
                    options: question.options.clone(),
                    selected: attempt.selected,
                    is_last: attempt.index + 1 == attempt.questions.len(),
                }
            }
            RunState::Completed { title, result } => RunView::Completed {
                quiz_id: result.quiz_id.clone(),
                title: title.clone(),
                score: result.score,
                total: result.total_questions,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::content::tests::{notice, question, quiz};
    use crate::storage::QUIZ_RESULTS;

    fn three_question_quiz() -> ContentItem {
        quiz(
            "42",
            "2",
            vec![question("one", 0), question("two", 1), question("three", 2)],
        )
    }

    fn run(runner: &mut QuizRunner, repo: &Repository, answers: &[usize]) -> Submission {
        let mut last = None;
        for answer in answers {
            runner.select_answer(*answer).unwrap();
            last = Some(runner.submit_answer(repo).unwrap());
        }
        last.expect("at least one answer")
    }

    #[test]
    fn all_correct_scores_every_question() {
        let repo = Repository::in_memory();
        let mut runner = QuizRunner::new();
        runner.start(&three_question_quiz()).unwrap();

        let outcome = run(&mut runner, &repo, &[0, 1, 2]);
        let expected = QuizResult {
            quiz_id: "42".to_string(),
            score: 3,
            total_questions: 3,
        };
        assert_eq!(outcome, Submission::Finished(expected.clone()));
        assert_eq!(repo.list(QUIZ_RESULTS).unwrap(), vec![expected]);
        assert_eq!(
            runner.view(),
            RunView::Completed {
                quiz_id: "42".to_string(),
                title: "Quiz 42".to_string(),
                score: 3,
                total: 3,
            }
        );
    }

    #[test]
    fn all_wrong_scores_zero() {
        let repo = Repository::in_memory();
        let mut runner = QuizRunner::new();
        runner.start(&three_question_quiz()).unwrap();

        match run(&mut runner, &repo, &[3, 3, 3]) {
            Submission::Finished(result) => assert_eq!(result.score, 0),
            other => panic!("quiz should be finished, got {:?}", other),
        }
    }

    #[test]
    fn last_answer_counts() {
        let repo = Repository::in_memory();
        let mut runner = QuizRunner::new();
        runner.start(&three_question_quiz()).unwrap();

        match run(&mut runner, &repo, &[3, 3, 2]) {
            Submission::Finished(result) => assert_eq!(result.score, 1),
            other => panic!("quiz should be finished, got {:?}", other),
        }
    }

    #[test]
    fn submit_requires_selection_and_advances_with_cleared_selection() {
        let repo = Repository::in_memory();
        let mut runner = QuizRunner::new();
        runner.start(&three_question_quiz()).unwrap();

        assert!(matches!(
            runner.submit_answer(&repo),
            Err(PortalError::Quiz(QuizError::NoSelection))
        ));

        runner.select_answer(2).unwrap();
        runner.select_answer(0).unwrap();
        assert_eq!(
            runner.submit_answer(&repo).unwrap(),
            Submission::Next { index: 1 }
        );

        match runner.view() {
            RunView::Asking {
                index,
                selected,
                is_last,
                question,
                ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(selected, None);
                assert!(!is_last);
                assert_eq!(question, "two");
            }
            other => panic!("expected a question, got {:?}", other),
        }
        assert!(repo.list(QUIZ_RESULTS).unwrap().is_empty());
    }

    #[test]
    fn selecting_outside_options_is_rejected() {
        let mut runner = QuizRunner::new();
        runner.start(&three_question_quiz()).unwrap();

        assert_eq!(
            runner.select_answer(4),
            Err(QuizError::OptionOutOfRange {
                option: 4,
                options: 4
            })
        );
    }

    #[test]
    fn actions_outside_a_quiz_are_rejected() {
        let repo = Repository::in_memory();
        let mut runner = QuizRunner::new();

        assert_eq!(runner.view(), RunView::NotStarted);
        assert_eq!(runner.select_answer(0), Err(QuizError::NotAsking));
        assert!(matches!(
            runner.submit_answer(&repo),
            Err(PortalError::Quiz(QuizError::NotAsking))
        ));

        runner.start(&quiz("1", "2", vec![question("only", 0)])).unwrap();
        runner.select_answer(0).unwrap();
        runner.submit_answer(&repo).unwrap();
        assert_eq!(runner.select_answer(0), Err(QuizError::NotAsking));
    }

    #[test]
    fn restarting_discards_progress() {
        let repo = Repository::in_memory();
        let mut runner = QuizRunner::new();
        runner.start(&three_question_quiz()).unwrap();
        runner.select_answer(0).unwrap();
        runner.submit_answer(&repo).unwrap();

        runner.start(&three_question_quiz()).unwrap();
        match runner.view() {
            RunView::Asking { index, selected, .. } => {
                assert_eq!(index, 0);
                assert_eq!(selected, None);
            }
            other => panic!("expected a question, got {:?}", other),
        }

        runner.reset();
        assert_eq!(runner.view(), RunView::NotStarted);
        assert!(repo.list(QUIZ_RESULTS).unwrap().is_empty());
    }

    #[test]
    fn only_non_empty_quizzes_start() {
        let mut runner = QuizRunner::new();

        assert_eq!(
            runner.start(&quiz("7", "2", vec![])),
            Err(QuizError::EmptyQuiz("7".to_string()))
        );
        assert_eq!(
            runner.start(&notice("8", "2", "hello")),
            Err(QuizError::NotAQuiz("8".to_string()))
        );
        assert_eq!(runner.view(), RunView::NotStarted);
    }
}
