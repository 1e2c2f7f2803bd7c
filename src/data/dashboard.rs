use utoipa::ToSchema;

use super::class_level::ClassLevel;
use super::content::{ContentExt, ContentItem};
use super::results::{Progress, ResultsExt};
use super::session::{Session, SessionView};
use crate::error::PortalError;
use crate::role::Role;
use crate::storage::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuizListing {
    pub id: String,
    pub title: String,
    pub questions: usize,
}

impl From<&ContentItem> for QuizListing {
    fn from(item: &ContentItem) -> Self {
        QuizListing {
            id: item.id.clone(),
            title: item.title.clone(),
            questions: item.questions().map_or(0, |q| q.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Dashboard {
    Teacher {
        profile: SessionView,
        content: Vec<ContentItem>,
    },
    Student {
        profile: SessionView,
        quizzes: Vec<QuizListing>,
        notices: Vec<ContentItem>,
        progress: Progress,
    },
}

impl Dashboard {
    /// Renders the view matching the session's account type.
    pub fn for_session(session: &Session, repo: &Repository) -> Result<Dashboard, PortalError> {
        let profile = SessionView::from(session);

        match (session.account_type(), session.class()) {
            (Role::Teacher, _) => Ok(Dashboard::Teacher {
                profile,
                content: repo.all_content()?,
            }),
            (Role::Student, class) => {
                let (quizzes, notices) = match class {
                    Some(class) => student_content(repo, class)?,
                    None => (vec![], vec![]),
                };
                let results = repo.results()?;

                Ok(Dashboard::Student {
                    profile,
                    progress: Progress::new(&results, quizzes.len()),
                    quizzes,
                    notices,
                })
            }
        }
    }
}

fn student_content(
    repo: &Repository,
    class: ClassLevel,
) -> Result<(Vec<QuizListing>, Vec<ContentItem>), PortalError> {
    let quizzes = repo
        .quizzes_for_class(class)?
        .iter()
        .map(QuizListing::from)
        .collect();
    Ok((quizzes, repo.notices_for_class(class)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::account::tests::{student_signup, teacher_signup};
    use crate::data::account::AccountsExt;
    use crate::data::authoring::{AuthoringForm, FormFields, QuestionDraft};
    use crate::data::content::ContentKind;
    use crate::data::session::SessionGate;

    fn upload_quiz(repo: &Repository, title: &str, class: &str, questions: usize) {
        let mut form = AuthoringForm::default();
        form.set_fields(FormFields {
            kind: Some(ContentKind::Quiz),
            title: Some(title.to_string()),
            content: None,
            class_level: Some(class.to_string()),
        })
        .unwrap();
        for n in 0..questions {
            form.add_question(QuestionDraft {
                question: format!("Question {}", n),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: 0,
            })
            .unwrap();
        }
        form.submit(repo).unwrap();
    }

    #[test]
    fn class_scoped_quiz_visibility() {
        let repo = Repository::in_memory();
        let gate = SessionGate::load(&repo, "Mathematics Instructor").unwrap();

        repo.create_account(&student_signup("Jane", "jane@x.com", "2"))
            .unwrap();
        repo.create_account(&student_signup("Sam", "sam@x.com", "3"))
            .unwrap();

        let jane = gate.login(&repo, "jane@x.com", "pw123").unwrap();
        assert_eq!(jane.role, "Class 2 Student");

        upload_quiz(&repo, "Counting", "2", 2);

        match Dashboard::for_session(&jane, &repo).unwrap() {
            Dashboard::Student {
                quizzes, progress, ..
            } => {
                assert_eq!(quizzes.len(), 1);
                assert_eq!(quizzes[0].title, "Counting");
                assert_eq!(quizzes[0].questions, 2);
                assert_eq!(progress.available, 1);
                assert_eq!(progress.average_display, "N/A");
            }
            other => panic!("expected student dashboard, got {:?}", other),
        }

        let sam = gate.login(&repo, "sam@x.com", "pw123").unwrap();
        match Dashboard::for_session(&sam, &repo).unwrap() {
            Dashboard::Student { quizzes, .. } => assert!(quizzes.is_empty()),
            other => panic!("expected student dashboard, got {:?}", other),
        }
    }

    #[test]
    fn teacher_sees_all_content() {
        let repo = Repository::in_memory();
        let gate = SessionGate::load(&repo, "Mathematics Instructor").unwrap();
        repo.create_account(&teacher_signup("John Doe", "john@x.com"))
            .unwrap();

        upload_quiz(&repo, "Counting", "2", 1);
        upload_quiz(&repo, "Shapes", "5", 1);

        let john = gate.login(&repo, "john@x.com", "teach").unwrap();
        match Dashboard::for_session(&john, &repo).unwrap() {
            Dashboard::Teacher { content, profile } => {
                assert_eq!(content.len(), 2);
                assert_eq!(profile.role, "Mathematics Instructor");
            }
            other => panic!("expected teacher dashboard, got {:?}", other),
        }
    }
}
