use utoipa::ToSchema;

use super::class_level::ClassLevel;
use super::content::{ContentBody, ContentExt, ContentItem, ContentKind, QuizQuestion, OPTION_COUNT};
use crate::error::PortalError;
use crate::storage::Repository;

pub const QUESTION_INCOMPLETE: &str = "Please fill in all fields for the question.";
pub const UPLOAD_SUCCESS: &str = "Content uploaded successfully!";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: usize,
}

impl QuestionDraft {
    fn validate(self) -> Result<QuizQuestion, PortalError> {
        if self.question.is_empty()
            || self.options.len() != OPTION_COUNT
            || self.options.iter().any(String::is_empty)
        {
            return Err(PortalError::validation("question", QUESTION_INCOMPLETE));
        }

        if self.correct_answer >= OPTION_COUNT {
            return Err(PortalError::validation(
                "correctAnswer",
                format!("Correct answer must be one of the {} options.", OPTION_COUNT),
            ));
        }

        Ok(QuizQuestion {
            question: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
        })
    }
}

/// Partial update of the form; absent fields stay as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    pub kind: Option<ContentKind>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// Empty text clears the selection.
    pub class_level: Option<String>,
}

/// One form backs every tab, so switching tabs keeps what was typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthoringForm {
    pub kind: ContentKind,
    pub title: String,
    pub content: String,
    #[schema(value_type = Option<String>)]
    pub class_level: Option<ClassLevel>,
    pub questions: Vec<QuizQuestion>,
    pub file_url: Option<String>,
}

impl Default for AuthoringForm {
    fn default() -> Self {
        AuthoringForm {
            kind: ContentKind::Quiz,
            title: String::new(),
            content: String::new(),
            class_level: None,
            questions: vec![],
            file_url: None,
        }
    }
}

impl AuthoringForm {
    pub fn set_fields(&mut self, fields: FormFields) -> Result<(), PortalError> {
        let class_level = match fields.class_level.as_deref().map(str::trim) {
            None => self.class_level,
            Some("") => None,
            Some(raw) => Some(
                raw.parse::<ClassLevel>()
                    .map_err(|e| PortalError::validation("classLevel", e))?,
            ),
        };

        if let Some(kind) = fields.kind {
            self.kind = kind;
        }
        if let Some(title) = fields.title {
            self.title = title;
        }
        if let Some(content) = fields.content {
            self.content = content;
        }
        self.class_level = class_level;
        Ok(())
    }

    /// Buffers a question. Incomplete questions leave the form untouched.
    pub fn add_question(&mut self, draft: QuestionDraft) -> Result<&QuizQuestion, PortalError> {
        let question = draft.validate()?;
        self.questions.push(question);
        Ok(&self.questions[self.questions.len() - 1])
    }

    pub fn attach_file(&mut self, file_url: impl ToString) {
        self.file_url = Some(file_url.to_string());
    }

    pub fn clear(&mut self) {
        *self = AuthoringForm::default();
    }

    fn build(&self, repo: &Repository) -> Result<ContentItem, PortalError> {
        if self.title.trim().is_empty() {
            return Err(PortalError::validation("title", "Title is required."));
        }

        let class_level = self
            .class_level
            .ok_or_else(|| PortalError::validation("classLevel", "Please select a class level."))?;

        let body = match self.kind {
            ContentKind::Quiz => {
                if self.questions.is_empty() {
                    return Err(PortalError::validation(
                        "questions",
                        "Add at least one question before uploading a quiz.",
                    ));
                }
                ContentBody::Quiz {
                    questions: self.questions.clone(),
                }
            }
            ContentKind::Test => ContentBody::Test {
                file_url: self.file_url.clone(),
            },
            ContentKind::Notes => ContentBody::Notes {
                file_url: self.file_url.clone(),
            },
            ContentKind::Notice => {
                if self.content.trim().is_empty() {
                    return Err(PortalError::validation(
                        "content",
                        "Notice content is required.",
                    ));
                }
                ContentBody::Notice {
                    content: self.content.clone(),
                }
            }
        };

        Ok(ContentItem {
            id: repo.next_id()?,
            title: self.title.clone(),
            class_level,
            body,
        })
    }

    /// Stores one item built from the selected tab, then clears the form.
    pub fn submit(&mut self, repo: &Repository) -> Result<ContentItem, PortalError> {
        let item = self.build(repo)?;
        repo.append_content(item.clone())?;
        self.clear();
        Ok(item)
    }
}
