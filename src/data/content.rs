use utoipa::ToSchema;

use super::class_level::ClassLevel;
use crate::error::PortalError;
use crate::storage::{Repository, NOTICES, UPLOADED_CONTENT};

pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    /// Exactly four answer options, in display order.
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// Type-specific payload of a [ContentItem].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBody {
    Quiz {
        questions: Vec<QuizQuestion>,
    },
    Test {
        #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
        file_url: Option<String>,
    },
    Notes {
        #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
        file_url: Option<String>,
    },
    Notice {
        content: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Quiz,
    Test,
    Notes,
    Notice,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Quiz => write!(f, "quiz"),
            ContentKind::Test => write!(f, "test"),
            ContentKind::Notes => write!(f, "notes"),
            ContentKind::Notice => write!(f, "notice"),
        }
    }
}

impl ContentBody {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentBody::Quiz { .. } => ContentKind::Quiz,
            ContentBody::Test { .. } => ContentKind::Test,
            ContentBody::Notes { .. } => ContentKind::Notes,
            ContentBody::Notice { .. } => ContentKind::Notice,
        }
    }

    pub fn file_url(&self) -> Option<&str> {
        match self {
            ContentBody::Test { file_url } | ContentBody::Notes { file_url } => file_url.as_deref(),
            ContentBody::Quiz { .. } | ContentBody::Notice { .. } => None,
        }
    }
}

/// A teacher-authored item scoped to one class level. Never changes once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[schema(value_type = String)]
    pub class_level: ClassLevel,
    #[serde(flatten)]
    pub body: ContentBody,
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        self.body.kind()
    }

    pub fn questions(&self) -> Option<&[QuizQuestion]> {
        match &self.body {
            ContentBody::Quiz { questions } => Some(questions),
            _ => None,
        }
    }
}

pub trait ContentExt {
    /// Appends the item; notices are also copied into the notice collection.
    fn append_content(&self, item: ContentItem) -> Result<(), PortalError>;

    fn all_content(&self) -> Result<Vec<ContentItem>, PortalError>;
    fn find_content(&self, id: &str) -> Result<Option<ContentItem>, PortalError>;

    fn content_for_class(&self, class: ClassLevel) -> Result<Vec<ContentItem>, PortalError>;
    fn quizzes_for_class(&self, class: ClassLevel) -> Result<Vec<ContentItem>, PortalError>;

    fn all_notices(&self) -> Result<Vec<ContentItem>, PortalError>;
    fn notices_for_class(&self, class: ClassLevel) -> Result<Vec<ContentItem>, PortalError>;
}

impl ContentExt for Repository {
    fn append_content(&self, item: ContentItem) -> Result<(), PortalError> {
        let is_notice = item.kind() == ContentKind::Notice;
        tracing::info!(
            "Storing {} '{}' for class {} with id {}",
            item.kind(),
            item.title,
            item.class_level,
            item.id
        );

        self.push(UPLOADED_CONTENT, item.clone())?;
        if is_notice {
            self.push(NOTICES, item)?;
        }
        Ok(())
    }

    fn all_content(&self) -> Result<Vec<ContentItem>, PortalError> {
        Ok(self.list(UPLOADED_CONTENT)?)
    }

    fn find_content(&self, id: &str) -> Result<Option<ContentItem>, PortalError> {
        Ok(self
            .list(UPLOADED_CONTENT)?
            .into_iter()
            .find(|it| it.id == id))
    }

    fn content_for_class(&self, class: ClassLevel) -> Result<Vec<ContentItem>, PortalError> {
        Ok(self
            .list(UPLOADED_CONTENT)?
            .into_iter()
            .filter(|it| it.class_level == class)
            .collect())
    }

    fn all_notices(&self) -> Result<Vec<ContentItem>, PortalError> {
        Ok(self.list(NOTICES)?)
    }

    fn quizzes_for_class(&self, class: ClassLevel) -> Result<Vec<ContentItem>, PortalError> {
        Ok(self
            .list(UPLOADED_CONTENT)?
            .into_iter()
            .filter(|it| it.kind() == ContentKind::Quiz && it.class_level == class)
            .collect())
    }

    fn notices_for_class(&self, class: ClassLevel) -> Result<Vec<ContentItem>, PortalError> {
        Ok(self
            .list(NOTICES)?
            .into_iter()
            .filter(|it| it.class_level == class)
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn question(text: &str, correct_answer: usize) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer,
        }
    }

    pub fn quiz(id: &str, class: &str, questions: Vec<QuizQuestion>) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: format!("Quiz {}", id),
            class_level: class.parse().unwrap(),
            body: ContentBody::Quiz { questions },
        }
    }

    pub fn notice(id: &str, class: &str, content: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            title: format!("Notice {}", id),
            class_level: class.parse().unwrap(),
            body: ContentBody::Notice {
                content: content.to_string(),
            },
        }
    }

    #[test]
    fn stored_shape_is_flat_and_tagged() {
        let value = serde_json::to_value(quiz("1", "2", vec![question("2+2?", 1)])).unwrap();
        assert_eq!(value["type"], "quiz");
        assert_eq!(value["classLevel"], "2");
        assert_eq!(value["questions"][0]["correctAnswer"], 1);

        let notes = ContentItem {
            id: "2".into(),
            title: "Fractions".into(),
            class_level: "4".parse().unwrap(),
            body: ContentBody::Notes { file_url: None },
        };
        let value = serde_json::to_value(&notes).unwrap();
        assert_eq!(value["type"], "notes");
        assert!(value.get("fileUrl").is_none());

        let parsed: ContentItem = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, notes);
    }

    #[test]
    fn notices_are_duplicated_quizzes_are_not() {
        let repo = Repository::in_memory();

        repo.append_content(quiz("1", "2", vec![question("q", 0)]))
            .unwrap();
        assert_eq!(repo.list(UPLOADED_CONTENT).unwrap().len(), 1);
        assert_eq!(repo.list(NOTICES).unwrap().len(), 0);

        repo.append_content(notice("2", "2", "No school on Friday"))
            .unwrap();
        assert_eq!(repo.list(UPLOADED_CONTENT).unwrap().len(), 2);
        assert_eq!(repo.list(NOTICES).unwrap().len(), 1);
    }

    #[test]
    fn class_filters() {
        let repo = Repository::in_memory();
        repo.append_content(quiz("1", "2", vec![question("q", 0)]))
            .unwrap();
        repo.append_content(quiz("2", "3", vec![question("q", 0)]))
            .unwrap();
        repo.append_content(notice("3", "2", "Trip")).unwrap();

        let class2 = "2".parse().unwrap();
        let quizzes = repo.quizzes_for_class(class2).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].id, "1");

        assert_eq!(repo.notices_for_class(class2).unwrap().len(), 1);
        assert!(repo
            .notices_for_class("3".parse().unwrap())
            .unwrap()
            .is_empty());
        assert_eq!(repo.find_content("2").unwrap().unwrap().class_level.level(), 3);
        assert!(repo.find_content("9").unwrap().is_none());
    }
}
