use std::io::Cursor;

use rocket::http::hyper::header::CONTENT_LANGUAGE;
use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::{response, Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

use crate::error::{PortalError, QuizError, StorageError};

/// Implements [RFC7807](https://tools.ietf.org/html/rfc7807).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    #[serde(skip)]
    pub status: Status,
    pub type_uri: String,
    pub title: String,

    pub detail: Option<String>,
    pub instance_uri: Option<String>,

    #[schema(value_type = Object)]
    pub body: Map<String, Value>,
}

impl Default for Problem {
    fn default() -> Self {
        Problem {
            status: Status::InternalServerError,
            type_uri: "about:blank".to_string(),
            title: "Problem".to_string(),
            detail: None,
            instance_uri: None,
            body: Map::new(),
        }
    }
}

impl Problem {
    pub fn new_untyped(status: Status, title: impl ToString) -> Problem {
        Problem {
            status,
            type_uri: "about:blank".to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn detail(&mut self, value: impl ToString) -> &mut Problem {
        self.detail = Some(value.to_string());
        self
    }

    pub fn instance_uri(&mut self, value: String) -> &mut Problem {
        self.instance_uri = Some(value);
        self
    }

    pub fn insert_str(&mut self, key: impl ToString, value: impl ToString) -> &mut Problem {
        self.body
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    fn into_body(self) -> Map<String, Value> {
        let mut body = self.body;

        // Following are required by rfc7807
        body.insert(String::from("type"), Value::from(self.type_uri));
        body.insert(String::from("title"), Value::from(self.title));

        // Optional parameters as specified by rfc7807
        if let Some(detail) = self.detail {
            body.insert(String::from("detail"), Value::from(detail));
        }
        body.insert(String::from("status"), Value::from(self.status.code));
        if let Some(instance) = self.instance_uri {
            body.insert(String::from("instance"), Value::from(instance));
        }

        body
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.title)
    }
}

impl std::error::Error for Problem {}

impl<'r> Responder<'r, 'static> for Problem {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status;
        let body_string = Value::Object(self.into_body()).to_string();

        Response::build()
            .status(status)
            .header(ContentType::new("application", "problem+json"))
            .raw_header(CONTENT_LANGUAGE.as_str(), "en")
            .sized_body(body_string.len(), Cursor::new(body_string))
            .ok()
    }
}

pub mod problems {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn parse_problem() -> Problem {
        Problem::new_untyped(
            Status::BadRequest,
            "There was a problem parsing part of the request.",
        )
    }

    #[inline]
    pub fn not_found(what: impl ToString) -> Problem {
        Problem::new_untyped(Status::NotFound, "Not found.")
            .detail(what)
            .to_owned()
    }
}

impl From<StorageError> for Problem {
    fn from(e: StorageError) -> Self {
        tracing::error!("Storage failure: {}", e);
        Problem::new_untyped(
            Status::InternalServerError,
            "Unable to access local storage.",
        )
        .detail("Submitted data might not be properly stored.")
        .to_owned()
    }
}

impl From<QuizError> for Problem {
    fn from(e: QuizError) -> Self {
        let status = match e {
            QuizError::NotAsking | QuizError::NoSelection => Status::Conflict,
            QuizError::OptionOutOfRange { .. }
            | QuizError::NotAQuiz(_)
            | QuizError::EmptyQuiz(_) => Status::BadRequest,
        };
        Problem::new_untyped(status, "Unable to continue the quiz.")
            .detail(e)
            .to_owned()
    }
}

impl From<PortalError> for Problem {
    fn from(e: PortalError) -> Self {
        match e {
            PortalError::Validation { field, message } => {
                Problem::new_untyped(Status::BadRequest, "Validation failed.")
                    .detail(message)
                    .insert_str("field", field)
                    .to_owned()
            }
            PortalError::InvalidCredentials => {
                Problem::new_untyped(Status::Unauthorized, PortalError::InvalidCredentials)
            }
            PortalError::ContentNotFound(id) => problems::not_found(format!(
                "No content with id '{}'.",
                id
            )),
            PortalError::Quiz(e) => e.into(),
            PortalError::Storage(e) => e.into(),
        }
    }
}

impl From<std::io::Error> for Problem {
    fn from(_: std::io::Error) -> Self {
        Problem::new_untyped(Status::InternalServerError, "Server IO error")
    }
}
