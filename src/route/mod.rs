use std::collections::BTreeMap;

use rocket::http::Status;
use rocket::{Build, Request, Rocket, Route};

pub mod content;
pub mod dashboard;
pub mod feedback;
pub mod files;
pub mod quiz;
pub mod users;

use content::*;
use dashboard::*;
use feedback::*;
use files::*;
use quiz::*;
use users::*;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    data::{
        account::{AccountCreatedResponse, LoginData, SignupData},
        authoring::{AuthoringForm, FormFields, QuestionDraft},
        content::{ContentBody, ContentItem, ContentKind, QuizQuestion},
        dashboard::{Dashboard, QuizListing},
        feedback::{Confirmation, ContactMessage, Feedback},
        quiz::RunView,
        results::{Progress, QuizResult},
        session::SessionView,
    },
    resp::problem::{problems, Problem},
    role::Role,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        user_create,
        login_submit,
        logout,
        session_get,
        session_events,
        content_list,
        content_get,
        notice_list,
        authoring_get,
        authoring_update,
        authoring_add_question,
        authoring_attach_file,
        authoring_submit,
        quiz_state,
        quiz_start,
        quiz_select_answer,
        quiz_submit_answer,
        result_list,
        dashboard_get,
        contact_submit,
        feedback_submit
    ),
    components(schemas(
        Role,
        SignupData,
        LoginData,
        AccountCreatedResponse,
        SessionView,
        ContentKind,
        ContentBody,
        ContentItem,
        QuizQuestion,
        QuestionDraft,
        FormFields,
        AuthoringForm,
        UploadResponse,
        AnswerSelection,
        RunView,
        QuizResult,
        Progress,
        QuizListing,
        Dashboard,
        ContactMessage,
        Feedback,
        Confirmation,
        Problem
    )),
    modifiers(&V1_PREFIX)
)]
pub struct ApiDocV1;

pub struct PathPrefix(pub &'static str);
static V1_PREFIX: PathPrefix = PathPrefix("/api/v1");

impl utoipa::Modify for PathPrefix {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut new_paths = BTreeMap::new();

        for (path, item) in std::mem::take(&mut openapi.paths.paths) {
            new_paths.insert(self.0.to_string() + path.as_ref(), item);
        }

        openapi.paths.paths = new_paths;
    }
}

pub fn api_v1() -> Vec<Route> {
    routes![
        user_create,
        login_submit,
        logout,
        session_get,
        session_events,
        content_list,
        content_get,
        notice_list,
        authoring_get,
        authoring_update,
        authoring_add_question,
        authoring_attach_file,
        authoring_submit,
        quiz_state,
        quiz_start,
        quiz_select_answer,
        quiz_submit_answer,
        result_list,
        dashboard_get,
        contact_submit,
        feedback_submit
    ]
}

#[catch(default)]
fn problem_catcher(status: Status, req: &Request<'_>) -> Problem {
    let mut problem = match status.code {
        400 | 422 => Problem {
            status,
            ..problems::parse_problem()
        },
        _ => Problem::new_untyped(status, status.reason().unwrap_or("Unknown error.")),
    };
    problem.instance_uri(req.uri().to_string()).to_owned()
}

pub fn mount_api(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/api/v1", api_v1())
        .register("/api/v1", catchers![problem_catcher])
        .mount(
            "/",
            SwaggerUi::new("/swagger/<_..>").url("/api/v1/openapi.json", ApiDocV1::openapi()),
        )
        .mount("/", routes![app, app_path, uploaded_file])
}
