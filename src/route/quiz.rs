use rocket::serde::json::Json;
use rocket::tokio::sync::Mutex;
use rocket::State;
use utoipa::ToSchema;

use crate::data::content::ContentExt;
use crate::data::quiz::{QuizRunner, RunView};
use crate::data::results::{QuizResult, ResultsExt};
use crate::data::session::Session;
use crate::error::PortalError;
use crate::resp::problem::Problem;
use crate::resp::session::StudentSession;
use crate::storage::Repository;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerSelection {
    /// Zero based option index.
    pub option: usize,
}

/// Where the student is in the current quiz
#[utoipa::path(
    responses(
        (status = 200, description = "Runner state", body = RunView),
        (status = 403, description = "Not a student", body = Problem),
    )
)]
#[get("/quiz")]
#[tracing::instrument(skip(runner))]
pub async fn quiz_state(
    _student: StudentSession,
    runner: &State<Mutex<QuizRunner>>,
) -> Json<RunView> {
    Json(runner.lock().await.view())
}

/// Start a quiz from its first question
#[utoipa::path(
    params(("id", description = "Quiz content id")),
    responses(
        (status = 200, description = "First question", body = RunView),
        (status = 400, description = "Content is not a quiz or has no questions", body = Problem),
        (status = 404, description = "No quiz with that id for this class", body = Problem),
    )
)]
#[post("/quiz/<id>/start")]
#[tracing::instrument(skip(repo, runner))]
pub async fn quiz_start(
    id: &str,
    student: StudentSession,
    repo: &State<Repository>,
    runner: &State<Mutex<QuizRunner>>,
) -> Result<Json<RunView>, Problem> {
    let quiz = repo
        .find_content(id)?
        .filter(|it| student.0.class() == Some(it.class_level))
        .ok_or_else(|| PortalError::ContentNotFound(id.to_string()))?;

    let mut runner = runner.lock().await;
    runner.start(&quiz)?;
    Ok(Json(runner.view()))
}

/// Select an answer for the current question
#[utoipa::path(
    request_body = AnswerSelection,
    responses(
        (status = 200, description = "Runner state with the selection", body = RunView),
        (status = 409, description = "No quiz in progress", body = Problem),
    )
)]
#[put("/quiz/answer", data = "<selection>")]
#[tracing::instrument(skip(runner))]
pub async fn quiz_select_answer(
    _student: StudentSession,
    selection: Json<AnswerSelection>,
    runner: &State<Mutex<QuizRunner>>,
) -> Result<Json<RunView>, Problem> {
    let mut runner = runner.lock().await;
    runner.select_answer(selection.option)?;
    Ok(Json(runner.view()))
}

/// Submit the selected answer; the last one completes the quiz
#[utoipa::path(
    responses(
        (status = 200, description = "Next question or the final score", body = RunView),
        (status = 409, description = "No answer selected or no quiz in progress", body = Problem),
    )
)]
#[post("/quiz/submit")]
#[tracing::instrument(skip(repo, runner))]
pub async fn quiz_submit_answer(
    _student: StudentSession,
    repo: &State<Repository>,
    runner: &State<Mutex<QuizRunner>>,
) -> Result<Json<RunView>, Problem> {
    let mut runner = runner.lock().await;
    runner.submit_answer(repo)?;
    Ok(Json(runner.view()))
}

/// List recorded quiz results
#[utoipa::path(
    responses(
        (status = 200, description = "Results in completion order", body = Vec<QuizResult>),
        (status = 401, description = "Nobody is logged in", body = Problem),
    )
)]
#[get("/results")]
#[tracing::instrument(skip(repo))]
pub async fn result_list(
    _session: Session,
    repo: &State<Repository>,
) -> Result<Json<Vec<QuizResult>>, Problem> {
    Ok(Json(repo.results()?))
}

///////////////////////
//       TESTS
///////////////////////
