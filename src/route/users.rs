use rocket::form::Form;
use rocket::http::Status;
use rocket::response::stream::{Event, EventStream};
use rocket::serde::json::Json;
use rocket::tokio::select;
use rocket::tokio::sync::Mutex;
use rocket::{Shutdown, State};

use crate::data::account::{AccountCreatedResponse, AccountsExt, LoginData, SignupData};
use crate::data::authoring::AuthoringForm;
use crate::data::quiz::QuizRunner;
use crate::data::session::{Session, SessionGate, SessionView};
use crate::resp::problem::Problem;
use crate::storage::Repository;

/// Register an account
#[utoipa::path(
    request_body(content = SignupData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Account registered", body = AccountCreatedResponse),
        (status = 400, description = "A required field is missing or malformed", body = Problem),
    )
)]
#[post("/user", data = "<signup>")]
#[tracing::instrument(skip(repo))]
pub async fn user_create(
    signup: Form<SignupData>,
    repo: &State<Repository>,
) -> Result<Json<AccountCreatedResponse>, Problem> {
    let account = repo.create_account(&signup)?;
    Ok(Json(AccountCreatedResponse::from(account)))
}

/// Log in and replace the current session
#[utoipa::path(
    request_body(content = LoginData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The new session", body = SessionView),
        (status = 401, description = "Invalid email or password", body = Problem),
    )
)]
#[post("/login", data = "<login>")]
#[tracing::instrument(skip(repo, gate, runner, form))]
pub async fn login_submit(
    login: Form<LoginData>,
    repo: &State<Repository>,
    gate: &State<SessionGate>,
    runner: &State<Mutex<QuizRunner>>,
    form: &State<Mutex<AuthoringForm>>,
) -> Result<Json<SessionView>, Problem> {
    login.validate()?;

    let session = gate.login(repo, &login.email, &login.password)?;
    runner.lock().await.reset();
    form.lock().await.clear();

    Ok(Json(SessionView::from(&session)))
}

/// End the current session
#[utoipa::path(responses((status = 204, description = "Logged out")))]
#[post("/logout")]
#[tracing::instrument(skip(repo, gate, runner, form))]
pub async fn logout(
    repo: &State<Repository>,
    gate: &State<SessionGate>,
    runner: &State<Mutex<QuizRunner>>,
    form: &State<Mutex<AuthoringForm>>,
) -> Result<Status, Problem> {
    gate.logout(repo)?;
    runner.lock().await.reset();
    form.lock().await.clear();
    Ok(Status::NoContent)
}

/// Current session
#[utoipa::path(
    responses(
        (status = 200, description = "The logged in identity", body = SessionView),
        (status = 401, description = "Nobody is logged in", body = Problem),
    )
)]
#[get("/session")]
#[tracing::instrument]
pub fn session_get(session: Session) -> Json<SessionView> {
    Json(SessionView::from(&session))
}

/// Session changes
///
/// Emits the session (or `null`) now and after every login or logout.
#[utoipa::path(
    responses(
        (status = 200, description = "`session` events carrying the session or null",
            content_type = "text/event-stream", body = SessionView),
    )
)]
#[get("/session/events")]
pub fn session_events(gate: &State<SessionGate>, mut shutdown: Shutdown) -> EventStream![] {
    let mut changes = gate.subscribe();

    EventStream! {
        loop {
            let current = changes.borrow_and_update().as_ref().map(SessionView::from);
            yield Event::json(&current).event("session");

            select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                },
                _ = &mut shutdown => break,
            };
        }
    }
}

///////////////////////
//       TESTS
///////////////////////
