use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::data::session::{Session, SessionGate};
use crate::resp::problem::Problem;
use crate::role::Role;

pub fn auth_problem(detail: impl ToString) -> Problem {
    Problem::new_untyped(Status::Unauthorized, "Unable to authorize user.")
        .detail(detail)
        .clone()
}

pub fn role_problem(required: Role) -> Problem {
    Problem::new_untyped(Status::Forbidden, "Not allowed for this account type.")
        .detail(format!("Only {} accounts can do this.", required))
        .clone()
}

fn current_session(req: &Request<'_>) -> Result<Session, Problem> {
    let gate: &SessionGate = req
        .rocket()
        .state()
        .ok_or_else(|| Problem::new_untyped(Status::InternalServerError, "Sessions unavailable."))?;

    gate.current().ok_or_else(|| auth_problem("Nobody is logged in."))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Session {
    type Error = Problem;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match current_session(req) {
            Ok(session) => {
                tracing::trace!("request runs as {}", session.account.email);
                Outcome::Success(session)
            }
            Err(e) => {
                tracing::debug!("no session for request");
                Outcome::Error((e.status, e))
            }
        }
    }
}

fn session_with_role(req: &Request<'_>, role: Role) -> request::Outcome<Session, Problem> {
    match current_session(req) {
        Ok(session) if session.account_type() == role => Outcome::Success(session),
        Ok(session) => {
            tracing::debug!(
                "{} session refused for {}-only route",
                session.account_type(),
                role
            );
            Outcome::Error((Status::Forbidden, role_problem(role)))
        }
        Err(e) => Outcome::Error((e.status, e)),
    }
}

/// Session of a logged in teacher.
#[derive(Debug, Clone)]
pub struct TeacherSession(pub Session);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TeacherSession {
    type Error = Problem;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        session_with_role(req, Role::Teacher).map(TeacherSession)
    }
}

/// Session of a logged in student.
#[derive(Debug, Clone)]
pub struct StudentSession(pub Session);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for StudentSession {
    type Error = Problem;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        session_with_role(req, Role::Student).map(StudentSession)
    }
}
