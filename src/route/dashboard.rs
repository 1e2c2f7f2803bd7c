use rocket::serde::json::Json;
use rocket::State;

use crate::data::dashboard::Dashboard;
use crate::data::session::Session;
use crate::resp::problem::Problem;
use crate::storage::Repository;

/// Dashboard for the logged in account
#[utoipa::path(
    responses(
        (status = 200, description = "Teacher or student dashboard", body = Dashboard),
        (status = 401, description = "Nobody is logged in", body = Problem),
    )
)]
#[get("/dashboard")]
#[tracing::instrument(skip(repo))]
pub async fn dashboard_get(
    session: Session,
    repo: &State<Repository>,
) -> Result<Json<Dashboard>, Problem> {
    Ok(Json(Dashboard::for_session(&session, repo)?))
}

#[cfg(test)]
mod dashboard_endpoints {
    use std::collections::HashMap;

    use rocket::http::Status;
    use serde_json::Value;

    use crate::route::testing::{enter_as, portal};

    #[rocket::async_test]
    async fn v1_dashboard_requires_session() {
        let portal = portal().await;

        let response = portal.client.get("/api/v1/dashboard").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn v1_new_student_has_empty_progress() {
        let portal = portal().await;
        enter_as(&portal.client, "Jane Roe", "jane@x.com", "student", Some("2")).await;

        let response = portal.client.get("/api/v1/dashboard").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let dashboard: HashMap<String, Value> = response.into_json().await.unwrap();
        assert_eq!(dashboard["view"], "student");
        assert_eq!(dashboard["profile"]["initials"], "JR");
        assert_eq!(dashboard["progress"]["completed"], 0);
        assert_eq!(dashboard["progress"]["averageDisplay"], "N/A");
        assert_eq!(dashboard["progress"]["completionPercent"], Value::Null);
    }

    #[rocket::async_test]
    async fn v1_teacher_dashboard_lists_content() {
        let portal = portal().await;
        enter_as(&portal.client, "John Doe", "john@x.com", "teacher", None).await;

        let response = portal.client.get("/api/v1/dashboard").dispatch().await;
        let dashboard: HashMap<String, Value> = response.into_json().await.unwrap();
        assert_eq!(dashboard["view"], "teacher");
        assert_eq!(dashboard["profile"]["role"], "Mathematics Instructor");
        assert_eq!(dashboard["content"], Value::Array(vec![]));
    }
}
