use rocket::serde::json::Json;
use rocket::tokio::time::sleep;
use rocket::State;

use crate::config::Config;
use crate::data::feedback::{Confirmation, ContactMessage, Feedback};
use crate::resp::problem::Problem;

/// Send a message through the contact form
#[utoipa::path(
    request_body = ContactMessage,
    responses(
        (status = 200, description = "Message accepted", body = Confirmation),
        (status = 400, description = "A field is too short or malformed", body = Problem),
    )
)]
#[post("/contact", data = "<message>")]
#[tracing::instrument(skip(c))]
pub async fn contact_submit(
    message: Json<ContactMessage>,
    c: &State<Config>,
) -> Result<Json<Confirmation>, Problem> {
    message.validate()?;

    // Messages are not delivered anywhere; the delay stands in for sending.
    sleep(c.submit_delay()).await;
    tracing::info!("Contact message from {} <{}>", message.name, message.email);

    Ok(Json(Confirmation::message_sent()))
}

/// Rate the site
#[utoipa::path(
    request_body = Feedback,
    responses(
        (status = 200, description = "Feedback accepted", body = Confirmation),
        (status = 400, description = "Missing rating or feedback too short", body = Problem),
    )
)]
#[post("/feedback", data = "<feedback>")]
#[tracing::instrument(skip(c))]
pub async fn feedback_submit(
    feedback: Json<Feedback>,
    c: &State<Config>,
) -> Result<Json<Confirmation>, Problem> {
    feedback.validate()?;

    sleep(c.submit_delay()).await;
    tracing::info!("Feedback rated {:?}", feedback.rating);

    Ok(Json(Confirmation::feedback_submitted()))
}

#[cfg(test)]
mod feedback_endpoints {
    use std::collections::HashMap;

    use rocket::http::{ContentType, Status};
    use serde_json::{json, Value};

    use crate::route::testing::portal;

    #[rocket::async_test]
    async fn v1_contact_works_without_session() {
        let portal = portal().await;

        let response = portal
            .client
            .post("/api/v1/contact")
            .header(ContentType::JSON)
            .body(
                json!({
                    "name": "Ann",
                    "email": "ann@x.com",
                    "message": "When does term start?"
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let confirmation: HashMap<String, Value> = response.into_json().await.unwrap();
        assert_eq!(confirmation["title"], "Message Sent");
    }

    #[rocket::async_test]
    async fn v1_short_contact_message_is_rejected() {
        let portal = portal().await;

        let response = portal
            .client
            .post("/api/v1/contact")
            .header(ContentType::JSON)
            .body(json!({"name": "Ann", "email": "ann@x.com", "message": "Hi"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let problem: HashMap<String, Value> = response.into_json().await.unwrap();
        assert_eq!(problem["field"], "message");
    }

    #[rocket::async_test]
    async fn v1_malformed_body_is_a_problem() {
        let portal = portal().await;

        let response = portal
            .client
            .post("/api/v1/contact")
            .header(ContentType::JSON)
            .body(json!({"name": 5}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        assert_eq!(
            response.content_type(),
            Some(ContentType::new("application", "problem+json"))
        );

        let problem: HashMap<String, Value> = response.into_json().await.unwrap();
        assert_eq!(problem["status"], 422);
        assert_eq!(
            problem["title"],
            "There was a problem parsing part of the request."
        );
        assert_eq!(problem["instance"], "/api/v1/contact");
    }

    #[rocket::async_test]
    async fn v1_feedback_requires_rating() {
        let portal = portal().await;

        let response = portal
            .client
            .post("/api/v1/feedback")
            .header(ContentType::JSON)
            .body(json!({"feedback": "Lovely lessons, thanks!"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = portal
            .client
            .post("/api/v1/feedback")
            .header(ContentType::JSON)
            .body(json!({"rating": 5, "feedback": "Lovely lessons, thanks!"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let confirmation: HashMap<String, Value> = response.into_json().await.unwrap();
        assert_eq!(confirmation["title"], "Feedback Submitted");
    }
}
