use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::tokio::fs;
use rocket::tokio::sync::Mutex;
use rocket::State;
use utoipa::ToSchema;

use crate::config::Config;
use crate::data::authoring::{AuthoringForm, FormFields, QuestionDraft, UPLOAD_SUCCESS};
use crate::data::content::{ContentExt, ContentItem};
use crate::data::session::Session;
use crate::error::PortalError;
use crate::resp::problem::Problem;
use crate::resp::session::TeacherSession;
use crate::role::Role;
use crate::storage::Repository;
use crate::util;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub item: ContentItem,
}

/// Content visible to the session: everything for teachers, the own class for students.
fn visible_content(session: &Session, repo: &Repository) -> Result<Vec<ContentItem>, PortalError> {
    match (session.account_type(), session.class()) {
        (Role::Teacher, _) => repo.all_content(),
        (Role::Student, Some(class)) => repo.content_for_class(class),
        (Role::Student, None) => Ok(vec![]),
    }
}

/// List uploaded content
#[utoipa::path(
    responses(
        (status = 200, description = "Content in upload order", body = Vec<ContentItem>),
        (status = 401, description = "Nobody is logged in", body = Problem),
    )
)]
#[get("/content")]
#[tracing::instrument(skip(repo))]
pub async fn content_list(
    session: Session,
    repo: &State<Repository>,
) -> Result<Json<Vec<ContentItem>>, Problem> {
    Ok(Json(visible_content(&session, repo)?))
}

/// Get one content item
#[utoipa::path(
    params(("id", description = "Content id")),
    responses(
        (status = 200, description = "The content item", body = ContentItem),
        (status = 404, description = "No visible content with that id", body = Problem),
    )
)]
#[get("/content/<id>")]
#[tracing::instrument(skip(repo))]
pub async fn content_get(
    id: &str,
    session: Session,
    repo: &State<Repository>,
) -> Result<Json<ContentItem>, Problem> {
    let item = repo
        .find_content(id)?
        .filter(|it| {
            session.account_type() == Role::Teacher || session.class() == Some(it.class_level)
        })
        .ok_or_else(|| PortalError::ContentNotFound(id.to_string()))?;

    Ok(Json(item))
}

/// List notices for the session's class
#[utoipa::path(
    responses(
        (status = 200, description = "Notices in upload order", body = Vec<ContentItem>),
        (status = 401, description = "Nobody is logged in", body = Problem),
    )
)]
#[get("/notices")]
#[tracing::instrument(skip(repo))]
pub async fn notice_list(
    session: Session,
    repo: &State<Repository>,
) -> Result<Json<Vec<ContentItem>>, Problem> {
    let notices = match (session.account_type(), session.class()) {
        (Role::Teacher, _) => repo.all_notices()?,
        (Role::Student, Some(class)) => repo.notices_for_class(class)?,
        (Role::Student, None) => vec![],
    };
    Ok(Json(notices))
}

/// Current authoring form
#[utoipa::path(
    responses(
        (status = 200, description = "Buffered form state", body = AuthoringForm),
        (status = 403, description = "Not a teacher", body = Problem),
    )
)]
#[get("/authoring")]
#[tracing::instrument(skip(form))]
pub async fn authoring_get(
    _teacher: TeacherSession,
    form: &State<Mutex<AuthoringForm>>,
) -> Json<AuthoringForm> {
    Json(form.lock().await.clone())
}

/// Update tab, title, notice text or class level
#[utoipa::path(
    request_body = FormFields,
    responses(
        (status = 200, description = "Updated form state", body = AuthoringForm),
        (status = 400, description = "Invalid class level", body = Problem),
    )
)]
#[put("/authoring", data = "<fields>")]
#[tracing::instrument(skip(form))]
pub async fn authoring_update(
    _teacher: TeacherSession,
    fields: Json<FormFields>,
    form: &State<Mutex<AuthoringForm>>,
) -> Result<Json<AuthoringForm>, Problem> {
    let mut form = form.lock().await;
    form.set_fields(fields.into_inner())?;
    Ok(Json(form.clone()))
}

/// Buffer a quiz question
#[utoipa::path(
    request_body = QuestionDraft,
    responses(
        (status = 200, description = "Updated form state", body = AuthoringForm),
        (status = 400, description = "Incomplete question", body = Problem),
    )
)]
#[post("/authoring/question", data = "<draft>")]
#[tracing::instrument(skip(form))]
pub async fn authoring_add_question(
    _teacher: TeacherSession,
    draft: Json<QuestionDraft>,
    form: &State<Mutex<AuthoringForm>>,
) -> Result<Json<AuthoringForm>, Problem> {
    let mut form = form.lock().await;
    form.add_question(draft.into_inner())?;
    Ok(Json(form.clone()))
}

/// Attach a document
///
/// Stores the request body under the upload directory and attaches it to the form.
#[utoipa::path(
    params(("name", description = "Original file name")),
    request_body(
        content = String,
        description = "Raw document bytes",
        content_type = "application/octet-stream"
    ),
    responses(
        (status = 200, description = "Form state with the document attached", body = AuthoringForm),
        (status = 403, description = "Not a teacher", body = Problem),
    )
)]
#[post("/authoring/file?<name>", data = "<file>")]
#[tracing::instrument(skip(file, c, repo, form))]
pub async fn authoring_attach_file(
    _teacher: TeacherSession,
    name: String,
    mut file: TempFile<'_>,
    c: &State<Config>,
    repo: &State<Repository>,
    form: &State<Mutex<AuthoringForm>>,
) -> Result<Json<AuthoringForm>, Problem> {
    let stored = format!("{}-{}", repo.next_id()?, util::sanitize_file_name(&name));

    fs::create_dir_all(&c.upload_dir).await?;
    file.copy_to(c.upload_dir.join(&stored)).await?;
    tracing::info!("Saved upload '{}' as {}", name, stored);

    let mut form = form.lock().await;
    form.attach_file(format!("/uploads/{}", stored));
    Ok(Json(form.clone()))
}

/// Store the form as a new content item
#[utoipa::path(
    responses(
        (status = 200, description = "Content stored; form cleared", body = UploadResponse),
        (status = 400, description = "A required field is missing", body = Problem),
    )
)]
#[post("/authoring/submit")]
#[tracing::instrument(skip(repo, form))]
pub async fn authoring_submit(
    _teacher: TeacherSession,
    repo: &State<Repository>,
    form: &State<Mutex<AuthoringForm>>,
) -> Result<Json<UploadResponse>, Problem> {
    let item = form.lock().await.submit(repo)?;
    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS.to_string(),
        item,
    }))
}

///////////////////////
//       TESTS
///////////////////////
