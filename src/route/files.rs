use std::path::PathBuf;

use rocket::fs::NamedFile;
use rocket::State;

use crate::config::Config;

async fn app_index_file(c: &Config) -> Option<NamedFile> {
    let index = c.public_content.join("index.html");
    match NamedFile::open(&index).await {
        Ok(file) => Some(file),
        Err(_) => {
            tracing::warn!("'{}' does not exist!", index.display());
            None
        }
    }
}

#[get("/")]
pub async fn app(c: &State<Config>) -> Option<NamedFile> {
    app_index_file(c).await
}

/// Site pages; unknown paths fall back to the index page.
#[get("/<path..>", rank = 10)]
pub async fn app_path(path: PathBuf, c: &State<Config>) -> Option<NamedFile> {
    match NamedFile::open(c.public_content.join(path)).await {
        Ok(file) => Some(file),
        Err(_) => app_index_file(c).await,
    }
}

#[get("/uploads/<file..>", rank = 5)]
pub async fn uploaded_file(file: PathBuf, c: &State<Config>) -> Option<NamedFile> {
    NamedFile::open(c.upload_dir.join(file)).await.ok()
}
