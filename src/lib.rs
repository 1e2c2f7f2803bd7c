#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde;

use rocket::http::Method;
use rocket::tokio::sync::Mutex;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedHeaders, AllowedOrigins};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::data::authoring::AuthoringForm;
use crate::data::quiz::QuizRunner;
use crate::data::session::SessionGate;
use crate::error::{BackendError, ConfigurationError};
use crate::route::mount_api;
use crate::storage::{FileStore, Repository};

pub mod config;
pub mod data;
pub mod error;
pub mod resp;
pub mod role;
pub mod route;
pub mod storage;
pub mod util;

fn init_logging(level: Level) {
    if let Err(err) = tracing_log::LogTracer::init() {
        eprintln!("Unable to forward log records: {}", err);
    }

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Unable to set global logger: {}", err);
    };
}

fn load_config() -> Result<Config, ConfigurationError> {
    tracing::info!("Loading configuration...");
    match Config::load() {
        Ok(c) => {
            tracing::info!("Configuration loaded.");
            Ok(c)
        }
        Err(ConfigurationError::NotFound(dir)) => {
            tracing::info!("No configuration in '{}', using defaults.", dir.display());
            let c = Config::default();
            if c.save().is_err() {
                tracing::warn!("Unable to save generated configuration.");
            }
            Ok(c)
        }
        Err(other) => {
            tracing::error!("Configuration error: {}", other);
            Err(other)
        }
    }
}

/// Builds the server from the environment: `.env`, settings file and the
/// on-disk store.
pub fn create(log_level: Option<Level>) -> Result<Rocket<Build>, BackendError> {
    if let Some(l) = log_level {
        init_logging(l);
    }

    tracing::info!("Reading .env file...");
    if dotenv::dotenv().is_err() {
        tracing::warn!("Unable to load .env file.");
    }

    let c = load_config()?;

    let store = FileStore::open(&c.storage_dir)?;
    create_with(c, Repository::new(store))
}

/// Builds the server around an existing repository.
pub fn create_with(c: Config, repo: Repository) -> Result<Rocket<Build>, BackendError> {
    tracing::info!("Restoring session...");
    let gate = SessionGate::load(&repo, &c.teacher_title)?;

    tracing::info!("Setting up CORS...");
    let cors = rocket_cors::CorsOptions {
        allowed_origins: AllowedOrigins::All,
        allowed_methods: vec![Method::Get, Method::Put, Method::Post, Method::Delete]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: AllowedHeaders::All,
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()?;

    let r = rocket::build()
        .manage(c)
        .manage(repo)
        .manage(gate)
        .manage(Mutex::new(AuthoringForm::default()))
        .manage(Mutex::new(QuizRunner::new()))
        .attach(cors);

    Ok(mount_api(r))
}
