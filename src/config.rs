use crate::error::ConfigurationError;
use crate::util;
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_storage_dir() -> PathBuf {
    PathBuf::from(env::var("STORAGE_DIR").unwrap_or("./data".to_string()))
}

fn default_public_content() -> PathBuf {
    PathBuf::from(env::var("PUBLIC_CONTENT_PATH").unwrap_or("./public".to_string()))
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from(env::var("UPLOAD_DIR").unwrap_or("./uploads".to_string()))
}

fn default_submit_delay_ms() -> u64 {
    env::var("SUBMIT_DELAY_MS")
        .ok()
        .and_then(|it| it.parse().ok())
        .unwrap_or(1000)
}

fn default_teacher_title() -> String {
    env::var("TEACHER_TITLE").unwrap_or("Mathematics Instructor".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    file_path: PathBuf,

    /// Directory holding one JSON document per stored collection.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default = "default_public_content")]
    pub public_content: PathBuf,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Pause before contact and feedback submissions are acknowledged.
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,

    /// Display role shown for teacher sessions.
    #[serde(default = "default_teacher_title")]
    pub teacher_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file_path: config_dir().join("settings.yml"),
            storage_dir: default_storage_dir(),
            public_content: default_public_content(),
            upload_dir: default_upload_dir(),
            submit_delay_ms: default_submit_delay_ms(),
            teacher_title: default_teacher_title(),
        }
    }
}

#[inline]
fn config_dir() -> PathBuf {
    PathBuf::from(env::var("CONFIG_DIR").unwrap_or("./config".to_string()))
}

impl Config {
    pub fn load() -> Result<Config, ConfigurationError> {
        Config::load_from(config_dir())
    }

    pub fn load_from(dir: impl AsRef<Path>) -> Result<Config, ConfigurationError> {
        let config_file = util::find_first_subpath(
            dir.as_ref(),
            &["settings.yml", "settings.yaml"],
            Path::exists,
        )
        .ok_or_else(|| ConfigurationError::NotFound(dir.as_ref().to_path_buf()))?;

        let file = File::open(&config_file)?;
        let mut config: Config = serde_yaml::from_reader(BufReader::new(file))?;
        config.file_path = config_file;

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigurationError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.file_path)?;
        let mut out = BufWriter::new(file);
        serde_yaml::to_writer(&mut out, self)?;
        out.flush()?;
        Ok(())
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Config {
        self.file_path = path.into();
        self
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}
