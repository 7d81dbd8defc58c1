use crate::models::config_validator::validate_config;
use crate::models::error::{AdminError, Result};
use log::{info, warn};
use rocket::fs::relative;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_progress_file")]
    pub progress_file: String,
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_backup_script")]
    pub backup_script: String,
    /// Directory the backup script runs in. Inherits the server's when unset.
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_admin")]
    pub admin_username: String,
    #[serde(default = "default_admin")]
    pub admin_password: String,
    /// Key for the encrypted session cookie. Required in release builds.
    #[serde(default)]
    pub secret_key: Option<String>,
}

fn default_database_file() -> String {
    "backup_admin.db".to_string()
}
fn default_progress_file() -> String {
    "progress.txt".to_string()
}
fn default_interpreter() -> String {
    "/usr/bin/python3".to_string()
}
fn default_backup_script() -> String {
    "backup.py".to_string()
}
fn default_address() -> String {
    "127.0.0.1".to_string()
}
const fn default_port() -> u16 {
    8000
}
fn default_template_dir() -> String {
    relative!("templates").to_string()
}
fn default_static_dir() -> String {
    relative!("static").to_string()
}
fn default_admin() -> String {
    "admin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            progress_file: default_progress_file(),
            interpreter: default_interpreter(),
            backup_script: default_backup_script(),
            working_directory: None,
            address: default_address(),
            port: default_port(),
            template_dir: default_template_dir(),
            static_dir: default_static_dir(),
            admin_username: default_admin(),
            admin_password: default_admin(),
            secret_key: None,
        }
    }
}

pub fn setup_config(config_file: String) -> Result<Config> {
    let config_path = PathBuf::from(config_file);
    info!("Loading config from: {}", config_path.display());

    let config_str = match fs::read_to_string(&config_path) {
        Ok(config_str) => config_str,
        Err(cause) if cause.kind() == ErrorKind::NotFound => {
            warn!(
                "Config file {} not found, using default configuration",
                config_path.display()
            );
            let config = Config::default();
            validate_config(&config)?;
            return Ok(config);
        }
        Err(cause) => {
            return Err(AdminError::ConfigRead {
                path: config_path,
                cause,
            })
        }
    };

    let config: Config =
        serde_json::from_str(&config_str).map_err(|cause| AdminError::ConfigParse {
            path: config_path,
            cause,
        })?;

    validate_config(&config)?;

    Ok(config)
}
