use crate::models::config::Config;
use crate::models::error::{AdminError, Result};
use log::{info, warn};
use std::net::IpAddr;
use std::path::Path;

/// Rocket accepts a 256-bit key as base64 (44 chars) or hex (64 chars).
const MIN_SECRET_KEY_LEN: usize = 44;

/// Validates the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating configuration...");

    validate_server(config)?;
    validate_admin_credentials(config)?;
    validate_database_path(&config.database_file)?;
    validate_backup_command(config)?;
    validate_web_assets(config)?;
    validate_secret_key(config.secret_key.as_deref())?;

    info!("Configuration validation passed");
    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    if config.address.parse::<IpAddr>().is_err() {
        return Err(AdminError::InvalidConfig(format!(
            "address '{}' is not a valid IP address",
            config.address
        )));
    }

    if config.port == 0 {
        return Err(AdminError::InvalidConfig(
            "port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_admin_credentials(config: &Config) -> Result<()> {
    if config.admin_username.trim().is_empty() {
        return Err(AdminError::InvalidConfig(
            "admin_username cannot be empty".to_string(),
        ));
    }

    if config.admin_password.is_empty() {
        return Err(AdminError::InvalidConfig(
            "admin_password cannot be empty".to_string(),
        ));
    }

    if config.admin_password == "admin" {
        warn!("admin_password is still the default. Change it before exposing the panel.");
    }

    Ok(())
}

fn validate_database_path(db_path: &str) -> Result<()> {
    if db_path.is_empty() {
        return Err(AdminError::InvalidConfig(
            "database_file cannot be empty. Use ':memory:' for an in-memory database.".to_string(),
        ));
    }

    if db_path == ":memory:" || db_path.starts_with("file::memory:") {
        warn!("Using an in-memory database. Backup records will not survive a restart.");
        return Ok(());
    }

    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            #[cfg(windows)]
            let suggestion = format!("mkdir \"{}\"", parent.display());
            #[cfg(not(windows))]
            let suggestion = format!("mkdir -p \"{}\"", parent.display());

            return Err(AdminError::InvalidConfig(format!(
                "Database directory does not exist: {}\nSuggestion: Create the directory with: {}",
                parent.display(),
                suggestion
            )));
        }
    }

    Ok(())
}

/// The script is only checked for presence; a missing script is not fatal
/// because it may be deployed after the panel.
fn validate_backup_command(config: &Config) -> Result<()> {
    if config.interpreter.trim().is_empty() {
        return Err(AdminError::InvalidConfig(
            "interpreter cannot be empty".to_string(),
        ));
    }

    if config.backup_script.trim().is_empty() {
        return Err(AdminError::InvalidConfig(
            "backup_script cannot be empty".to_string(),
        ));
    }

    let script = match &config.working_directory {
        Some(dir) => Path::new(dir).join(&config.backup_script),
        None => Path::new(&config.backup_script).to_path_buf(),
    };
    if !script.exists() {
        warn!(
            "Backup script {} does not exist yet. Launches will fail until it does.",
            script.display()
        );
    }

    if let Some(dir) = &config.working_directory {
        if !Path::new(dir).is_dir() {
            return Err(AdminError::InvalidConfig(format!(
                "working_directory is not a directory: {}",
                dir
            )));
        }
    }

    Ok(())
}

fn validate_web_assets(config: &Config) -> Result<()> {
    for (name, dir) in [
        ("template_dir", &config.template_dir),
        ("static_dir", &config.static_dir),
    ] {
        if !Path::new(dir).is_dir() {
            return Err(AdminError::InvalidConfig(format!(
                "{} is not a directory: {}",
                name, dir
            )));
        }
    }

    Ok(())
}

fn validate_secret_key(secret_key: Option<&str>) -> Result<()> {
    match secret_key {
        Some(key) if key.len() < MIN_SECRET_KEY_LEN => Err(AdminError::InvalidConfig(format!(
            "secret_key must be a 256-bit key encoded as base64 or hex (at least {} characters). Generate one with: openssl rand -base64 32",
            MIN_SECRET_KEY_LEN
        ))),
        _ => Ok(()),
    }
}
