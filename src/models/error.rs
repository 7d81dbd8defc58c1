use log::error;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Failed to read config file '{path}': {cause}")]
    ConfigRead { path: PathBuf, cause: io::Error },

    #[error("Failed to parse config file '{path}': {cause}")]
    ConfigParse {
        path: PathBuf,
        cause: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create database connection pool for '{path}': {cause}")]
    DatabasePool { path: String, cause: r2d2::Error },

    #[error("Failed to get database connection from pool: {0}")]
    DatabaseConnection(#[from] r2d2::Error),

    #[error("Database query failed for '{operation}': {cause}")]
    DatabaseQuery {
        operation: String,
        cause: rusqlite::Error,
    },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Failed to read progress file '{path}': {cause}")]
    ProgressRead { path: PathBuf, cause: io::Error },

    #[error("Failed to launch '{program}': {cause}")]
    JobLaunch { program: String, cause: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;

/// Any error reaching a route becomes a plain 500; details only go to the log.
impl<'r, 'o: 'r> Responder<'r, 'o> for AdminError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'o> {
        error!("{} {} failed: {}", request.method(), request.uri(), self);
        Err(Status::InternalServerError)
    }
}
