pub mod auth;
pub mod launcher;
pub mod progress;
