pub mod backup_row;
pub mod config;
pub mod config_validator;
pub mod error;
pub mod login_form;
pub mod session;
pub mod user_row;
