mod api_routes;
mod api_state;
mod models;
mod repo;
mod service;
mod web_routes;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use models::config::{setup_config, Config};
use repo::sqlite::{open_db_pool, setup_database};
use service::auth::seed_default_user;

#[macro_use]
extern crate rocket;

use api_state::AppState;
use rocket::fs::FileServer;
use rocket_dyn_templates::Template;

fn build_rocket(config: &Config, state: AppState) -> rocket::Rocket<rocket::Build> {
    let mut figment = rocket::Config::figment()
        .merge(("address", config.address.as_str()))
        .merge(("port", config.port))
        .merge(("template_dir", config.template_dir.as_str()));

    if let Some(secret_key) = &config.secret_key {
        figment = figment.merge(("secret_key", secret_key.as_str()));
    }

    rocket::custom(figment)
        .manage(state)
        .attach(Template::fairing())
        .mount("/static", FileServer::from(&config.static_dir))
        .mount(
            "/",
            routes![
                web_routes::login_form,
                web_routes::login,
                web_routes::logout,
                api_routes::progress,
                web_routes::run_backup,
                web_routes::run_backup_link,
                web_routes::backups,
                web_routes::delete_backup,
                web_routes::dashboard,
                web_routes::post_fallback,
            ],
        )
}

#[rocket::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(parse_log_level(&args.log_level))
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    info!("Backup admin panel starting...");

    // Strip any surrounding quotes from config file path
    let config_file_path = args
        .config_file
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    let config = setup_config(config_file_path).context("Failed to load configuration")?;

    if args.validate_only {
        info!("Configuration is valid. Exiting (--validate-only mode).");
        return Ok(());
    }

    let db = open_db_pool(&config.database_file)
        .context("Failed to initialize database connection pool")?;
    setup_database(&db).context("Failed to set up database schema")?;
    seed_default_user(&db, &config.admin_username, &config.admin_password)
        .context("Failed to create the administrator account")?;

    let state = AppState::from_config(db, &config);
    build_rocket(&config, state).launch().await?;

    Ok(())
}

#[derive(Parser)]
#[command(name = "backup-admin")]
#[command(about = "Web panel to launch backups and review backup history", long_about = None)]
struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        default_value = "config.json",
        env = "BACKUP_ADMIN_CONFIG"
    )]
    config_file: String,

    #[arg(
        short = 'l',
        long = "log-level",
        default_value = "info",
        env = "LOG_LEVEL"
    )]
    log_level: String,

    #[arg(short = 'v', long = "validate-only")]
    validate_only: bool,
}

fn parse_log_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
