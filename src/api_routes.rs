use crate::api_state::AppState;
use crate::models::error::Result;
use crate::service::progress::DEFAULT_PROGRESS;
use rocket::http::ContentType;
use rocket::State;

/// GET /?act=progress - Raw progress reported by the backup job (no login required)
#[get("/?act=progress", rank = 3)]
pub fn progress(state: &State<AppState>) -> Result<(ContentType, Vec<u8>)> {
    let progress = state.progress.read_progress()?;
    Ok((
        ContentType::Plain,
        progress.unwrap_or_else(|| DEFAULT_PROGRESS.to_vec()),
    ))
}
