use crate::api_state::AppState;
use crate::models::error::Result;
use crate::models::login_form::LoginForm;
use crate::models::session::{AdminSession, SESSION_COOKIE};
use crate::repo::sqlite;
use crate::service::auth;
use log::{debug, info, warn};
use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::{Either, State};
use rocket_dyn_templates::{context, Template};

// Every page lives on "/" and is selected by the `act` query parameter.
// Routes that need a session forward without one; the rank 20 fallbacks
// then send the browser to the login form.

const DASHBOARD_URI: &str = "/";
const LOGIN_URI: &str = "/?act=login";
const BACKUPS_URI: &str = "/?act=backups";

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

fn login_page(error: Option<&str>) -> Template {
    Template::render(
        "login",
        context! {
            title: "Admin Login",
            error,
        },
    )
}

/// GET /?act=login - Login form
#[get("/?act=login", rank = 1)]
pub fn login_form() -> Template {
    login_page(None)
}

/// POST /?act=login - Check credentials and open a session
#[post("/?act=login", data = "<form>", rank = 1)]
pub fn login(
    form: Form<LoginForm>,
    cookies: &CookieJar<'_>,
    state: &State<AppState>,
) -> Result<Either<Redirect, Template>> {
    let username = form.username.trim();

    match auth::authenticate(&state.db, username, &form.password)? {
        Some(user) => {
            info!("User {} (id {}) logged in", user.username, user.id);
            cookies.add_private((SESSION_COOKIE, user.username));
            Ok(Either::Left(Redirect::to(DASHBOARD_URI)))
        }
        None => {
            warn!("Failed login attempt for user '{}'", username);
            Ok(Either::Right(login_page(Some(INVALID_CREDENTIALS))))
        }
    }
}

/// GET /?act=logout - Close the session
#[get("/?act=logout", rank = 2)]
pub fn logout(session: AdminSession, cookies: &CookieJar<'_>) -> Redirect {
    cookies.remove_private(SESSION_COOKIE);
    info!("User {} logged out", session.username);
    Redirect::to(DASHBOARD_URI)
}

/// The handle is only logged. A failed launch still lands on the dashboard.
fn start_backup_job(session: &AdminSession, state: &AppState) -> Redirect {
    match state.launcher.launch() {
        Ok(job) => info!(
            "User {} started backup job {} at {} (pid {:?})",
            session.username, job.id, job.started_at, job.pid
        ),
        Err(e) => warn!(
            "Backup requested by {} could not be started: {}",
            session.username, e
        ),
    }
    Redirect::to(DASHBOARD_URI)
}

/// POST /?act=run_backup - Start the backup script in the background
#[post("/?act=run_backup", rank = 4)]
pub fn run_backup(session: AdminSession, state: &State<AppState>) -> Redirect {
    start_backup_job(&session, state)
}

/// GET /?act=run_backup - Same as the form button, for plain links
#[get("/?act=run_backup", rank = 4)]
pub fn run_backup_link(session: AdminSession, state: &State<AppState>) -> Redirect {
    start_backup_job(&session, state)
}

/// GET /?act=backups - Backup history, newest first
#[get("/?act=backups", rank = 5)]
pub fn backups(session: AdminSession, state: &State<AppState>) -> Result<Template> {
    let backups = sqlite::select_backups(&state.db)?;

    Ok(Template::render(
        "backups",
        context! {
            title: "Backup History",
            username: session.username,
            backups,
        },
    ))
}

/// Reads the leading integer of `raw` the way a lenient form parser would:
/// "5abc" is 5, and anything without leading digits is 0. Out of range
/// values saturate.
fn leading_record_id(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    let raw = raw.trim_start();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    match (&rest[..end], rest[..end].parse::<i64>()) {
        ("", _) => 0,
        (_, Ok(id)) if negative => -id,
        (_, Ok(id)) => id,
        (_, Err(_)) if negative => i64::MIN,
        (_, Err(_)) => i64::MAX,
    }
}

/// GET /?act=delete_backup&id=<id> - Delete one backup record
#[get("/?act=delete_backup&<id>", rank = 6)]
pub fn delete_backup(
    id: Option<&str>,
    session: AdminSession,
    state: &State<AppState>,
) -> Result<Redirect> {
    let id = leading_record_id(id);
    let deleted = sqlite::delete_backup(&state.db, id)?;
    info!(
        "User {} deleted backup record {} ({} row(s) removed)",
        session.username, id, deleted
    );
    Ok(Redirect::to(BACKUPS_URI))
}

/// GET / - Dashboard, or the fallback for anything not matched above
#[get("/?<act>", rank = 20)]
pub fn dashboard(act: Option<&str>, session: Option<AdminSession>) -> Either<Template, Redirect> {
    let Some(session) = session else {
        return Either::Right(Redirect::to(LOGIN_URI));
    };

    match act {
        None | Some("") => Either::Left(Template::render(
            "dashboard",
            context! {
                title: "Dashboard",
                username: session.username,
            },
        )),
        Some(unknown) => {
            debug!("Unknown action '{}', redirecting to dashboard", unknown);
            Either::Right(Redirect::to(DASHBOARD_URI))
        }
    }
}

/// POST fallback for unknown actions and missing sessions
#[post("/", rank = 20)]
pub fn post_fallback(session: Option<AdminSession>) -> Redirect {
    match session {
        Some(_) => Redirect::to(DASHBOARD_URI),
        None => Redirect::to(LOGIN_URI),
    }
}
