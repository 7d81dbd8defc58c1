use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

/// Name of the encrypted cookie holding the logged-in username.
pub const SESSION_COOKIE: &str = "admin_session";

/// Request guard for an authenticated administrator.
///
/// Succeeds when the request carries a valid private session cookie and
/// forwards otherwise, so unauthenticated requests fall through to the
/// lower-ranked fallback routes that redirect to the login form.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match request.cookies().get_private(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => Outcome::Success(AdminSession {
                username: cookie.value().to_string(),
            }),
            _ => Outcome::Forward(Status::Unauthorized),
        }
    }
}
