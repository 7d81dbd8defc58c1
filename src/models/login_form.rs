use rocket::FromForm;

/// Missing fields are read as empty strings so they fail like a wrong password.
#[derive(Debug, FromForm)]
pub struct LoginForm {
    #[field(default = String::new())]
    pub username: String,
    #[field(default = String::new())]
    pub password: String,
}
