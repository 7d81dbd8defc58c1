#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    /// PHC-format Argon2id hash.
    pub password_hash: String,
}
