use md5::{Digest, Md5};
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Operator sign-in form.
pub struct LoginForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Informe um email"),
        email(message = "Informe um email válido")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Informe a senha"))]
    pub password: String,
}

impl LoginForm {
    /// Lower-case hex MD5 of the password, the only form the API accepts.
    pub fn password_md5(&self) -> String {
        format!("{:x}", Md5::digest(self.password.as_bytes()))
    }
}
