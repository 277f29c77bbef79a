use serde::{Deserialize, Serialize};

/// Authenticated operator session returned by the login endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub token: Option<String>,
}

/// Login form field a rejection belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

impl LoginField {
    pub const fn name(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

/// Credentials refused by the API, attached to the offending field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRejection {
    pub field: LoginField,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(Session),
    Rejected(LoginRejection),
}
