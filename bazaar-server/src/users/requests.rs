use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

pub const USERNAME_MAX_CHARS: usize = 60;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 60;
pub const EMAIL_MAX_CHARS: usize = 60;

// Same shape a browser accepts for <input type="email">.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex should compile")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{0} is not a valid email address")]
    InvalidEmail(&'static str),
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn length(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let chars = value.chars().count();
    if chars < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if chars > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !EMAIL_PATTERN.is_match(value) {
        return Err(ValidationError::InvalidEmail(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub country: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("Username", &self.username)?;
        length("Username", &self.username, 0, USERNAME_MAX_CHARS)?;

        required("Password", &self.password)?;
        length(
            "Password",
            &self.password,
            PASSWORD_MIN_CHARS,
            PASSWORD_MAX_CHARS,
        )?;

        required("Email", &self.email)?;
        email("Email", &self.email)?;
        length("Email", &self.email, 0, EMAIL_MAX_CHARS)?;

        Ok(())
    }
}

/// Credentials are not validated; wrong values are simply bad credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdateAccountRequest {
    pub email: String,
    pub phone: String,
    pub country: String,
}

impl UpdateAccountRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.email.is_empty() {
            email("Email", &self.email)?;
        }
        Ok(())
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UpdatePasswordRequest {
    pub new_password: String,
}

impl UpdatePasswordRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("NewPassword", &self.new_password)?;
        length(
            "NewPassword",
            &self.new_password,
            PASSWORD_MIN_CHARS,
            PASSWORD_MAX_CHARS,
        )
    }
}

impl std::fmt::Debug for UpdatePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePasswordRequest").finish_non_exhaustive()
    }
}
