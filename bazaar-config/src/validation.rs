use crate::models::AuthConfig;

/// Shortest HS256 secret accepted without a warning.
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn check_token_secret(auth: &AuthConfig, warnings: &mut ConfigWarnings) {
    let len = auth.token_secret.len();
    if len < MIN_TOKEN_SECRET_BYTES {
        warnings.push_with_hint(
            format!(
                "AUTH_TOKEN_SECRET is only {len} bytes; tokens signed with it are easy to forge"
            ),
            format!("Use at least {MIN_TOKEN_SECRET_BYTES} random bytes"),
        );
    }
}
