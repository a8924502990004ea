pub mod password;
pub mod token;

pub use password::{PasswordDigest, PasswordHasher};
pub use token::{ACCESS_TOKEN_TTL_SECS, AccessClaims, TokenError, TokenService};
