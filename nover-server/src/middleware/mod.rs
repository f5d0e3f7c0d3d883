pub mod auth;

pub use auth::{AuthUser, identify, require_auth};
