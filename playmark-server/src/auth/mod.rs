//! Bearer-token authentication for the progress endpoints.

pub mod claims;
pub mod middleware;

pub use claims::{Claims, JwtKeys, TokenError};
pub use middleware::{AuthenticatedUser, auth_middleware};
