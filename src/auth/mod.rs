pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use rate_limit::{InMemoryRateLimiter, RateLimiter};
pub use utils::{client_key, extract_claims_from_context};
