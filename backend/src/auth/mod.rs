//! Authentication and authorization
//!
//! JWT identity tokens, bcrypt password hashing, the bearer-token extractor,
//! and the ownership guards that gate mutations.

mod guard;
mod jwt;
mod middleware;
mod password;
mod policy;

pub use guard::{Guard, GuardChain};
pub use jwt::{Claims, JwtService, TokenSubject};
pub use middleware::{auth_middleware, AuthUser};
pub use password::PasswordService;
pub use policy::AuthorizationPolicy;
