//! Business logic services
//!
//! Services implement the operations offered to the API layer. They
//! coordinate the stores, the password hasher, the token service, and the
//! authorization guards.

pub mod auth;
pub mod post;
pub mod user;

pub use auth::AuthService;
pub use post::PostService;
pub use user::UserService;
