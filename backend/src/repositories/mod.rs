//! Record stores
//!
//! Each store exclusively owns its collection. The traits are the seam for
//! swapping in a persistent backend; the in-memory implementations keep data
//! for the lifetime of the process only.

pub mod post;
pub mod user;

pub use post::{InMemoryPostStore, PostRecord, PostStore};
pub use user::{InMemoryUserStore, ProfileFields, UserRecord, UserStore};
