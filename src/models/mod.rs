//! Data models for the blog backend.
//!
//! Field names follow the JSON contract consumed by the mobile app (snake_case, `_id`).

mod blog;
mod pagination;
mod upload;
mod user;

pub use blog::*;
pub use pagination::*;
pub use upload::*;
pub use user::*;
