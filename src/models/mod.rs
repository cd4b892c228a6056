//! Data models for the shared grocery list backend.
//!
//! These models define the client JSON contract; request structs are kept
//! separate from the stored entities.

mod item;
mod user;

pub use item::*;
pub use user::*;
