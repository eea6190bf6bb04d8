//! Business logic services.
//!
//! - `auth` - Username/password authentication
//! - `recipe_cache` - Bounded cache of computed recipe costings

pub mod auth;
pub mod recipe_cache;

pub use recipe_cache::RecipeCostCache;
