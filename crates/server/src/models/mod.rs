//! Server-side models that are not part of the shared core.

pub mod session;
pub mod user;

pub use session::CurrentUser;
pub use user::User;
