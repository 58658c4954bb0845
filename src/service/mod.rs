//! UserService: validation and conflict policy around the store.

mod users;
pub use users::{UserService, UserUpdate};
