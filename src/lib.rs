//! users-api: REST service for user records on PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::AppError;
pub use model::User;
pub use routes::{common_routes, user_routes};
pub use service::{UserService, UserUpdate};
pub use state::AppState;
pub use store::{ensure_users_table, PgUserStore, UserStore};
