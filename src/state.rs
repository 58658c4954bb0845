//! Shared application state for all routes.

use crate::service::UserService;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: Arc<UserService>,
}
