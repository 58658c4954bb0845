//! Business rules for user operations: input validation, duplicate-email
//! policy, and translation of store absence into not-found errors. The
//! duplicate check here is an early rejection; the unique index enforced by
//! the store is the authority under concurrent writes.

use crate::error::AppError;
use crate::model::User;
use crate::store::UserStore;
use std::sync::Arc;

/// Partial update. `None` leaves the field unchanged; a provided value must be
/// non-empty. Clearing a field to empty is not supported.
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    /// Page of users ordered by ascending id, plus the total record count.
    /// The two reads are independent; the count may drift from the page under
    /// concurrent writes.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64), AppError> {
        let users = self.store.list(limit, offset).await?;
        let total = self.store.count().await?;
        Ok((users, total))
    }

    pub async fn create(&self, name: &str, email: &str) -> Result<User, AppError> {
        require_non_empty("name", name)?;
        require_non_empty("email", email)?;
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        let user = self.store.insert(name, email).await?;
        tracing::info!(id = user.id, "user created");
        Ok(user)
    }

    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<User, AppError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;

        if let Some(name) = &update.name {
            require_non_empty("name", name)?;
        }
        if let Some(email) = &update.email {
            require_non_empty("email", email)?;
        }
        let name = update.name.as_deref().unwrap_or(&existing.name);
        let email = update.email.as_deref().unwrap_or(&existing.email);

        if email != existing.email {
            if let Some(other) = self.store.find_by_email(email).await? {
                if other.id != id {
                    return Err(AppError::DuplicateEmail);
                }
            }
        }

        // updated_at advances even when both fields resolve to their current
        // values.
        self.store
            .update(id, name, email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("user {}", id)));
        }
        // The row can vanish between the check and the delete.
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("user {}", id)));
        }
        tracing::info!(id, "user deleted");
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
