//! Standard response envelope helpers.

use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

/// Pagination metadata. `total` is the full record count, not the page size.
#[derive(Serialize)]
pub struct ListMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
