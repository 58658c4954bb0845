//! User CRUD handlers. Pagination defaults and clamping live here; the
//! service takes limit/offset as given.

use crate::error::AppError;
use crate::response::{ListMeta, SuccessMany, SuccessOne};
use crate::service::UserUpdate;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

#[derive(Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateUserBody {
    name: String,
    email: String,
}

#[derive(Deserialize)]
pub struct UpdateUserBody {
    name: Option<String>,
    email: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let (users, total) = state.users.list(limit, offset).await?;
    Ok((
        StatusCode::OK,
        Json(SuccessMany {
            data: users,
            meta: ListMeta {
                total,
                limit,
                offset,
            },
        }),
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.create(&body.name, &body.email).await?;
    Ok((StatusCode::CREATED, Json(SuccessOne { data: user })))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users.get(parse_id(&id_str)?).await?;
    Ok((StatusCode::OK, Json(SuccessOne { data: user })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<UpdateUserBody>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .update(
            parse_id(&id_str)?,
            UserUpdate {
                name: body.name,
                email: body.email,
            },
        )
        .await?;
    Ok((StatusCode::OK, Json(SuccessOne { data: user })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.users.delete(parse_id(&id_str)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
