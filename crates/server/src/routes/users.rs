use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::{User, UserInput, Record};
use service::{ServiceError, UserService};

use crate::errors::JsonApiError;
use crate::routes::stored_id;

pub async fn list(State(svc): State<UserService>) -> Json<Vec<User>> {
    Json(svc.list().await)
}

pub async fn create(
    State(svc): State<UserService>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let Json(input) = body?;
    let user = svc.create(&input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    State(svc): State<UserService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, JsonApiError> {
    let Path(id) = id?;
    let Some(id) = stored_id(id) else {
        return Err(ServiceError::not_found(User::LABEL).into());
    };
    Ok(Json(svc.get(id).await?))
}

pub async fn update(
    State(svc): State<UserService>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    let Some(id) = stored_id(id) else {
        input.validate()?;
        return Err(ServiceError::not_found(User::LABEL).into());
    };
    Ok(Json(svc.update(id, &input).await?))
}

/// Always 204 for a well-formed id, whether or not the user existed.
pub async fn delete(
    State(svc): State<UserService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = id?;
    if let Some(id) = stored_id(id) {
        svc.delete(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
