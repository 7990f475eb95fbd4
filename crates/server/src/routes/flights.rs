use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::{Flight, FlightInput, Record};
use service::{FlightService, ServiceError};

use crate::errors::JsonApiError;
use crate::routes::stored_id;

pub async fn list(State(svc): State<FlightService>) -> Json<Vec<Flight>> {
    Json(svc.list().await)
}

/// Fails with 404 when `userId` names an unknown user and 500 when the user
/// service cannot be reached; no flight is stored in either case.
pub async fn create(
    State(svc): State<FlightService>,
    body: Result<Json<FlightInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Flight>), JsonApiError> {
    let Json(input) = body?;
    let flight = svc.create(&input).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

pub async fn get(
    State(svc): State<FlightService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Flight>, JsonApiError> {
    let Path(id) = id?;
    let Some(id) = stored_id(id) else {
        return Err(ServiceError::not_found(Flight::LABEL).into());
    };
    Ok(Json(svc.get(id).await?))
}

pub async fn update(
    State(svc): State<FlightService>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<FlightInput>, JsonRejection>,
) -> Result<Json<Flight>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    let Some(id) = stored_id(id) else {
        input.validate()?;
        return Err(ServiceError::not_found(Flight::LABEL).into());
    };
    Ok(Json(svc.update(id, &input).await?))
}

/// Always 204 for a well-formed id, whether or not the flight existed.
pub async fn delete(
    State(svc): State<FlightService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Path(id) = id?;
    if let Some(id) = stored_id(id) {
        svc.delete(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
