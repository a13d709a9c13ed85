use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    cars::{
        dto::{CarListResponse, CarRequest, RentCarRequest},
        repo::{Car, UserCar},
    },
    error::ApiError,
    pagination::{PageMeta, PageQuery},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_cars(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<CarListResponse>, ApiError> {
    let cars = Car::list(&state.db, page.limit(), page.offset()).await?;
    let count = Car::count(&state.db).await?;
    Ok(Json(CarListResponse {
        cars,
        meta: PageMeta::build(&page, count),
    }))
}

#[instrument(skip(state))]
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Car>, ApiError> {
    let car = Car::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::RecordNotFound("Car"))?;
    Ok(Json(car))
}

#[instrument(skip(state, payload))]
pub async fn create_car(
    State(state): State<AppState>,
    Json(payload): Json<CarRequest>,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    payload.validate()?;
    let car = Car::create(
        &state.db,
        &payload.name,
        payload.price,
        &payload.size,
        &payload.image,
    )
    .await?;
    info!(car_id = car.id, name = %car.name, "car created");
    Ok((StatusCode::CREATED, Json(car)))
}

#[instrument(skip(state, payload))]
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CarRequest>,
) -> Result<Json<Car>, ApiError> {
    payload.validate()?;
    let car = Car::update(
        &state.db,
        id,
        &payload.name,
        payload.price,
        &payload.size,
        &payload.image,
    )
    .await?
    .ok_or(ApiError::RecordNotFound("Car"))?;
    info!(car_id = car.id, "car updated");
    Ok(Json(car))
}

#[instrument(skip(state))]
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !Car::delete(&state.db, id).await? {
        return Err(ApiError::RecordNotFound("Car"));
    }
    info!(car_id = id, "car deleted");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, payload))]
pub async fn rent_car(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<RentCarRequest>,
) -> Result<Json<UserCar>, ApiError> {
    payload.validate()?;

    let car = Car::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::RecordNotFound("Car"))?;

    // Overlap check and insert are two statements; a concurrent rental can
    // still slip between them.
    if UserCar::find_overlapping(
        &state.db,
        car.id,
        payload.rent_started_at,
        payload.rent_ended_at,
    )
    .await?
    .is_some()
    {
        warn!(car_id = car.id, user_id = claims.sub, "car already rented");
        return Err(ApiError::CarAlreadyRented);
    }

    let rental = UserCar::create(
        &state.db,
        claims.sub,
        car.id,
        payload.rent_started_at,
        payload.rent_ended_at,
    )
    .await?;
    info!(car_id = car.id, user_id = claims.sub, rental_id = rental.id, "car rented");
    Ok(Json(rental))
}
