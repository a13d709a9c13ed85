use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(handlers::list_cars).post(handlers::create_car))
        .route(
            "/cars/:id",
            get(handlers::get_car)
                .put(handlers::update_car)
                .delete(handlers::delete_car),
        )
        .route("/cars/:id/rent", post(handlers::rent_car))
}
