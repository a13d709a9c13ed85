use serde::{Deserialize, Serialize};
use time::Date;

use crate::cars::repo::Car;
use crate::error::ApiError;
use crate::pagination::PageMeta;

/// Request body for creating or updating a car. All fields are required.
#[derive(Debug, Deserialize)]
pub struct CarRequest {
    pub name: String,
    pub price: i64,
    pub size: String,
    pub image: String,
}

impl CarRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("name is required".into()));
        }
        if self.price < 0 {
            return Err(ApiError::Validation("price must be non-negative".into()));
        }
        if self.size.trim().is_empty() {
            return Err(ApiError::Validation("size is required".into()));
        }
        if self.image.trim().is_empty() {
            return Err(ApiError::Validation("image is required".into()));
        }
        Ok(())
    }
}

/// Request body for renting a car; dates are ISO `yyyy-mm-dd`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentCarRequest {
    pub rent_started_at: Date,
    pub rent_ended_at: Date,
}

impl RentCarRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.rent_ended_at < self.rent_started_at {
            return Err(ApiError::Validation(
                "rentEndedAt must not be before rentStartedAt".into(),
            ));
        }
        Ok(())
    }
}

/// Response for the car listing: one page of cars plus page metadata.
#[derive(Debug, Serialize)]
pub struct CarListResponse {
    pub cars: Vec<Car>,
    pub meta: PageMeta,
}
