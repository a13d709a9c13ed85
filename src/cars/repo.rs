use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

/// Car record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub size: String,
    pub image: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Rental record linking a user and a car over a booking interval.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserCar {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub rent_started_at: Date,
    pub rent_ended_at: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Car {
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, name, price, size, image, created_at, updated_at
            FROM cars
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(cars)
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM cars"#)
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, name, price, size, image, created_at, updated_at
            FROM cars
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(car)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        price: i64,
        size: &str,
        image: &str,
    ) -> anyhow::Result<Car> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (name, price, size, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING id, name, price, size, image, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(size)
        .bind(image)
        .fetch_one(db)
        .await?;
        Ok(car)
    }

    pub async fn update(
        db: &PgPool,
        id: i32,
        name: &str,
        price: i64,
        size: &str,
        image: &str,
    ) -> anyhow::Result<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET name = $2, price = $3, size = $4, image = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, size, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(size)
        .bind(image)
        .fetch_optional(db)
        .await?;
        Ok(car)
    }

    pub async fn delete(db: &PgPool, id: i32) -> anyhow::Result<bool> {
        let deleted: Option<i32> =
            sqlx::query_scalar(r#"DELETE FROM cars WHERE id = $1 RETURNING id"#)
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(deleted.is_some())
    }
}

impl UserCar {
    /// First rental of the car whose interval overlaps `[start, end]`, if any.
    pub async fn find_overlapping(
        db: &PgPool,
        car_id: i32,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Option<UserCar>> {
        let rental = sqlx::query_as::<_, UserCar>(
            r#"
            SELECT id, user_id, car_id, rent_started_at, rent_ended_at, created_at, updated_at
            FROM user_cars
            WHERE car_id = $1
              AND rent_started_at <= $3
              AND rent_ended_at >= $2
            LIMIT 1
            "#,
        )
        .bind(car_id)
        .bind(start)
        .bind(end)
        .fetch_optional(db)
        .await?;
        Ok(rental)
    }

    pub async fn create(
        db: &PgPool,
        user_id: i32,
        car_id: i32,
        start: Date,
        end: Date,
    ) -> anyhow::Result<UserCar> {
        let rental = sqlx::query_as::<_, UserCar>(
            r#"
            INSERT INTO user_cars (user_id, car_id, rent_started_at, rent_ended_at,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING id, user_id, car_id, rent_started_at, rent_ended_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(car_id)
        .bind(start)
        .bind(end)
        .fetch_one(db)
        .await?;
        Ok(rental)
    }
}
