// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Persistence of cars.

use crate::model::{Car, Engine};
#[cfg(feature = "postgres")]
use fleet_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use fleet_core::db::sqlite;
use fleet_core::db::{DbError, DbResult, Executor, ensure_one_insert, ensure_one_update};
use futures::TryStreamExt;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use uuid::Uuid;

/// Columns to fetch when reading a car together with the specifications of its engine.
const JOINED_COLUMNS: &str =
    "cars.*, engines.displacement, engines.no_of_cylinders, engines.car_range";

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Car {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let registration_number: String =
            row.try_get("registration_number").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let year: String = row.try_get("year").map_err(postgres::map_sqlx_error)?;
        let brand: String = row.try_get("brand").map_err(postgres::map_sqlx_error)?;
        let fuel_type: String = row.try_get("fuel_type").map_err(postgres::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(postgres::map_sqlx_error)?;
        let engine_id: Uuid = row.try_get("engine_id").map_err(postgres::map_sqlx_error)?;
        let price: f64 = row.try_get("price").map_err(postgres::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(postgres::map_sqlx_error)?;
        let updated_by: String = row.try_get("updated_by").map_err(postgres::map_sqlx_error)?;
        let deleted_at = row.try_get("deleted_at").map_err(postgres::map_sqlx_error)?;
        let created_at = row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at = row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Car {
            id,
            registration_number,
            name,
            year,
            brand,
            fuel_type: FromStr::from_str(&fuel_type)?,
            status: FromStr::from_str(&status)?,
            engine: Engine::with_id(engine_id),
            price,
            created_by,
            updated_by,
            deleted_at,
            created_at,
            updated_at,
        })
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Car {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let registration_number: String =
            row.try_get("registration_number").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let year: String = row.try_get("year").map_err(sqlite::map_sqlx_error)?;
        let brand: String = row.try_get("brand").map_err(sqlite::map_sqlx_error)?;
        let fuel_type: String = row.try_get("fuel_type").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;
        let engine_id: Uuid = row.try_get("engine_id").map_err(sqlite::map_sqlx_error)?;
        let price: f64 = row.try_get("price").map_err(sqlite::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(sqlite::map_sqlx_error)?;
        let updated_by: String = row.try_get("updated_by").map_err(sqlite::map_sqlx_error)?;
        let deleted_at_sec: Option<i64> =
            row.try_get("deleted_at_sec").map_err(sqlite::map_sqlx_error)?;
        let deleted_at_nsec: Option<i64> =
            row.try_get("deleted_at_nsec").map_err(sqlite::map_sqlx_error)?;
        let created_at_sec: i64 = row.try_get("created_at_sec").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsec: i64 =
            row.try_get("created_at_nsec").map_err(sqlite::map_sqlx_error)?;
        let updated_at_sec: i64 = row.try_get("updated_at_sec").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsec: i64 =
            row.try_get("updated_at_nsec").map_err(sqlite::map_sqlx_error)?;

        Ok(Car {
            id,
            registration_number,
            name,
            year,
            brand,
            fuel_type: FromStr::from_str(&fuel_type)?,
            status: FromStr::from_str(&status)?,
            engine: Engine::with_id(engine_id),
            price,
            created_by,
            updated_by,
            deleted_at: sqlite::build_optional_timestamp(deleted_at_sec, deleted_at_nsec)?,
            created_at: sqlite::build_timestamp(created_at_sec, created_at_nsec)?,
            updated_at: sqlite::build_timestamp(updated_at_sec, updated_at_nsec)?,
        })
    }
}

/// A car read together with the specifications of its engine.
struct CarWithEngine(Car);

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for CarWithEngine {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let displacement: i64 = row.try_get("displacement").map_err(postgres::map_sqlx_error)?;
        let no_of_cylinders: i64 =
            row.try_get("no_of_cylinders").map_err(postgres::map_sqlx_error)?;
        let car_range: i64 = row.try_get("car_range").map_err(postgres::map_sqlx_error)?;

        let mut car = Car::try_from(row)?;
        car.engine.displacement = displacement;
        car.engine.no_of_cylinders = no_of_cylinders;
        car.engine.car_range = car_range;
        Ok(CarWithEngine(car))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for CarWithEngine {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let displacement: i64 = row.try_get("displacement").map_err(sqlite::map_sqlx_error)?;
        let no_of_cylinders: i64 =
            row.try_get("no_of_cylinders").map_err(sqlite::map_sqlx_error)?;
        let car_range: i64 = row.try_get("car_range").map_err(sqlite::map_sqlx_error)?;

        let mut car = Car::try_from(row)?;
        car.engine.displacement = displacement;
        car.engine.no_of_cylinders = no_of_cylinders;
        car.engine.car_range = car_range;
        Ok(CarWithEngine(car))
    }
}

/// Stores a new `car`.  Only the identifier of its engine is persisted.
pub(crate) async fn create_car(ex: &mut Executor, car: &Car) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO cars (
                    id, registration_number, name, year, brand, fuel_type, status, engine_id,
                    price, created_by, updated_by, deleted_at, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ";
            sqlx::query(query_str)
                .bind(car.id)
                .bind(&car.registration_number)
                .bind(&car.name)
                .bind(&car.year)
                .bind(&car.brand)
                .bind(car.fuel_type.to_string())
                .bind(car.status.to_string())
                .bind(car.engine.engine_id)
                .bind(car.price)
                .bind(&car.created_by)
                .bind(&car.updated_by)
                .bind(car.deleted_at)
                .bind(car.created_at)
                .bind(car.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (deleted_at_sec, deleted_at_nsec) =
                sqlite::unpack_optional_timestamp(car.deleted_at);
            let (created_at_sec, created_at_nsec) = sqlite::unpack_timestamp(car.created_at);
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(car.updated_at);

            let query_str = "
                INSERT INTO cars (
                    id, registration_number, name, year, brand, fuel_type, status, engine_id,
                    price, created_by, updated_by,
                    deleted_at_sec, deleted_at_nsec,
                    created_at_sec, created_at_nsec,
                    updated_at_sec, updated_at_nsec
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(car.id)
                .bind(&car.registration_number)
                .bind(&car.name)
                .bind(&car.year)
                .bind(&car.brand)
                .bind(car.fuel_type.to_string())
                .bind(car.status.to_string())
                .bind(car.engine.engine_id)
                .bind(car.price)
                .bind(&car.created_by)
                .bind(&car.updated_by)
                .bind(deleted_at_sec)
                .bind(deleted_at_nsec)
                .bind(created_at_sec)
                .bind(created_at_nsec)
                .bind(updated_at_sec)
                .bind(updated_at_nsec)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_insert(rows_affected)
}

/// Gets the car identified by `id` together with its engine, or `None` if it does not exist.
pub(crate) async fn get_car(ex: &mut Executor, id: Uuid) -> DbResult<Option<Car>> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "SELECT {} FROM cars JOIN engines ON cars.engine_id = engines.id
                WHERE cars.id = $1",
                JOINED_COLUMNS
            );
            let row = sqlx::query(&query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(CarWithEngine::try_from).transpose()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "SELECT {} FROM cars JOIN engines ON cars.engine_id = engines.id
                WHERE cars.id = ?",
                JOINED_COLUMNS
            );
            let row = sqlx::query(&query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(CarWithEngine::try_from).transpose()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(row.map(|c| c.0))
}

/// Builds the query to list cars, optionally joining their engines.
///
/// The query expects the brand filter twice: once to check if it is null and once to compare it.
fn list_cars_query(with_engine: bool, first: &str, second: &str) -> String {
    let (columns, join) = if with_engine {
        (JOINED_COLUMNS, "JOIN engines ON cars.engine_id = engines.id")
    } else {
        ("cars.*", "")
    };
    format!(
        "SELECT {} FROM cars {}
        WHERE ({} IS NULL OR cars.brand = {})
        ORDER BY cars.registration_number",
        columns, join, first, second
    )
}

/// Gets all cars, restricted to those of `brand` if given.
///
/// The engine of each car is only populated beyond its identifier if `with_engine` is true.
pub(crate) async fn list_cars(
    ex: &mut Executor,
    brand: Option<&str>,
    with_engine: bool,
) -> DbResult<Vec<Car>> {
    let mut cars = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = list_cars_query(with_engine, "$1::TEXT", "$1");
            let mut rows = sqlx::query(&query_str).bind(brand).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                if with_engine {
                    cars.push(CarWithEngine::try_from(row)?.0);
                } else {
                    cars.push(Car::try_from(row)?);
                }
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = list_cars_query(with_engine, "?", "?");
            let mut rows = sqlx::query(&query_str).bind(brand).bind(brand).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                if with_engine {
                    cars.push(CarWithEngine::try_from(row)?.0);
                } else {
                    cars.push(Car::try_from(row)?);
                }
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(cars)
}

/// Replaces the mutable fields of an existing `car`.  The creation details are left untouched.
pub(crate) async fn update_car(ex: &mut Executor, car: &Car) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE cars
                SET
                    registration_number = $2, name = $3, year = $4, brand = $5, fuel_type = $6,
                    status = $7, engine_id = $8, price = $9, updated_by = $10, updated_at = $11
                WHERE id = $1
            ";
            sqlx::query(query_str)
                .bind(car.id)
                .bind(&car.registration_number)
                .bind(&car.name)
                .bind(&car.year)
                .bind(&car.brand)
                .bind(car.fuel_type.to_string())
                .bind(car.status.to_string())
                .bind(car.engine.engine_id)
                .bind(car.price)
                .bind(&car.updated_by)
                .bind(car.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(car.updated_at);

            let query_str = "
                UPDATE cars
                SET
                    registration_number = ?, name = ?, year = ?, brand = ?, fuel_type = ?,
                    status = ?, engine_id = ?, price = ?, updated_by = ?,
                    updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ?
            ";
            sqlx::query(query_str)
                .bind(&car.registration_number)
                .bind(&car.name)
                .bind(&car.year)
                .bind(&car.brand)
                .bind(car.fuel_type.to_string())
                .bind(car.status.to_string())
                .bind(car.engine.engine_id)
                .bind(car.price)
                .bind(&car.updated_by)
                .bind(updated_at_sec)
                .bind(updated_at_nsec)
                .bind(car.id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_update(rows_affected)
}

/// Deletes the car identified by `id`.  Fails if any trip still references it.
pub(crate) async fn delete_car(ex: &mut Executor, id: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM cars WHERE id = $1";
            sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM cars WHERE id = ?";
            sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_update(rows_affected)
}
