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

//! Persistence of trips.

use crate::model::Trip;
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
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Trip {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let driver_id: Uuid = row.try_get("driver_id").map_err(postgres::map_sqlx_error)?;
        let car_id: Uuid = row.try_get("car_id").map_err(postgres::map_sqlx_error)?;
        let start_location: String =
            row.try_get("start_location").map_err(postgres::map_sqlx_error)?;
        let end_location: String =
            row.try_get("end_location").map_err(postgres::map_sqlx_error)?;
        let start_time = row.try_get("start_time").map_err(postgres::map_sqlx_error)?;
        let end_time = row.try_get("end_time").map_err(postgres::map_sqlx_error)?;
        let distance_km: f64 = row.try_get("distance_km").map_err(postgres::map_sqlx_error)?;
        let fuel_consumed_liters: f64 =
            row.try_get("fuel_consumed_liters").map_err(postgres::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(postgres::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(postgres::map_sqlx_error)?;
        let updated_by: String = row.try_get("updated_by").map_err(postgres::map_sqlx_error)?;
        let created_at = row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at = row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        Ok(Trip {
            id,
            description,
            driver_id,
            car_id,
            start_location,
            end_location,
            start_time,
            end_time,
            distance_km,
            fuel_consumed_liters,
            status,
            created_by,
            updated_by,
            created_at,
            updated_at,
        })
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Trip {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let driver_id: Uuid = row.try_get("driver_id").map_err(sqlite::map_sqlx_error)?;
        let car_id: Uuid = row.try_get("car_id").map_err(sqlite::map_sqlx_error)?;
        let start_location: String =
            row.try_get("start_location").map_err(sqlite::map_sqlx_error)?;
        let end_location: String = row.try_get("end_location").map_err(sqlite::map_sqlx_error)?;
        let start_time_sec: i64 = row.try_get("start_time_sec").map_err(sqlite::map_sqlx_error)?;
        let start_time_nsec: i64 =
            row.try_get("start_time_nsec").map_err(sqlite::map_sqlx_error)?;
        let end_time_sec: Option<i64> =
            row.try_get("end_time_sec").map_err(sqlite::map_sqlx_error)?;
        let end_time_nsec: Option<i64> =
            row.try_get("end_time_nsec").map_err(sqlite::map_sqlx_error)?;
        let distance_km: f64 = row.try_get("distance_km").map_err(sqlite::map_sqlx_error)?;
        let fuel_consumed_liters: f64 =
            row.try_get("fuel_consumed_liters").map_err(sqlite::map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(sqlite::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(sqlite::map_sqlx_error)?;
        let updated_by: String = row.try_get("updated_by").map_err(sqlite::map_sqlx_error)?;
        let created_at_sec: i64 = row.try_get("created_at_sec").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsec: i64 =
            row.try_get("created_at_nsec").map_err(sqlite::map_sqlx_error)?;
        let updated_at_sec: i64 = row.try_get("updated_at_sec").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsec: i64 =
            row.try_get("updated_at_nsec").map_err(sqlite::map_sqlx_error)?;

        Ok(Trip {
            id,
            description,
            driver_id,
            car_id,
            start_location,
            end_location,
            start_time: sqlite::build_timestamp(start_time_sec, start_time_nsec)?,
            end_time: sqlite::build_optional_timestamp(end_time_sec, end_time_nsec)?,
            distance_km,
            fuel_consumed_liters,
            status,
            created_by,
            updated_by,
            created_at: sqlite::build_timestamp(created_at_sec, created_at_nsec)?,
            updated_at: sqlite::build_timestamp(updated_at_sec, updated_at_nsec)?,
        })
    }
}

/// Stores a new `trip`.
pub(crate) async fn create_trip(ex: &mut Executor, trip: &Trip) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO trips (
                    id, description, driver_id, car_id, start_location, end_location,
                    start_time, end_time, distance_km, fuel_consumed_liters, status,
                    created_by, updated_by, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ";
            sqlx::query(query_str)
                .bind(trip.id)
                .bind(&trip.description)
                .bind(trip.driver_id)
                .bind(trip.car_id)
                .bind(&trip.start_location)
                .bind(&trip.end_location)
                .bind(trip.start_time)
                .bind(trip.end_time)
                .bind(trip.distance_km)
                .bind(trip.fuel_consumed_liters)
                .bind(&trip.status)
                .bind(&trip.created_by)
                .bind(&trip.updated_by)
                .bind(trip.created_at)
                .bind(trip.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (start_time_sec, start_time_nsec) = sqlite::unpack_timestamp(trip.start_time);
            let (end_time_sec, end_time_nsec) = sqlite::unpack_optional_timestamp(trip.end_time);
            let (created_at_sec, created_at_nsec) = sqlite::unpack_timestamp(trip.created_at);
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(trip.updated_at);

            let query_str = "
                INSERT INTO trips (
                    id, description, driver_id, car_id, start_location, end_location,
                    start_time_sec, start_time_nsec,
                    end_time_sec, end_time_nsec,
                    distance_km, fuel_consumed_liters, status, created_by, updated_by,
                    created_at_sec, created_at_nsec,
                    updated_at_sec, updated_at_nsec
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(trip.id)
                .bind(&trip.description)
                .bind(trip.driver_id)
                .bind(trip.car_id)
                .bind(&trip.start_location)
                .bind(&trip.end_location)
                .bind(start_time_sec)
                .bind(start_time_nsec)
                .bind(end_time_sec)
                .bind(end_time_nsec)
                .bind(trip.distance_km)
                .bind(trip.fuel_consumed_liters)
                .bind(&trip.status)
                .bind(&trip.created_by)
                .bind(&trip.updated_by)
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

/// Gets the trip identified by `id`, or `None` if it does not exist.
pub(crate) async fn get_trip(ex: &mut Executor, id: Uuid) -> DbResult<Option<Trip>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM trips WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Trip::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM trips WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Trip::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the trips whose column matches the id given in `filter`, or all trips if there is no
/// filter.
async fn query_trips(ex: &mut Executor, filter: Option<(&str, Uuid)>) -> DbResult<Vec<Trip>> {
    let mut trips = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = match filter {
                Some((column, _)) => {
                    format!("SELECT * FROM trips WHERE {} = $1 ORDER BY start_time", column)
                }
                None => "SELECT * FROM trips ORDER BY start_time".to_owned(),
            };
            let mut query = sqlx::query(&query_str);
            if let Some((_, id)) = filter {
                query = query.bind(id);
            }
            let mut rows = query.fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                trips.push(Trip::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = match filter {
                Some((column, _)) => format!(
                    "SELECT * FROM trips WHERE {} = ? ORDER BY start_time_sec, start_time_nsec",
                    column
                ),
                None => "SELECT * FROM trips ORDER BY start_time_sec, start_time_nsec".to_owned(),
            };
            let mut query = sqlx::query(&query_str);
            if let Some((_, id)) = filter {
                query = query.bind(id);
            }
            let mut rows = query.fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                trips.push(Trip::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(trips)
}

/// Gets all trips, sorted by start time.
pub(crate) async fn list_trips(ex: &mut Executor) -> DbResult<Vec<Trip>> {
    query_trips(ex, None).await
}

/// Gets the trips done with the car identified by `car_id`, sorted by start time.
pub(crate) async fn list_trips_by_car(ex: &mut Executor, car_id: Uuid) -> DbResult<Vec<Trip>> {
    query_trips(ex, Some(("car_id", car_id))).await
}

/// Gets the trips done by the driver identified by `driver_id`, sorted by start time.
pub(crate) async fn list_trips_by_driver(
    ex: &mut Executor,
    driver_id: Uuid,
) -> DbResult<Vec<Trip>> {
    query_trips(ex, Some(("driver_id", driver_id))).await
}

/// Replaces the mutable fields of an existing `trip`.  The creation details are left untouched.
pub(crate) async fn update_trip(ex: &mut Executor, trip: &Trip) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE trips
                SET
                    description = $2, driver_id = $3, car_id = $4, start_location = $5,
                    end_location = $6, start_time = $7, end_time = $8, distance_km = $9,
                    fuel_consumed_liters = $10, status = $11, updated_by = $12, updated_at = $13
                WHERE id = $1
            ";
            sqlx::query(query_str)
                .bind(trip.id)
                .bind(&trip.description)
                .bind(trip.driver_id)
                .bind(trip.car_id)
                .bind(&trip.start_location)
                .bind(&trip.end_location)
                .bind(trip.start_time)
                .bind(trip.end_time)
                .bind(trip.distance_km)
                .bind(trip.fuel_consumed_liters)
                .bind(&trip.status)
                .bind(&trip.updated_by)
                .bind(trip.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (start_time_sec, start_time_nsec) = sqlite::unpack_timestamp(trip.start_time);
            let (end_time_sec, end_time_nsec) = sqlite::unpack_optional_timestamp(trip.end_time);
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(trip.updated_at);

            let query_str = "
                UPDATE trips
                SET
                    description = ?, driver_id = ?, car_id = ?, start_location = ?,
                    end_location = ?, start_time_sec = ?, start_time_nsec = ?,
                    end_time_sec = ?, end_time_nsec = ?, distance_km = ?,
                    fuel_consumed_liters = ?, status = ?, updated_by = ?,
                    updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ?
            ";
            sqlx::query(query_str)
                .bind(&trip.description)
                .bind(trip.driver_id)
                .bind(trip.car_id)
                .bind(&trip.start_location)
                .bind(&trip.end_location)
                .bind(start_time_sec)
                .bind(start_time_nsec)
                .bind(end_time_sec)
                .bind(end_time_nsec)
                .bind(trip.distance_km)
                .bind(trip.fuel_consumed_liters)
                .bind(&trip.status)
                .bind(&trip.updated_by)
                .bind(updated_at_sec)
                .bind(updated_at_nsec)
                .bind(trip.id)
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

/// Sets the `status` of the trip identified by `id` on behalf of `updated_by`.
///
/// The status is stored as given, without checking that it is a known trip stage.
pub(crate) async fn update_trip_status(
    ex: &mut Executor,
    id: Uuid,
    status: &str,
    updated_by: &str,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE trips
                SET status = $2, updated_by = $3, updated_at = $4
                WHERE id = $1
            ";
            sqlx::query(query_str)
                .bind(id)
                .bind(status)
                .bind(updated_by)
                .bind(now)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (now_sec, now_nsec) = sqlite::unpack_timestamp(now);

            let query_str = "
                UPDATE trips
                SET status = ?, updated_by = ?, updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ?
            ";
            sqlx::query(query_str)
                .bind(status)
                .bind(updated_by)
                .bind(now_sec)
                .bind(now_nsec)
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

/// Deletes the trip identified by `id`.
pub(crate) async fn delete_trip(ex: &mut Executor, id: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM trips WHERE id = $1";
            sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM trips WHERE id = ?";
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
