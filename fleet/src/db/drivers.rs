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

//! Persistence of drivers.

use crate::model::{Driver, DriverUser};
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

/// Selection of a driver joined with the details of its backing user.
///
/// Reads always go through this join so that returned drivers carry their `user`.
const JOINED_SELECT: &str = "
    SELECT drivers.*, users.username, users.first_name, users.last_name, users.email
    FROM drivers LEFT JOIN users ON drivers.user_id = users.id
";

/// Builds the backing user details from the nullable columns of the outer join.
fn driver_user(
    user_id: Uuid,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) -> Option<DriverUser> {
    Some(DriverUser {
        id: user_id,
        username: username?,
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email: email.unwrap_or_default(),
    })
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Driver {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let user_id: Uuid = row.try_get("user_id").map_err(postgres::map_sqlx_error)?;
        let driver_license_number: String =
            row.try_get("driver_license_number").map_err(postgres::map_sqlx_error)?;
        let license_expiry = row.try_get("license_expiry").map_err(postgres::map_sqlx_error)?;
        let active: bool = row.try_get("active").map_err(postgres::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(postgres::map_sqlx_error)?;
        let deleted_at = row.try_get("deleted_at").map_err(postgres::map_sqlx_error)?;
        let created_at = row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at = row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        let username: Option<String> = row.try_get("username").map_err(postgres::map_sqlx_error)?;
        let first_name: Option<String> =
            row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let last_name: Option<String> =
            row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(postgres::map_sqlx_error)?;

        Ok(Driver {
            id,
            user_id,
            driver_license_number,
            license_expiry,
            active,
            created_by,
            deleted_at,
            created_at,
            updated_at,
            user: driver_user(user_id, username, first_name, last_name, email),
        })
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Driver {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: Uuid = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let user_id: Uuid = row.try_get("user_id").map_err(sqlite::map_sqlx_error)?;
        let driver_license_number: String =
            row.try_get("driver_license_number").map_err(sqlite::map_sqlx_error)?;
        let license_expiry_sec: i64 =
            row.try_get("license_expiry_sec").map_err(sqlite::map_sqlx_error)?;
        let license_expiry_nsec: i64 =
            row.try_get("license_expiry_nsec").map_err(sqlite::map_sqlx_error)?;
        let active: bool = row.try_get("active").map_err(sqlite::map_sqlx_error)?;
        let created_by: String = row.try_get("created_by").map_err(sqlite::map_sqlx_error)?;
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

        let username: Option<String> = row.try_get("username").map_err(sqlite::map_sqlx_error)?;
        let first_name: Option<String> =
            row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: Option<String> = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(sqlite::map_sqlx_error)?;

        Ok(Driver {
            id,
            user_id,
            driver_license_number,
            license_expiry: sqlite::build_timestamp(license_expiry_sec, license_expiry_nsec)?,
            active,
            created_by,
            deleted_at: sqlite::build_optional_timestamp(deleted_at_sec, deleted_at_nsec)?,
            created_at: sqlite::build_timestamp(created_at_sec, created_at_nsec)?,
            updated_at: sqlite::build_timestamp(updated_at_sec, updated_at_nsec)?,
            user: driver_user(user_id, username, first_name, last_name, email),
        })
    }
}

/// Stores a new `driver`.  The embedded user details, if any, are ignored.
pub(crate) async fn create_driver(ex: &mut Executor, driver: &Driver) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO drivers (
                    id, user_id, driver_license_number, license_expiry, active, created_by,
                    deleted_at, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ";
            sqlx::query(query_str)
                .bind(driver.id)
                .bind(driver.user_id)
                .bind(&driver.driver_license_number)
                .bind(driver.license_expiry)
                .bind(driver.active)
                .bind(&driver.created_by)
                .bind(driver.deleted_at)
                .bind(driver.created_at)
                .bind(driver.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (license_expiry_sec, license_expiry_nsec) =
                sqlite::unpack_timestamp(driver.license_expiry);
            let (deleted_at_sec, deleted_at_nsec) =
                sqlite::unpack_optional_timestamp(driver.deleted_at);
            let (created_at_sec, created_at_nsec) = sqlite::unpack_timestamp(driver.created_at);
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(driver.updated_at);

            let query_str = "
                INSERT INTO drivers (
                    id, user_id, driver_license_number,
                    license_expiry_sec, license_expiry_nsec,
                    active, created_by,
                    deleted_at_sec, deleted_at_nsec,
                    created_at_sec, created_at_nsec,
                    updated_at_sec, updated_at_nsec
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ";
            sqlx::query(query_str)
                .bind(driver.id)
                .bind(driver.user_id)
                .bind(&driver.driver_license_number)
                .bind(license_expiry_sec)
                .bind(license_expiry_nsec)
                .bind(driver.active)
                .bind(&driver.created_by)
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

/// Gets the driver identified by `id` together with its user, or `None` if the driver does not
/// exist.  Soft-deleted drivers are only returned if `include_deleted` is true.
async fn query_driver(
    ex: &mut Executor,
    id: Uuid,
    include_deleted: bool,
) -> DbResult<Option<Driver>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "{} WHERE drivers.id = $1 AND ($2 OR drivers.deleted_at IS NULL)",
                JOINED_SELECT
            );
            let row = sqlx::query(&query_str)
                .bind(id)
                .bind(include_deleted)
                .fetch_optional(ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Driver::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "{} WHERE drivers.id = ? AND (? OR drivers.deleted_at_sec IS NULL)",
                JOINED_SELECT
            );
            let row = sqlx::query(&query_str)
                .bind(id)
                .bind(include_deleted)
                .fetch_optional(ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Driver::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the driver identified by `id` together with its user, or `None` if the driver does not
/// exist or was soft-deleted.
pub(crate) async fn get_driver(ex: &mut Executor, id: Uuid) -> DbResult<Option<Driver>> {
    query_driver(ex, id, false).await
}

/// Same as `get_driver` but also returns soft-deleted drivers.
pub(crate) async fn get_driver_with_deleted(
    ex: &mut Executor,
    id: Uuid,
) -> DbResult<Option<Driver>> {
    query_driver(ex, id, true).await
}

/// Gets all drivers that have not been soft-deleted, together with their users.
pub(crate) async fn list_drivers(ex: &mut Executor) -> DbResult<Vec<Driver>> {
    let mut drivers = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!(
                "{} WHERE drivers.deleted_at IS NULL ORDER BY drivers.driver_license_number",
                JOINED_SELECT
            );
            let mut rows = sqlx::query(&query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                drivers.push(Driver::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!(
                "{} WHERE drivers.deleted_at_sec IS NULL ORDER BY drivers.driver_license_number",
                JOINED_SELECT
            );
            let mut rows = sqlx::query(&query_str).fetch(ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                drivers.push(Driver::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(drivers)
}

/// Replaces the license details of an existing `driver`.
pub(crate) async fn update_driver(ex: &mut Executor, driver: &Driver) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE drivers
                SET driver_license_number = $2, license_expiry = $3, updated_at = $4
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(driver.id)
                .bind(&driver.driver_license_number)
                .bind(driver.license_expiry)
                .bind(driver.updated_at)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (license_expiry_sec, license_expiry_nsec) =
                sqlite::unpack_timestamp(driver.license_expiry);
            let (updated_at_sec, updated_at_nsec) = sqlite::unpack_timestamp(driver.updated_at);

            let query_str = "
                UPDATE drivers
                SET
                    driver_license_number = ?,
                    license_expiry_sec = ?, license_expiry_nsec = ?,
                    updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(&driver.driver_license_number)
                .bind(license_expiry_sec)
                .bind(license_expiry_nsec)
                .bind(updated_at_sec)
                .bind(updated_at_nsec)
                .bind(driver.id)
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

/// Sets the `active` flag of the driver identified by `id`.
pub(crate) async fn set_driver_active(
    ex: &mut Executor,
    id: Uuid,
    active: bool,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE drivers
                SET active = $2, updated_at = $3
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(id)
                .bind(active)
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
                UPDATE drivers
                SET active = ?, updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(active)
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

/// Marks the driver identified by `id` as deleted at `now`.
pub(crate) async fn soft_delete_driver(
    ex: &mut Executor,
    id: Uuid,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE drivers
                SET deleted_at = $2, updated_at = $2
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(id)
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
                UPDATE drivers
                SET
                    deleted_at_sec = ?, deleted_at_nsec = ?,
                    updated_at_sec = ?, updated_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(now_sec)
                .bind(now_nsec)
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

/// Removes the driver identified by `id`.  Fails if any trip still references it.
pub(crate) async fn delete_driver(ex: &mut Executor, id: Uuid) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM drivers WHERE id = $1";
            sqlx::query(query_str)
                .bind(id)
                .execute(ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM drivers WHERE id = ?";
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
